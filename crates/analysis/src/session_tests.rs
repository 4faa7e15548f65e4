use super::*;
use async_trait::async_trait;
use move_tree::{Evaluation, Score, START_FEN};
use tokio::sync::Semaphore;

fn fen(side: &str, fullmove: u32) -> String {
    format!("8/8/8/8/8/8/8/8 {side} - - 0 {fullmove}")
}

fn test_config() -> AnalysisConfig {
    AnalysisConfig {
        search_depth: 3,
        predictor_ratings: vec![1100, 1900],
        channel_capacity: 16,
    }
}

/// Emits one result per depth; every result after the first waits for a permit.
struct SteppedSearch {
    depths: Vec<u32>,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl Evaluator for SteppedSearch {
    fn name(&self) -> &str {
        "stepped-search"
    }

    fn kinds(&self) -> Vec<EvaluatorKind> {
        vec![EvaluatorKind::Search]
    }

    async fn evaluate(&self, _request: EvaluationRequest, sink: ResultSink) -> Result<(), EvaluatorError> {
        for (i, &depth) in self.depths.iter().enumerate() {
            if i > 0 {
                let permit = self.gate.acquire().await.map_err(|e| EvaluatorError::Failed(e.to_string()))?;
                permit.forget();
            }
            let eval = Evaluation::search(depth, Score::Centipawns(depth as i32 * 10), Some("e2e4"));
            if !sink.emit(eval).await {
                break;
            }
        }
        Ok(())
    }
}

fn ungated(depths: Vec<u32>) -> Arc<SteppedSearch> {
    Arc::new(SteppedSearch {
        depths,
        gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
    })
}

struct Predictor;

#[async_trait]
impl Evaluator for Predictor {
    fn name(&self) -> &str {
        "predictor"
    }

    fn kinds(&self) -> Vec<EvaluatorKind> {
        vec![
            EvaluatorKind::Predictor { rating: 1100 },
            EvaluatorKind::Predictor { rating: 1900 },
        ]
    }

    async fn evaluate(&self, request: EvaluationRequest, sink: ResultSink) -> Result<(), EvaluatorError> {
        let best = if request.moves.is_empty() { "e2e4" } else { "e7e5" };
        sink.emit(Evaluation::prediction(1, vec![(best.to_string(), 0.7)], 0.5)).await;
        Ok(())
    }
}

struct Broken;

#[async_trait]
impl Evaluator for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn kinds(&self) -> Vec<EvaluatorKind> {
        vec![EvaluatorKind::Search]
    }

    async fn evaluate(&self, _request: EvaluationRequest, _sink: ResultSink) -> Result<(), EvaluatorError> {
        Err(EvaluatorError::Unavailable)
    }
}

struct Panicking;

#[async_trait]
impl Evaluator for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }

    fn kinds(&self) -> Vec<EvaluatorKind> {
        vec![EvaluatorKind::Search]
    }

    async fn evaluate(&self, _request: EvaluationRequest, _sink: ResultSink) -> Result<(), EvaluatorError> {
        panic!("engine process crashed");
    }
}

fn session() -> AnalysisSession {
    AnalysisSession::new(MoveTree::new(START_FEN), test_config())
}

#[tokio::test]
async fn test_request_records_result() {
    let mut s = session();
    s.register(ungated(vec![1, 2, 3]));
    let root = s.tree().root();

    assert!(matches!(s.request(root, EvaluatorKind::Search), RequestOutcome::Issued(_)));
    let events = s.run_until_idle().await;

    assert_eq!(events.last(), Some(&AnalysisEvent::Finished { node: root, kind: EvaluatorKind::Search }));
    assert_eq!(s.tree().evaluation(root, EvaluatorKind::Search).unwrap().depth, 3);
    assert!(!s.is_in_flight(root, EvaluatorKind::Search));
}

#[tokio::test]
async fn test_duplicate_requests_are_suppressed() {
    let mut s = session();
    s.register(ungated(vec![3]));
    let root = s.tree().root();

    assert!(matches!(s.request(root, EvaluatorKind::Search), RequestOutcome::Issued(_)));
    assert_eq!(s.request(root, EvaluatorKind::Search), RequestOutcome::InFlight);
    s.run_until_idle().await;
    assert_eq!(s.request(root, EvaluatorKind::Search), RequestOutcome::AlreadySatisfied);
}

#[tokio::test]
async fn test_shallow_cache_is_re_requested() {
    let mut s = session();
    s.register(ungated(vec![1]));
    let root = s.tree().root();

    s.request(root, EvaluatorKind::Search);
    s.run_until_idle().await;
    // depth 1 < configured depth 3
    assert!(matches!(s.request(root, EvaluatorKind::Search), RequestOutcome::Issued(_)));
}

#[tokio::test]
async fn test_out_of_order_results_do_not_regress() {
    let mut s = session();
    s.register(ungated(vec![5, 2]));
    let root = s.tree().root();

    s.request(root, EvaluatorKind::Search);
    let events = s.run_until_idle().await;

    assert!(events.contains(&AnalysisEvent::Ignored { node: root, kind: EvaluatorKind::Search, depth: 2 }));
    assert_eq!(s.tree().evaluation(root, EvaluatorKind::Search).unwrap().depth, 5);
}

#[tokio::test]
async fn test_no_evaluator_for_kind() {
    let mut s = session();
    let root = s.tree().root();
    assert_eq!(s.request(root, EvaluatorKind::Search), RequestOutcome::NoEvaluator);
    assert!(s.next_update().await.is_none());
}

#[tokio::test]
async fn test_predictions_per_rating_tier() {
    let mut s = session();
    s.register(Arc::new(Predictor));
    let e4 = s.play(NewMove::new("e2e4", fen("b", 1))).node();

    let outcomes = s.request_predictions(e4);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| matches!(o, RequestOutcome::Issued(_))));
    s.run_until_idle().await;

    for rating in [1100, 1900] {
        let eval = s.tree().evaluation(e4, EvaluatorKind::Predictor { rating }).unwrap();
        assert_eq!(eval.best_move(), Some("e7e5"));
    }
    assert!(s
        .request_predictions(e4)
        .iter()
        .all(|o| *o == RequestOutcome::AlreadySatisfied));
}

#[tokio::test]
async fn test_navigation_stops_deepening() {
    let gate = Arc::new(Semaphore::new(0));
    let mut s = session();
    s.register(Arc::new(SteppedSearch {
        depths: vec![1, 2, 3],
        gate: gate.clone(),
    }));
    let root = s.tree().root();
    let e4 = s.play(NewMove::new("e2e4", fen("b", 1))).node();

    assert!(matches!(s.deepen(e4), RequestOutcome::Issued(_)));
    assert_eq!(s.deepening_node(), Some(e4));
    assert_eq!(
        s.next_update().await,
        Some(AnalysisEvent::Recorded { node: e4, kind: EvaluatorKind::Search, depth: 1 })
    );

    s.go_to(root);
    assert_eq!(s.deepening_node(), None);
    gate.add_permits(10);
    s.run_until_idle().await;

    assert_eq!(s.tree().evaluation(e4, EvaluatorKind::Search).unwrap().depth, 1);
}

#[tokio::test]
async fn test_new_deepen_replaces_previous() {
    let gate = Arc::new(Semaphore::new(0));
    let mut s = session();
    s.register(Arc::new(SteppedSearch {
        depths: vec![1, 2, 3],
        gate: gate.clone(),
    }));
    let root = s.tree().root();
    let e4 = s.play(NewMove::new("e2e4", fen("b", 1))).node();

    s.deepen(e4);
    s.next_update().await;
    assert_eq!(s.deepen(e4), RequestOutcome::InFlight);

    assert!(matches!(s.deepen(root), RequestOutcome::Issued(_)));
    assert_eq!(s.deepening_node(), Some(root));
    gate.add_permits(10);
    s.run_until_idle().await;

    assert_eq!(s.tree().evaluation(e4, EvaluatorKind::Search).unwrap().depth, 1);
    assert_eq!(s.tree().evaluation(root, EvaluatorKind::Search).unwrap().depth, 3);
    assert_eq!(s.deepening_node(), None);
}

#[tokio::test]
async fn test_result_for_truncated_node_is_harmless() {
    let mut s = session();
    s.register(ungated(vec![3]));
    let root = s.tree().root();
    let e4 = s.play(NewMove::new("e2e4", fen("b", 1))).node();
    let e5 = s.play(NewMove::new("e7e5", fen("w", 2))).node();

    s.request(e5, EvaluatorKind::Search);
    s.truncate_future(root);
    assert_eq!(s.current(), root);
    s.run_until_idle().await;

    assert!(!s.tree().is_attached(e4));
    assert!(s.tree().has_evaluation(e5, EvaluatorKind::Search));
    assert!(s.tree()[root].is_leaf());
}

#[tokio::test]
async fn test_evaluator_failure_is_reported() {
    let mut s = session();
    s.register(Arc::new(Broken));
    let root = s.tree().root();

    s.request(root, EvaluatorKind::Search);
    let events = s.run_until_idle().await;

    assert_eq!(
        events,
        vec![AnalysisEvent::Failed { node: root, kind: EvaluatorKind::Search, error: EvaluatorError::Unavailable }]
    );
    assert!(!s.is_in_flight(root, EvaluatorKind::Search));
}

#[tokio::test]
async fn test_play_is_idempotent_through_session() {
    let mut s = session();
    let root = s.tree().root();
    let first = s.play(NewMove::new("e2e4", fen("b", 1)));
    s.go_to(root);
    let second = s.play(NewMove::new("e2e4", fen("b", 1)));

    assert!(first.is_new());
    assert_eq!(second, Attachment::Navigated(first.node()));
    assert_eq!(s.current(), first.node());
}

#[tokio::test]
async fn test_panicking_evaluator_does_not_wedge_session() {
    let mut s = session();
    s.register(Arc::new(Panicking));
    let root = s.tree().root();

    assert!(matches!(s.request(root, EvaluatorKind::Search), RequestOutcome::Issued(_)));
    let events = tokio::time::timeout(std::time::Duration::from_secs(5), s.run_until_idle())
        .await
        .expect("session stayed busy after evaluator panic");

    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        AnalysisEvent::Failed { node, kind: EvaluatorKind::Search, error: EvaluatorError::Failed(_) } if *node == root
    ));
    assert!(!s.is_in_flight(root, EvaluatorKind::Search));
    assert!(matches!(s.request(root, EvaluatorKind::Search), RequestOutcome::Issued(_)));
}
