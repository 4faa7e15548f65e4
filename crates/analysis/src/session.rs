//! The analysis session: single owner of a move tree and its evaluations.
//!
//! All tree mutation happens through `&mut AnalysisSession`, so attaches are
//! serialized by construction. Evaluators run as spawned tasks and report
//! back over a channel; results are merged into the node they were requested
//! for, whatever the tree looks like by then.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use move_tree::{Attachment, EvaluatorKind, MoveTree, NewMove, NodeId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cancel::StopSignal;
use crate::config::AnalysisConfig;
use crate::evaluator::*;

/// Result of [`AnalysisSession::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Issued(RequestId),
    /// The cache already holds a deep enough record
    AlreadySatisfied,
    /// A request for the same node and kind is still running
    InFlight,
    NoEvaluator,
}

/// What happened to one message received from an evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Recorded {
        node: NodeId,
        kind: EvaluatorKind,
        depth: u32,
    },
    /// Shallower than what the cache already had
    Ignored {
        node: NodeId,
        kind: EvaluatorKind,
        depth: u32,
    },
    /// Yield from a stopped request, not consumed
    Discarded { node: NodeId, kind: EvaluatorKind },
    Finished { node: NodeId, kind: EvaluatorKind },
    Failed {
        node: NodeId,
        kind: EvaluatorKind,
        error: EvaluatorError,
    },
}

#[derive(Debug)]
struct Deepening {
    node: NodeId,
    request: RequestId,
    stop: StopSignal,
}

pub struct AnalysisSession {
    tree: MoveTree,
    current: NodeId,
    config: AnalysisConfig,
    evaluators: Vec<Arc<dyn Evaluator>>,
    in_flight: HashMap<(NodeId, EvaluatorKind), RequestId>,
    /// Requests told to stop whose tasks have not finished yet
    stopped: HashSet<RequestId>,
    deepening: Option<Deepening>,
    /// Spawned tasks that have not reported `Finished`
    outstanding: usize,
    next_request: RequestId,
    tx: mpsc::Sender<SessionMessage>,
    rx: mpsc::Receiver<SessionMessage>,
}

impl AnalysisSession {
    pub fn new(tree: MoveTree, config: AnalysisConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let current = tree.root();
        Self {
            tree,
            current,
            config,
            evaluators: Vec::new(),
            in_flight: HashMap::new(),
            stopped: HashSet::new(),
            deepening: None,
            outstanding: 0,
            next_request: 1,
            tx,
            rx,
        }
    }

    pub fn register(&mut self, evaluator: Arc<dyn Evaluator>) {
        debug!(name = evaluator.name(), kinds = ?evaluator.kinds(), "evaluator registered");
        self.evaluators.push(evaluator);
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Node whose search stream is currently being consumed
    pub fn deepening_node(&self) -> Option<NodeId> {
        self.deepening.as_ref().map(|d| d.node)
    }

    pub fn is_in_flight(&self, node: NodeId, kind: EvaluatorKind) -> bool {
        self.in_flight.contains_key(&(node, kind))
    }

    /// Attach `mv` at the current node and move there.
    pub fn play(&mut self, mv: NewMove) -> Attachment {
        let result = self.tree.attach(self.current, mv);
        self.go_to(result.node());
        result
    }

    /// Navigate to `node`. Leaving the deepened node stops its stream.
    pub fn go_to(&mut self, node: NodeId) {
        self.current = node;
        if self.deepening.as_ref().is_some_and(|d| d.node != node) {
            self.stop_deepening();
        }
    }

    /// Discard everything after `node`.
    pub fn truncate_future(&mut self, node: NodeId) {
        self.tree.truncate_future(node);
        if !self.tree.is_attached(self.current) {
            self.go_to(node);
        }
    }

    /// Issue a one-shot request unless the cache or an in-flight request
    /// already covers it.
    pub fn request(&mut self, node: NodeId, kind: EvaluatorKind) -> RequestOutcome {
        self.issue(node, kind, StopSignal::new())
    }

    /// Request one prediction per configured rating tier.
    pub fn request_predictions(&mut self, node: NodeId) -> Vec<RequestOutcome> {
        let ratings = self.config.predictor_ratings.clone();
        ratings
            .into_iter()
            .map(|rating| self.request(node, EvaluatorKind::Predictor { rating }))
            .collect()
    }

    /// Start a streaming search on `node`, stopping any other deepening.
    pub fn deepen(&mut self, node: NodeId) -> RequestOutcome {
        if let Some(d) = &self.deepening {
            if d.node == node {
                return RequestOutcome::InFlight;
            }
            self.stop_deepening();
        }
        let stop = StopSignal::new();
        let outcome = self.issue(node, EvaluatorKind::Search, stop.clone());
        if let RequestOutcome::Issued(request) = outcome {
            self.deepening = Some(Deepening {
                node,
                request,
                stop,
            });
        }
        outcome
    }

    /// Stop consuming the current search stream, if any.
    pub fn stop_deepening(&mut self) {
        let Some(d) = self.deepening.take() else {
            return;
        };
        debug!(node = %d.node, request = d.request, "deepening stopped");
        d.stop.stop();
        self.stopped.insert(d.request);
        if self.in_flight.get(&(d.node, EvaluatorKind::Search)) == Some(&d.request) {
            self.in_flight.remove(&(d.node, EvaluatorKind::Search));
        }
    }

    /// Wait for the next evaluator message and merge it.
    ///
    /// Returns None when no evaluator task is running and nothing is queued.
    pub async fn next_update(&mut self) -> Option<AnalysisEvent> {
        let msg = if self.outstanding == 0 {
            self.rx.try_recv().ok()?
        } else {
            self.rx.recv().await?
        };
        Some(self.apply(msg))
    }

    /// Merge every message already queued, without waiting.
    pub fn drain(&mut self) -> Vec<AnalysisEvent> {
        let mut events = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            events.push(self.apply(msg));
        }
        events
    }

    /// Process messages until every spawned evaluator task has finished.
    pub async fn run_until_idle(&mut self) -> Vec<AnalysisEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_update().await {
            events.push(event);
        }
        events
    }

    fn wanted_depth(&self, kind: EvaluatorKind) -> u32 {
        match kind {
            EvaluatorKind::Search => self.config.search_depth,
            EvaluatorKind::Predictor { .. } => 0,
        }
    }

    fn issue(&mut self, node: NodeId, kind: EvaluatorKind, stop: StopSignal) -> RequestOutcome {
        let target_depth = self.wanted_depth(kind);
        if self
            .tree
            .node(node)
            .is_some_and(|n| n.evaluations().has_depth(kind, target_depth))
        {
            return RequestOutcome::AlreadySatisfied;
        }
        if self.in_flight.contains_key(&(node, kind)) {
            return RequestOutcome::InFlight;
        }
        let Some(evaluator) = self
            .evaluators
            .iter()
            .find(|e| e.kinds().contains(&kind))
            .cloned()
        else {
            return RequestOutcome::NoEvaluator;
        };
        let Some(target) = self.tree.node(node) else {
            return RequestOutcome::NoEvaluator;
        };

        let id = self.next_request;
        self.next_request += 1;
        let request = EvaluationRequest {
            id,
            node,
            kind,
            position: target.position().to_string(),
            starting_position: self.tree[self.tree.root()].position().to_string(),
            moves: self.tree.moves_to(node),
            target_depth,
        };
        let sink = ResultSink::new(&request, stop, self.tx.clone());
        let tx = self.tx.clone();
        debug!(node = %node, %kind, request = id, evaluator = evaluator.name(), "evaluation requested");

        self.in_flight.insert((node, kind), id);
        self.outstanding += 1;
        // The evaluator runs in its own task so a panic still reports Finished.
        tokio::spawn(async move {
            let task = tokio::spawn(async move { evaluator.evaluate(request, sink).await });
            let error = match task.await {
                Ok(result) => result.err(),
                Err(e) => Some(EvaluatorError::Failed(format!("evaluator task aborted: {e}"))),
            };
            let _ = tx
                .send(SessionMessage::Finished {
                    request: id,
                    node,
                    kind,
                    error,
                })
                .await;
        });
        RequestOutcome::Issued(id)
    }

    fn apply(&mut self, msg: SessionMessage) -> AnalysisEvent {
        match msg {
            SessionMessage::Result {
                request,
                node,
                kind,
                evaluation,
            } => {
                if self.stopped.contains(&request) {
                    return AnalysisEvent::Discarded { node, kind };
                }
                let depth = evaluation.depth;
                if self.tree.record_evaluation(node, kind, evaluation) {
                    AnalysisEvent::Recorded { node, kind, depth }
                } else {
                    AnalysisEvent::Ignored { node, kind, depth }
                }
            }
            SessionMessage::Finished {
                request,
                node,
                kind,
                error,
            } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                self.stopped.remove(&request);
                if self.in_flight.get(&(node, kind)) == Some(&request) {
                    self.in_flight.remove(&(node, kind));
                }
                if self.deepening.as_ref().is_some_and(|d| d.request == request) {
                    self.deepening = None;
                }
                match error {
                    Some(error) => {
                        warn!(node = %node, %kind, %error, "evaluator failed");
                        AnalysisEvent::Failed { node, kind, error }
                    }
                    None => AnalysisEvent::Finished { node, kind },
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
