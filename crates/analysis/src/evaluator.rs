//! Interface to external evaluators (move predictor, search engine).

use async_trait::async_trait;
use move_tree::{Evaluation, EvaluatorKind, NodeId};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::cancel::StopSignal;

/// Identifies one issued request; results are matched back by it.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    #[error("evaluator unavailable")]
    Unavailable,
    #[error("evaluation failed: {0}")]
    Failed(String),
}

/// Everything an evaluator needs to analyse one node.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub id: RequestId,
    pub node: NodeId,
    pub kind: EvaluatorKind,
    /// FEN of the node's position
    pub position: String,
    /// FEN of the tree root
    pub starting_position: String,
    /// Coordinate moves from the root to the node
    pub moves: Vec<String>,
    /// Depth at which the session considers the request satisfied
    pub target_depth: u32,
}

/// Message from an evaluator task back to the session
#[derive(Debug)]
pub(crate) enum SessionMessage {
    Result {
        request: RequestId,
        node: NodeId,
        kind: EvaluatorKind,
        evaluation: Evaluation,
    },
    Finished {
        request: RequestId,
        node: NodeId,
        kind: EvaluatorKind,
        error: Option<EvaluatorError>,
    },
}

/// Where an evaluator pushes its results.
///
/// A streaming evaluator calls [`ResultSink::emit`] once per completed depth
/// and stops producing as soon as it returns false.
#[derive(Debug, Clone)]
pub struct ResultSink {
    request: RequestId,
    node: NodeId,
    kind: EvaluatorKind,
    stop: StopSignal,
    tx: mpsc::Sender<SessionMessage>,
}

impl ResultSink {
    pub(crate) fn new(
        request: &EvaluationRequest,
        stop: StopSignal,
        tx: mpsc::Sender<SessionMessage>,
    ) -> Self {
        Self {
            request: request.id,
            node: request.node,
            kind: request.kind,
            stop,
            tx,
        }
    }

    /// Deliver one result. Returns false once the request has been stopped
    /// or the session has gone away.
    pub async fn emit(&self, evaluation: Evaluation) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        let msg = SessionMessage::Result {
            request: self.request,
            node: self.node,
            kind: self.kind,
            evaluation,
        };
        self.tx.send(msg).await.is_ok() && !self.stop.is_stopped()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped() || self.tx.is_closed()
    }
}

/// An asynchronous producer of position analysis.
///
/// Implementations may emit zero, one, or a stream of results with
/// non-decreasing depth for each request.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    /// Evaluator kinds this implementation can serve
    fn kinds(&self) -> Vec<EvaluatorKind>;

    async fn evaluate(&self, request: EvaluationRequest, sink: ResultSink)
        -> Result<(), EvaluatorError>;
}
