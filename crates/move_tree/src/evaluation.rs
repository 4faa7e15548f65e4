//! Per-node cache of asynchronously delivered analysis.
//!
//! Each evaluator kind keeps at most one record. A new record replaces the
//! stored one only when its depth is at least as large, so results arriving
//! late or out of order can never downgrade what is already known.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which evaluator produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EvaluatorKind {
    /// Human-like move predictor trained for a rating tier
    Predictor { rating: u16 },
    /// Search-based engine
    Search,
}

impl std::fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluatorKind::Predictor { rating } => write!(f, "predictor@{rating}"),
            EvaluatorKind::Search => write!(f, "search"),
        }
    }
}

/// Score from the side to move's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    Centipawns(i32),
    /// Mate in N moves (negative = getting mated)
    Mate(i32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EvaluationPayload {
    Prediction {
        /// Move probabilities, most likely first
        policy: Vec<(String, f32)>,
        win_probability: f32,
    },
    Search {
        score: Score,
        best_move: Option<String>,
        principal_variation: Vec<String>,
        /// Score of every root move searched
        move_scores: Vec<(String, Score)>,
    },
}

/// One analysis result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Search depth, or confidence for predictors. Larger is better.
    pub depth: u32,
    pub payload: EvaluationPayload,
}

impl Evaluation {
    pub fn search(depth: u32, score: Score, best_move: Option<&str>) -> Self {
        Self {
            depth,
            payload: EvaluationPayload::Search {
                score,
                best_move: best_move.map(str::to_string),
                principal_variation: best_move.map(|m| vec![m.to_string()]).unwrap_or_default(),
                move_scores: Vec::new(),
            },
        }
    }

    pub fn prediction(confidence: u32, policy: Vec<(String, f32)>, win_probability: f32) -> Self {
        Self {
            depth: confidence,
            payload: EvaluationPayload::Prediction {
                policy,
                win_probability,
            },
        }
    }

    /// Best move according to this record, if it names one
    pub fn best_move(&self) -> Option<&str> {
        match &self.payload {
            EvaluationPayload::Search { best_move, .. } => best_move.as_deref(),
            EvaluationPayload::Prediction { policy, .. } => policy.first().map(|(m, _)| m.as_str()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCache {
    records: HashMap<EvaluatorKind, Evaluation>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `evaluation` unless a deeper record already exists.
    ///
    /// Returns true when the record was stored.
    pub fn record(&mut self, kind: EvaluatorKind, evaluation: Evaluation) -> bool {
        match self.records.get(&kind) {
            Some(existing) if existing.depth > evaluation.depth => false,
            _ => {
                self.records.insert(kind, evaluation);
                true
            }
        }
    }

    pub fn get(&self, kind: EvaluatorKind) -> Option<&Evaluation> {
        self.records.get(&kind)
    }

    pub fn has(&self, kind: EvaluatorKind) -> bool {
        self.records.contains_key(&kind)
    }

    /// True if a record of at least `min_depth` is stored for `kind`.
    pub fn has_depth(&self, kind: EvaluatorKind, min_depth: u32) -> bool {
        self.records.get(&kind).is_some_and(|e| e.depth >= min_depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EvaluatorKind, &Evaluation)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "evaluation_tests.rs"]
mod evaluation_tests;
