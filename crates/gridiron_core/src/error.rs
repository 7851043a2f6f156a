//! Error types for the simulation core
//!
//! Per-play anomalies (missing players, degenerate weights, impossible
//! yardage samples) are absorbed inside the engine and never reach here.
//! Only a malformed model or configuration aborts a trial.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::TeamSide;

/// Game situation at the moment a collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapContext {
    pub quarter: u8,
    pub seconds_remaining: f64,
    pub down: u8,
    pub yards_to_go: f64,
    pub yard_line: f64,
    pub posteam: TeamSide,
}

impl fmt::Display for SnapContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Q{} {:.0}s, {} & {:.1} at {:.1} ({:?} ball)",
            self.quarter,
            self.seconds_remaining,
            self.down,
            self.yards_to_go,
            self.yard_line,
            self.posteam
        )
    }
}

/// A classifier rejected its input or produced unusable output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("expected {expected} features, found {found}")]
    FeatureCount { expected: usize, found: usize },

    #[error("feature {index} is not finite")]
    NonFinite { index: usize },

    #[error("model output is not a probability vector: {0}")]
    InvalidOutput(String),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("{model} model failed at {context}: {source}")]
    ModelInference {
        model: &'static str,
        #[source]
        source: InferenceError,
        context: SnapContext,
    },

    #[error("Invalid model bundle: {0}")]
    InvalidBundle(String),

    #[error("Invalid matchup: {0}")]
    InvalidMatchup(String),

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    /// Whether re-running the same trial with corrected input could succeed.
    /// Contract violations in the bundle never are.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::ModelInference { .. } => false,
            SimError::InvalidBundle(_) => false,
            SimError::InvalidMatchup(_) | SimError::UnsupportedSchema(_) => true,
            SimError::Json(_) | SimError::Yaml(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
