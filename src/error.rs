//! Error types for the ensemble combiner

use thiserror::Error;

/// Which input collection an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Per-classifier prediction matrices
    Predictions,
    /// Per-classifier weight vector
    Weights,
    /// Per-classifier uncertainty matrices
    Uncertainties,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Predictions => write!(f, "predictions"),
            InputKind::Weights => write!(f, "weights"),
            InputKind::Uncertainties => write!(f, "uncertainties"),
        }
    }
}

/// Combiner errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty ensemble: at least one classifier matrix is required")]
    EmptyEnsemble,

    #[error("Shape mismatch in {kind}[{index}]: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        kind: InputKind,
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Length mismatch: expected {expected} {kind}, got {actual}")]
    LengthMismatch {
        kind: InputKind,
        expected: usize,
        actual: usize,
    },

    #[error("Degenerate certainty at sample {row}: total certainty mass is zero")]
    DegenerateCertainty { row: usize },

    #[error("Ragged matrix: row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Missing input: {0} required by this strategy")]
    MissingInput(InputKind),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
