//! Ensemble Probability Combiner
//!
//! Combines the per-classifier probability matrices of an ensemble into a
//! single consensus matrix.
//!
//! ## Architecture
//!
//! ```text
//! predictions[c] (R x C) ─┐
//! weights[c]             ─┼─→ EnsembleCombiner ─→ consensus (R x C)
//! uncertainties[c] (R x 1)┘        ↑
//!                           CombinerConfig (mode, validation, degenerate policy)
//! ```
//!
//! The free functions `average_probs`, `weighted_probs` and
//! `weighted_uncert_probs` are the unchecked legacy contract. The
//! `EnsembleCombiner` methods add opt-in validation, the corrected
//! accumulation and degenerate-certainty handling.

pub mod combiner;
pub mod config;
pub mod error;
pub mod matrix;
pub mod request;

pub use combiner::{
    average_probs, weighted_probs, weighted_uncert_probs, CombineMode, CombineStrategy,
    CombinerConfig, DegeneratePolicy, EnsembleCombiner,
};
pub use error::{Error, InputKind, Result};
pub use matrix::ProbMatrix;
pub use request::CombineRequest;

#[cfg(test)]
mod config_tests;
