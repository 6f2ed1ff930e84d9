//! Ensemble combiner
//!
//! Reduces one probability matrix per classifier into a single consensus
//! matrix of the same shape. Three policies are available:
//! - Unweighted average
//! - Fixed per-classifier weights
//! - Per-sample weights derived from each classifier's uncertainty
//!
//! `CombineMode::Legacy` (the default) reproduces the historical numeric
//! output, where every accumulation step reads the *first* classifier's
//! matrix instead of the current one. The true ensemble is computed with
//! `CombineMode::Corrected`.
//!
//! ```rust,ignore
//! use ensemble_combiner::combiner::{EnsembleCombiner, CombinerConfig, CombineMode};
//!
//! let combiner = EnsembleCombiner::new(CombinerConfig {
//!     mode: CombineMode::Corrected,
//!     validate_inputs: true,
//!     ..Default::default()
//! });
//! let consensus = combiner.weighted_probs(&predictions, &[0.3, 0.7])?;
//! ```

pub mod uncertainty;
pub mod validate;


pub use uncertainty::{certainty_mass, degenerate_rows, uncertainty_weights, DegeneratePolicy};

use serde::{Deserialize, Serialize};

use crate::error::{Error, InputKind, Result};
use crate::matrix::ProbMatrix;
use crate::request::CombineRequest;

/// Which matrix each accumulation step reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Always read the first classifier's matrix (historical output)
    #[default]
    Legacy,
    /// Read classifier `c`'s matrix at step `c`
    Corrected,
}

/// Combination policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineStrategy {
    /// `average_probs`
    Average,
    /// `weighted_probs`
    Weighted,
    /// `weighted_uncert_probs`
    Uncertainty,
}

/// Combiner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    pub mode: CombineMode,
    /// Check shapes and lengths before computing
    pub validate_inputs: bool,
    /// Handling of samples with zero certainty mass
    pub degenerate: DegeneratePolicy,
    /// Divide fixed weights by their sum before accumulating
    pub normalize_weights: bool,
}

/// Ensemble combiner. Holds configuration only, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct EnsembleCombiner {
    config: CombinerConfig,
}

impl EnsembleCombiner {
    pub fn new(config: CombinerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CombinerConfig::default())
    }

    /// Validating combiner in corrected mode
    pub fn corrected() -> Self {
        Self::new(CombinerConfig {
            mode: CombineMode::Corrected,
            validate_inputs: true,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &CombinerConfig {
        &self.config
    }

    /// Unweighted average of the ensemble
    ///
    /// An empty ensemble is always rejected.
    ///
    /// # Panics
    /// With validation disabled, panics if a matrix is smaller than the first.
    pub fn average_probs(&self, classifiers: &[ProbMatrix]) -> Result<ProbMatrix> {
        let (nrows, ncols) = self.prepare(classifiers)?;
        tracing::debug!(
            "average_probs: {} classifiers, {}x{}, mode={:?}",
            classifiers.len(),
            nrows,
            ncols,
            self.config.mode
        );
        Ok(average_kernel(self.config.mode, classifiers))
    }

    /// Weighted sum of the ensemble with one weight per classifier
    ///
    /// # Panics
    /// With validation disabled, panics if `weights` is shorter than
    /// `classifiers` or a matrix is smaller than the first. Extra weights
    /// are ignored.
    pub fn weighted_probs(&self, classifiers: &[ProbMatrix], weights: &[f64]) -> Result<ProbMatrix> {
        let (nrows, ncols) = self.prepare(classifiers)?;
        if self.config.validate_inputs {
            validate::check_weights(classifiers.len(), weights)?;
        }

        let normalized;
        let weights = if self.config.normalize_weights {
            normalized = normalize_weights(weights);
            &normalized[..]
        } else {
            weights
        };

        tracing::debug!(
            "weighted_probs: {} classifiers, {}x{}, weight sum={}, mode={:?}",
            classifiers.len(),
            nrows,
            ncols,
            weights.iter().sum::<f64>(),
            self.config.mode
        );
        Ok(weighted_kernel(self.config.mode, classifiers, weights))
    }

    /// Per-sample certainty-weighted combination
    ///
    /// # Panics
    /// With validation disabled, panics if there are fewer uncertainty
    /// matrices than classifiers, an uncertainty matrix has fewer rows than
    /// the predictions or no columns, or a prediction matrix is smaller than
    /// the first.
    pub fn weighted_uncert_probs(
        &self,
        classifiers: &[ProbMatrix],
        uncertainties: &[ProbMatrix],
    ) -> Result<ProbMatrix> {
        let (nrows, ncols) = self.prepare(classifiers)?;
        if self.config.validate_inputs {
            validate::check_uncertainties(classifiers.len(), nrows, uncertainties)?;
        }

        // n_classifiers comes from the predictions; extra uncertainties are ignored
        let uncertainties = &uncertainties[..classifiers.len()];
        let mass = certainty_mass(uncertainties, nrows);
        let mut weights = uncertainty::weights_from_mass(uncertainties, &mass);
        uncertainty::resolve_degenerate(&mut weights, &mass, self.config.degenerate)?;

        tracing::debug!(
            "weighted_uncert_probs: {} classifiers, {}x{}, mode={:?}, degenerate={:?}",
            classifiers.len(),
            nrows,
            ncols,
            self.config.mode,
            self.config.degenerate
        );
        Ok(uncertainty_kernel(self.config.mode, classifiers, &weights))
    }

    /// Run `strategy` against a request, checking that the inputs it needs
    /// are present
    pub fn combine(&self, strategy: CombineStrategy, request: &CombineRequest) -> Result<ProbMatrix> {
        match strategy {
            CombineStrategy::Average => self.average_probs(&request.predictions),
            CombineStrategy::Weighted => {
                let weights = request
                    .weights
                    .as_deref()
                    .ok_or(Error::MissingInput(InputKind::Weights))?;
                self.weighted_probs(&request.predictions, weights)
            }
            CombineStrategy::Uncertainty => {
                let uncertainties = request
                    .uncertainties
                    .as_deref()
                    .ok_or(Error::MissingInput(InputKind::Uncertainties))?;
                self.weighted_uncert_probs(&request.predictions, uncertainties)
            }
        }
    }

    fn prepare(&self, classifiers: &[ProbMatrix]) -> Result<(usize, usize)> {
        if self.config.validate_inputs {
            validate::check_predictions(classifiers)
        } else {
            classifiers
                .first()
                .map(ProbMatrix::shape)
                .ok_or(Error::EmptyEnsemble)
        }
    }
}

/// Legacy unweighted average: returns the first matrix's values.
///
/// No validation is performed.
///
/// # Panics
/// Panics if `classifiers` is empty.
pub fn average_probs(classifiers: &[ProbMatrix]) -> ProbMatrix {
    average_kernel(CombineMode::Legacy, classifiers)
}

/// Legacy weighted combination: `(sum of weights) * first matrix`.
///
/// # Panics
/// Panics if `classifiers` is empty or `weights` is shorter than it.
pub fn weighted_probs(classifiers: &[ProbMatrix], weights: &[f64]) -> ProbMatrix {
    weighted_kernel(CombineMode::Legacy, classifiers, weights)
}

/// Legacy uncertainty-weighted combination.
///
/// Per-sample weights are computed for real, but every step multiplies the
/// first matrix, so rows with non-zero certainty mass reproduce it and rows
/// with zero mass become NaN.
///
/// # Panics
/// Panics if `classifiers` is empty, `uncertainties` is shorter than it, or
/// an uncertainty matrix has too few rows or no columns.
pub fn weighted_uncert_probs(classifiers: &[ProbMatrix], uncertainties: &[ProbMatrix]) -> ProbMatrix {
    let nrows = classifiers[0].nrows();
    let uncertainties = &uncertainties[..classifiers.len()];
    let weights = uncertainty_weights(uncertainties, nrows);
    uncertainty_kernel(CombineMode::Legacy, classifiers, &weights)
}

#[inline]
fn source(mode: CombineMode, classifiers: &[ProbMatrix], c: usize) -> &ProbMatrix {
    match mode {
        CombineMode::Legacy => &classifiers[0],
        CombineMode::Corrected => &classifiers[c],
    }
}

fn average_kernel(mode: CombineMode, classifiers: &[ProbMatrix]) -> ProbMatrix {
    let (nrows, ncols) = classifiers[0].shape();
    let mut out = ProbMatrix::zeros(nrows, ncols);

    for c in 0..classifiers.len() {
        let mat = source(mode, classifiers, c);
        for i in 0..nrows {
            for j in 0..ncols {
                out[(i, j)] += mat[(i, j)];
            }
        }
    }

    let n = classifiers.len() as f64;
    for i in 0..nrows {
        for j in 0..ncols {
            out[(i, j)] /= n;
        }
    }

    out
}

fn weighted_kernel(mode: CombineMode, classifiers: &[ProbMatrix], weights: &[f64]) -> ProbMatrix {
    let (nrows, ncols) = classifiers[0].shape();
    let mut out = ProbMatrix::zeros(nrows, ncols);

    for c in 0..classifiers.len() {
        let mat = source(mode, classifiers, c);
        let w = weights[c];
        for i in 0..nrows {
            for j in 0..ncols {
                out[(i, j)] += w * mat[(i, j)];
            }
        }
    }

    out
}

/// `weights` is `nrows x n_classifiers`
fn uncertainty_kernel(mode: CombineMode, classifiers: &[ProbMatrix], weights: &ProbMatrix) -> ProbMatrix {
    let (nrows, ncols) = classifiers[0].shape();
    let mut out = ProbMatrix::zeros(nrows, ncols);

    for c in 0..classifiers.len() {
        let mat = source(mode, classifiers, c);
        for i in 0..nrows {
            let w = weights[(i, c)];
            for j in 0..ncols {
                out[(i, j)] += w * mat[(i, j)];
            }
        }
    }

    out
}

fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        tracing::warn!("Weights sum to zero, leaving them unnormalized");
        return weights.to_vec();
    }
    weights.iter().map(|w| w / total).collect()
}
