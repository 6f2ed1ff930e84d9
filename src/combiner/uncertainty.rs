//! Per-sample weights derived from classifier uncertainty
//!
//! For sample `i` the certainty mass is `sum_c (1 - u_c[i])` and classifier
//! `c` receives `(1 - u_c[i]) / mass[i]`. Only column 0 of each uncertainty
//! matrix is read.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::ProbMatrix;

/// What to do with a sample whose certainty mass is zero
///
/// Only an exact `0.0` mass counts. A tiny non-zero mass left by
/// cancellation is not degenerate: its weights stay finite but can be very
/// large, and `Uniform` / `Error` do not apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Keep the literal division result (NaN or +/-inf)
    #[default]
    Propagate,
    /// Replace the row's weights with 1/N
    Uniform,
    /// Fail with `Error::DegenerateCertainty`
    Error,
}

/// Certainty mass per sample: `sum_c (1 - uncertainties[c][i][0])`
///
/// # Panics
/// Panics if an uncertainty matrix has fewer than `nrows` rows or no columns.
pub fn certainty_mass(uncertainties: &[ProbMatrix], nrows: usize) -> Vec<f64> {
    let mut mass = vec![0.0; nrows];
    for unc in uncertainties {
        for (i, m) in mass.iter_mut().enumerate() {
            *m += 1.0 - unc[(i, 0)];
        }
    }
    mass
}

/// Raw per-sample weights, `nrows x n_classifiers`
///
/// Uses literal floating-point division, so rows with zero mass come out as
/// NaN or infinite. Rows with non-zero mass sum to 1.
///
/// # Panics
/// Panics if an uncertainty matrix has fewer than `nrows` rows or no columns.
pub fn uncertainty_weights(uncertainties: &[ProbMatrix], nrows: usize) -> ProbMatrix {
    let mass = certainty_mass(uncertainties, nrows);
    weights_from_mass(uncertainties, &mass)
}

pub(crate) fn weights_from_mass(uncertainties: &[ProbMatrix], mass: &[f64]) -> ProbMatrix {
    let mut weights = ProbMatrix::zeros(mass.len(), uncertainties.len());

    for (c, unc) in uncertainties.iter().enumerate() {
        for (i, m) in mass.iter().enumerate() {
            weights[(i, c)] = (1.0 - unc[(i, 0)]) / m;
        }
    }

    weights
}

/// Indices of samples whose certainty mass is exactly zero
///
/// No tolerance is applied; `1e-300` is not degenerate.
pub fn degenerate_rows(mass: &[f64]) -> Vec<usize> {
    mass.iter()
        .enumerate()
        .filter(|(_, m)| **m == 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Apply `policy` to the weight rows flagged by `degenerate_rows`
pub(crate) fn resolve_degenerate(
    weights: &mut ProbMatrix,
    mass: &[f64],
    policy: DegeneratePolicy,
) -> Result<()> {
    let rows = degenerate_rows(mass);
    if rows.is_empty() {
        return Ok(());
    }

    match policy {
        DegeneratePolicy::Propagate => {
            tracing::warn!(
                "{} sample(s) have zero certainty mass, weights propagate NaN/inf (first: {})",
                rows.len(),
                rows[0]
            );
            Ok(())
        }
        DegeneratePolicy::Uniform => {
            let n = weights.ncols();
            let uniform = 1.0 / n as f64;
            for &i in &rows {
                for c in 0..n {
                    weights[(i, c)] = uniform;
                }
            }
            tracing::warn!(
                "{} sample(s) have zero certainty mass, using uniform weights 1/{}",
                rows.len(),
                n
            );
            Ok(())
        }
        DegeneratePolicy::Error => Err(Error::DegenerateCertainty { row: rows[0] }),
    }
}
