//! Precondition checks run before any arithmetic when validation is enabled

use crate::error::{Error, InputKind, Result};
use crate::matrix::ProbMatrix;

/// Non-empty, and every matrix has the first matrix's shape.
/// Returns that shape.
pub fn check_predictions(classifiers: &[ProbMatrix]) -> Result<(usize, usize)> {
    let first = classifiers.first().ok_or(Error::EmptyEnsemble)?;
    let expected = first.shape();

    for (index, matrix) in classifiers.iter().enumerate().skip(1) {
        if matrix.shape() != expected {
            return Err(Error::ShapeMismatch {
                kind: InputKind::Predictions,
                index,
                expected,
                actual: matrix.shape(),
            });
        }
    }

    Ok(expected)
}

pub fn check_weights(n_classifiers: usize, weights: &[f64]) -> Result<()> {
    if weights.len() != n_classifiers {
        return Err(Error::LengthMismatch {
            kind: InputKind::Weights,
            expected: n_classifiers,
            actual: weights.len(),
        });
    }
    Ok(())
}

/// One uncertainty matrix per classifier, each with `nrows` rows and at
/// least one column.
pub fn check_uncertainties(
    n_classifiers: usize,
    nrows: usize,
    uncertainties: &[ProbMatrix],
) -> Result<()> {
    if uncertainties.len() != n_classifiers {
        return Err(Error::LengthMismatch {
            kind: InputKind::Uncertainties,
            expected: n_classifiers,
            actual: uncertainties.len(),
        });
    }

    for (index, unc) in uncertainties.iter().enumerate() {
        if unc.nrows() != nrows || unc.ncols() == 0 {
            return Err(Error::ShapeMismatch {
                kind: InputKind::Uncertainties,
                index,
                expected: (nrows, unc.ncols().max(1)),
                actual: unc.shape(),
            });
        }
    }

    Ok(())
}
