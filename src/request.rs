//! Serializable combine request
//!
//! Bundles the inputs of any of the three policies so a caller can hand the
//! whole ensemble to `EnsembleCombiner::combine` in one value.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::ProbMatrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineRequest {
    /// One prediction matrix per classifier
    pub predictions: Vec<ProbMatrix>,
    /// One weight per classifier (weighted policy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    /// One uncertainty column per classifier (uncertainty policy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainties: Option<Vec<ProbMatrix>>,
}

impl CombineRequest {
    pub fn new(predictions: Vec<ProbMatrix>) -> Self {
        Self {
            predictions,
            weights: None,
            uncertainties: None,
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_uncertainties(mut self, uncertainties: Vec<ProbMatrix>) -> Self {
        self.uncertainties = Some(uncertainties);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn n_classifiers(&self) -> usize {
        self.predictions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_minimal_request() {
        let request = CombineRequest::from_json(r#"{"predictions": [[[0.2, 0.8]], [[0.6, 0.4]]]}"#).unwrap();
        assert_eq!(request.n_classifiers(), 2);
        assert_eq!(request.predictions[1].shape(), (1, 2));
        assert!(request.weights.is_none());
        assert!(request.uncertainties.is_none());
    }

    #[test]
    fn test_parse_full_request() {
        let json = r#"{
            "predictions": [[[0.2, 0.8], [0.5, 0.5]], [[0.6, 0.4], [0.1, 0.9]]],
            "weights": [0.25, 0.75],
            "uncertainties": [[[0.1], [0.3]], [[0.2], [0.4]]]
        }"#;
        let request = CombineRequest::from_json(json).unwrap();
        assert_eq!(request.weights, Some(vec![0.25, 0.75]));

        let uncertainties = request.uncertainties.unwrap();
        assert_eq!(uncertainties.len(), 2);
        assert_eq!(uncertainties[1][(1, 0)], 0.4);
    }

    #[test]
    fn test_ragged_prediction_rejected() {
        let err = CombineRequest::from_json(r#"{"predictions": [[[0.2, 0.8], [0.5]]]}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_serialize_skips_missing_inputs() {
        let request = CombineRequest::new(vec![ProbMatrix::from_column(vec![1.0])]);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"predictions":[[[1.0]]]}"#);
    }

    #[test]
    fn test_builder() {
        let request = CombineRequest::new(vec![ProbMatrix::zeros(2, 2)])
            .with_weights(vec![1.0])
            .with_uncertainties(vec![ProbMatrix::from_column(vec![0.0, 0.5])]);
        assert_eq!(request.weights.as_deref(), Some(&[1.0][..]));
        assert_eq!(request.uncertainties.as_ref().map(Vec::len), Some(1));
    }
}
