//! Linear estimate of how long transcription will take, used to drive a
//! progress countdown while the upload is in flight.

use serde::Deserialize;

use crate::error::Result;

/// Coefficients of the fitted model, `y = coefficient * x + intercept`.
/// Constructed once from configuration and passed to whoever needs an
/// estimate; there is no process-wide instance.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EstimatorParams {
    pub coefficient: f32,
    pub intercept: f32,
}

impl EstimatorParams {
    /// Parses `{"coefficient": ..., "intercept": ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Predicted transcription duration in seconds for audio of the given
    /// length.
    pub fn predict(&self, audio_len_secs: f32) -> f32 {
        self.coefficient * audio_len_secs + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_and_predict() {
        let params = EstimatorParams::from_json(r#"{"coefficient": 1.2, "intercept": 15.0}"#)
            .unwrap();
        assert_eq!(params.predict(120.0), 159.0);
        assert_eq!(params.predict(0.0), 15.0);
    }

    #[test]
    fn malformed_params_are_rejected() {
        assert!(EstimatorParams::from_json(r#"{"coefficient": 1.2}"#).is_err());
    }
}
