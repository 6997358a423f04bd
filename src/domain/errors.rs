use thiserror::Error;

/// Errors surfaced by the prediction pipeline.
///
/// The set is deliberately coarse: value-coercion problems and model runtime
/// faults both collapse into [`PredictError::Inference`], matching the single
/// catch-all the service has always presented to clients. Only a missing
/// input field is a client error.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Models or scaler not loaded.")]
    NotReady,

    #[error("Missing feature in input data: '{0}'")]
    MissingFeature(String),

    #[error("An error occurred: {0}")]
    Inference(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl PredictError {
    /// True for faults the client can fix by changing the request body.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::MissingFeature(_))
    }
}

impl From<sqlx::Error> for PredictError {
    fn from(e: sqlx::Error) -> Self {
        PredictError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_feature_names_the_field() {
        let err = PredictError::MissingFeature("chol".to_string());
        let msg = err.to_string();
        assert!(msg.contains("chol"));
        assert!(msg.starts_with("Missing feature in input data"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_server_side_errors_are_not_client_errors() {
        assert!(!PredictError::NotReady.is_client_error());
        assert!(!PredictError::Inference("boom".into()).is_client_error());
        assert!(!PredictError::Database("locked".into()).is_client_error());
    }
}
