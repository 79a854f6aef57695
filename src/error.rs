//! Error types for the inspection service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Inspection Error Enum ==
/// Unified error type for cache provisioning and parameter inspection.
#[derive(Error, Debug)]
pub enum InspectionError {
    /// Invalid or missing configuration (cache spec fields, cluster nodes)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator was used before it was initialized
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Caller supplied an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Cache backend failure on get/put
    #[error("Cache error: {0}")]
    Cache(String),

    /// Durable template store failure
    #[error("Template store error: {0}")]
    Store(String),

    /// Parameter comparator failure
    #[error("Comparison error: {0}")]
    Comparison(String),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for InspectionError {
    fn into_response(self) -> Response {
        let status = match &self {
            InspectionError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            InspectionError::Cache(_) | InspectionError::Store(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            InspectionError::Configuration(_)
            | InspectionError::IllegalState(_)
            | InspectionError::Comparison(_)
            | InspectionError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the inspection service.
pub type Result<T> = std::result::Result<T, InspectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let response = InspectionError::InvalidArgument("actual is null".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cache_error_maps_to_unavailable() {
        let response = InspectionError::Cache("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_configuration_error_message() {
        let err = InspectionError::Configuration("Max size must be positive".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: Max size must be positive"
        );
    }
}
