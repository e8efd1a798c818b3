use thiserror::Error;

/// Application-level error type.
/// Every variant is fatal for the invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed configuration (store URI, database, collection, API key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document store could not be reached or rejected the handshake.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Retrieval failed after a connection was established.
    #[error("Query error: {0}")]
    Query(String),

    /// The language model call failed or produced nothing usable.
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    /// Short machine-friendly code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_detail() {
        let err = AppError::Query("collection 'jobs' unreachable".to_string());
        assert_eq!(
            err.to_string(),
            "Query error: collection 'jobs' unreachable"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            AppError::Configuration(String::new()).code(),
            AppError::Connection(String::new()).code(),
            AppError::Query(String::new()).code(),
            AppError::ExternalService(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
