//! Error types for the data service client.

use thiserror::Error;

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the data service client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request could not be sent, or the response body could not be
    /// read or decoded
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

impl ApiError {
    /// Full error message including the response body, when one was captured.
    ///
    /// Useful when surfacing detailed error information to users.
    pub fn full_message(&self) -> String {
        match self {
            ApiError::Status {
                endpoint,
                status,
                body,
            } if !body.is_empty() => {
                format!("{endpoint} returned HTTP {status}: {body}")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            endpoint: "/tasks",
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "/tasks returned HTTP 503");
    }

    #[test]
    fn test_status_full_message_includes_body() {
        let err = ApiError::Status {
            endpoint: "/bugs",
            status: 400,
            body: "missing filter".to_string(),
        };
        assert_eq!(err.full_message(), "/bugs returned HTTP 400: missing filter");
    }

    #[test]
    fn test_status_full_message_without_body_matches_display() {
        let err = ApiError::Status {
            endpoint: "/tasks/stats",
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.full_message(), err.to_string());
    }

    #[test]
    fn test_api_result_type_alias() {
        let ok: ApiResult<u8> = Ok(7);
        assert_eq!(ok.unwrap(), 7);

        let err: ApiResult<u8> = Err(ApiError::Status {
            endpoint: "/tasks",
            status: 404,
            body: String::new(),
        });
        assert!(err.is_err());
    }
}
