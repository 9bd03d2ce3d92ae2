//! Error types for the tidechat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all tidechat operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Chat client error: {0}")]
    Client(#[from] ClientError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from one round trip with the model endpoint.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The endpoint answered 200 but the assistant content was empty or absent.
    #[error("Model returned an empty reply")]
    EmptyReply,

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from extracting text out of a single uploaded file.
///
/// These are always isolated to the file that produced them: a failing file
/// is reported and skipped, never aborting the rest of a batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {name}: {reason}")]
    Read { name: String, reason: String },

    #[error("Failed to extract PDF text from {name}: {reason}")]
    Pdf { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_converts_to_top_level() {
        let err: Error = ClientError::EmptyReply.into();
        assert!(matches!(err, Error::Client(_)));
        assert!(err.to_string().contains("empty reply"));
    }

    #[test]
    fn extract_error_converts_to_top_level() {
        let err: Error = ExtractError::Read {
            name: "a.txt".into(),
            reason: "permission denied".into(),
        }
        .into();
        assert!(matches!(err, Error::Extract(_)));
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn client_error_displays_status() {
        let err = ClientError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn extract_error_names_the_file() {
        let err = ExtractError::Pdf {
            name: "report.pdf".into(),
            reason: "encrypted document".into(),
        };
        assert!(err.to_string().contains("report.pdf"));
        assert!(err.to_string().contains("encrypted"));
    }
}
