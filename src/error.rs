//! Error types for the synthetics provider.

use thiserror::Error;

/// Errors raised by the compressed payload codec.
///
/// Payloads are always produced by [`crate::codec::compress_and_encode`], so
/// any of these indicates local corruption and is never downgraded to a
/// warning.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload is not valid standard base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The zlib stream could not be written or read.
    #[error("zlib stream error: {0}")]
    Io(#[from] std::io::Error),

    /// The decompressed bytes are not UTF-8 text.
    #[error("decompressed payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur while managing a synthetic test resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A compressed payload could not be decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Service temporarily unavailable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Operation timed out.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// An unexpected failure in the vendor API or the provider itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Get the error message as a string.
    ///
    /// Returns a reference to the error message for any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) => msg,
            Self::Validation(msg) => msg,
            Self::Configuration(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::Codec(_err) => "codec error (see Debug output)",
            Self::Unavailable(msg) => msg,
            Self::DeadlineExceeded(msg) => msg,
            Self::Internal(msg) => msg,
        }
    }

    /// Whether the error means the remote object does not exist (yet).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("abc-def-ghi".to_string());
        assert_eq!(format!("{}", err), "Resource not found: abc-def-ghi");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("custom_resource".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: custom_resource");

        let err = ProviderError::DeadlineExceeded("timeout".to_string());
        assert_eq!(format!("{}", err), "Deadline exceeded: timeout");
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::NotFound("abc-def-ghi".to_string());
        assert_eq!(err.message(), "abc-def-ghi");

        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(err.message(), "invalid config");

        let err = ProviderError::Codec(CodecError::Utf8(
            String::from_utf8(vec![0xff, 0xfe]).unwrap_err(),
        ));
        assert_eq!(err.message(), "codec error (see Debug output)");
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());
        assert!(!ProviderError::Unavailable("x".to_string()).is_not_found());
    }

    #[test]
    fn test_codec_error_conversion() {
        let codec = CodecError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ));
        let err: ProviderError = codec.into();
        assert!(matches!(err, ProviderError::Codec(CodecError::Io(_))));
        assert!(format!("{}", err).starts_with("Codec error: zlib stream error"));
    }
}
