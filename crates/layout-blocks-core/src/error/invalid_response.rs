use super::Error;

/// Error when the host answers with a body of an unexpected shape.
///
/// This occurs when:
/// - The body is not JSON, or lacks the `data` envelope
/// - A record is missing its identity column
/// - A metadata record cannot be deserialized
#[derive(Debug)]
pub(super) struct InvalidResponseError {
    message: Box<str>,
}

impl std::error::Error for InvalidResponseError {}

impl core::fmt::Display for InvalidResponseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid response: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidResponse(InvalidResponseError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid response error.
    pub fn is_invalid_response(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::InvalidResponse(_)))
    }
}
