use super::Error;

/// Error when a call to the host data API fails.
///
/// `status` is the HTTP status code, or `None` when the request never got a
/// response (connection refused, timeout, DNS failure).
#[derive(Debug)]
pub(super) struct RemoteError {
    pub(super) status: Option<u16>,
    message: Box<str>,
    pub(super) collection: Option<Box<str>>,
}

impl std::error::Error for RemoteError {}

impl core::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "remote call failed (status {}): {}",
                status, self.message
            ),
            None => write!(f, "remote call failed: {}", self.message),
        }
    }
}

impl Error {
    /// Creates a remote error.
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Remote(RemoteError {
            status,
            message: message.into().into(),
            collection: None,
        }))
    }

    /// Creates a remote error for a call against `collection`.
    pub fn remote_for(
        collection: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Remote(RemoteError {
            status,
            message: message.into().into(),
            collection: Some(collection.into().into()),
        }))
    }

    /// Returns `true` if this error is a remote error.
    pub fn is_remote(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::Remote(_)))
    }

    /// Returns `true` if the host rejected a create because the target
    /// already exists. Field provisioning treats this as success.
    pub fn is_already_exists(&self) -> bool {
        self.chain().any(|err| match err.kind() {
            super::ErrorKind::Remote(err) => err.message.contains("already exists"),
            _ => false,
        })
    }
}
