use super::Error;

/// Error when the current user lacks the right to perform an action.
#[derive(Debug)]
pub(super) struct PermissionError {
    pub(super) collection: Box<str>,
    action: Box<str>,
}

impl std::error::Error for PermissionError {}

impl core::fmt::Display for PermissionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "permission denied: cannot {} items in `{}`",
            self.action, self.collection
        )
    }
}

impl Error {
    /// Creates a permission error for `action` on `collection`.
    pub fn permission(collection: impl Into<String>, action: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Permission(PermissionError {
            collection: collection.into().into(),
            action: action.into().into(),
        }))
    }

    /// Returns `true` if this error is a permission error.
    pub fn is_permission(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::Permission(_)))
    }
}
