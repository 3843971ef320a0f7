use super::Error;

/// Error when an operation names a block that is not loaded.
#[derive(Debug)]
pub(super) struct BlockNotFoundError {
    id: Box<str>,
}

impl std::error::Error for BlockNotFoundError {}

impl core::fmt::Display for BlockNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "block {} not found", self.id)
    }
}

impl Error {
    /// Creates a block-not-found error.
    pub fn block_not_found(id: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::BlockNotFound(BlockNotFoundError {
            id: id.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a block-not-found error.
    pub fn is_block_not_found(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::BlockNotFound(_)))
    }
}
