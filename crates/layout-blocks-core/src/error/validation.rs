use super::Error;

/// Error when an operation violates a placement constraint.
///
/// This occurs when:
/// - An area is full (`max_items`, per-area or total limits)
/// - A collection is not allowed in the area or on the field
/// - The source or target area is locked
/// - An area id is malformed
/// - The parent record has not been saved yet
#[derive(Debug)]
pub(super) struct ValidationError {
    message: Box<str>,
    pub(super) collection: Option<Box<str>>,
    pub(super) field: Option<Box<str>>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "validation failed: {}", self.message)
    }
}

impl Error {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            message: message.into().into(),
            collection: None,
            field: None,
        }))
    }

    /// Creates a validation error that names the offending collection.
    pub fn validation_for(collection: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            message: message.into().into(),
            collection: Some(collection.into().into()),
            field: None,
        }))
    }

    /// Creates a validation error that names the offending collection field.
    pub fn validation_field(
        collection: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            message: message.into().into(),
            collection: Some(collection.into().into()),
            field: Some(field.into().into()),
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::Validation(_)))
    }
}
