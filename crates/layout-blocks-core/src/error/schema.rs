use super::Error;

/// Error when the junction structure of a block field cannot be determined.
///
/// This occurs when:
/// - The field does not exist or is not a many-to-any relation field
/// - No junction collection can be found through field metadata, relation
///   records, or the naming convention
/// - The junction collection lacks the item or collection-type column
///
/// These errors are not retried: the relation must be reconfigured first.
#[derive(Debug)]
pub(super) struct SchemaError {
    pub(super) collection: Box<str>,
    pub(super) field: Option<Box<str>>,
    message: Box<str>,
}

impl std::error::Error for SchemaError {}

impl core::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "invalid block schema for {}.{}: {}",
                self.collection, field, self.message
            ),
            None => write!(
                f,
                "invalid block schema for {}: {}",
                self.collection, self.message
            ),
        }
    }
}

impl Error {
    /// Creates a schema error for the given collection and (optionally) field.
    pub fn schema(
        collection: impl Into<String>,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Schema(SchemaError {
            collection: collection.into().into(),
            field: field.map(Into::into),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a schema error.
    pub fn is_schema(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::Schema(_)))
    }
}
