mod adhoc;
mod block_not_found;
mod invalid_response;
mod permission;
mod remote;
mod schema;
mod validation;

use adhoc::AdhocError;
use block_not_found::BlockNotFoundError;
use invalid_response::InvalidResponseError;
use permission::PermissionError;
use remote::RemoteError;
use schema::SchemaError;
use std::sync::Arc;
use validation::ValidationError;

/// An error that can occur while probing, provisioning, or editing blocks.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Finds the first error in the chain that is not ad-hoc context.
    fn root_kind(&self) -> &ErrorKind {
        self.chain()
            .map(Error::kind)
            .find(|kind| !matches!(kind, ErrorKind::Adhoc(_) | ErrorKind::Unknown))
            .unwrap_or_else(|| self.kind())
    }

    /// The collection the error refers to, if any.
    pub fn collection(&self) -> Option<&str> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Schema(err) => Some(&*err.collection),
            ErrorKind::Validation(err) => err.collection.as_deref(),
            ErrorKind::Permission(err) => Some(&*err.collection),
            ErrorKind::Remote(err) => err.collection.as_deref(),
            _ => None,
        })
    }

    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Schema(err) => err.field.as_deref(),
            ErrorKind::Validation(err) => err.field.as_deref(),
            _ => None,
        })
    }

    /// The HTTP status of a remote failure. `None` for connectivity failures
    /// and for every other error kind.
    pub fn status(&self) -> Option<u16> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Remote(err) => err.status,
            _ => None,
        })
    }

    /// Returns `true` if the failed call may succeed when issued again:
    /// connectivity failures and server-side (5xx) failures.
    pub fn is_retryable(&self) -> bool {
        match self.root_kind() {
            ErrorKind::Remote(err) => err.status.map_or(true, |status| status >= 500),
            _ => false,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Schema(SchemaError),
    Validation(ValidationError),
    Permission(PermissionError),
    Remote(RemoteError),
    BlockNotFound(BlockNotFoundError),
    InvalidResponse(InvalidResponseError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Schema(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
            Permission(err) => core::fmt::Display::fmt(err, f),
            Remote(err) => core::fmt::Display::fmt(err, f),
            BlockNotFound(err) => core::fmt::Display::fmt(err, f),
            InvalidResponse(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown layout blocks error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::invalid_response(err.to_string())
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
