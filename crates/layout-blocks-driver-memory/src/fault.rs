use layout_blocks_core::{
    driver::{operation::Method, Operation},
    Error,
};

/// A failure the host injects into matching requests.
///
/// Matches every request unless narrowed with [`Fault::on`] and
/// [`Fault::path`], and fires every time unless limited with
/// [`Fault::times`].
#[derive(Debug, Clone)]
pub struct Fault {
    method: Option<Method>,
    path: Option<String>,
    status: Option<u16>,
    message: String,
    remaining: Option<usize>,
}

impl Fault {
    /// Fail with an HTTP status.
    pub fn status(status: u16, message: impl Into<String>) -> Fault {
        Fault {
            method: None,
            path: None,
            status: Some(status),
            message: message.into(),
            remaining: None,
        }
    }

    /// Fail as if the host could not be reached.
    pub fn unreachable() -> Fault {
        Fault {
            method: None,
            path: None,
            status: None,
            message: "connection refused".to_string(),
            remaining: None,
        }
    }

    pub fn on(mut self, method: Method) -> Fault {
        self.method = Some(method);
        self
    }

    /// Only requests whose path starts with `prefix`.
    pub fn path(mut self, prefix: impl Into<String>) -> Fault {
        self.path = Some(prefix.into());
        self
    }

    pub fn times(mut self, times: usize) -> Fault {
        self.remaining = Some(times);
        self
    }

    pub(crate) fn is_spent(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Returns the error to report when the fault applies to `op`, consuming
    /// one of its remaining firings.
    pub(crate) fn fire(&mut self, op: &Operation) -> Option<Error> {
        if self.is_spent() {
            return None;
        }
        if self.method.is_some_and(|method| method != op.method()) {
            return None;
        }
        if self
            .path
            .as_ref()
            .is_some_and(|prefix| !op.path().starts_with(prefix.as_str()))
        {
            return None;
        }

        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }

        Some(match op.collection() {
            Some(collection) => Error::remote_for(collection, self.status, self.message.clone()),
            None => Error::remote(self.status, self.message.clone()),
        })
    }
}
