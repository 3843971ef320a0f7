/// Logging switch for one layout blocks instance.
///
/// Debug events (`tracing::debug!`) are only emitted when `debug` is set.
/// Warnings and errors are emitted unconditionally; the subscriber decides
/// what to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logging {
    debug: bool,
}

impl Logging {
    pub fn new(debug: bool) -> Logging {
        Logging { debug }
    }

    /// Debug logging switched on.
    pub fn debug() -> Logging {
        Logging { debug: true }
    }

    /// Only warnings and errors.
    pub fn quiet() -> Logging {
        Logging { debug: false }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }
}
