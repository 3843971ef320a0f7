/// Emits a `tracing::debug!` event only when debug logging is switched on
/// for this instance. Warnings and errors are always emitted directly.
macro_rules! debug {
    ($logging:expr, $($arg:tt)+) => {
        if $logging.is_debug() {
            tracing::debug!($($arg)+);
        }
    };
}
