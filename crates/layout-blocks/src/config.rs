//! Per-instance settings: field options, area definitions, logging, and the
//! transport retry policy.

mod area;
pub use area::AreaConfig;

mod logging;
pub use logging::Logging;

mod options;
pub use options::Options;

mod retry;
pub use retry::RetryPolicy;
