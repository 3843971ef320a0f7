mod response;
pub use response::Response;

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

/// Transport to the host's data and metadata API.
///
/// A driver executes one [`Operation`] per call and reports failures as
/// remote errors carrying the HTTP status (or none, for connectivity
/// failures). Retrying is the caller's concern.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute an API operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
