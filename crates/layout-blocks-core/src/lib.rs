#[macro_use]
mod macros;

pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError};

pub mod query;
pub use query::{Filter, Query};

pub mod schema;
pub use schema::ItemId;

/// A Result type alias that uses the layout blocks [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
