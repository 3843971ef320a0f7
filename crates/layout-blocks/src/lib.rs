#[macro_use]
mod macros;

mod blocks;
pub use blocks::{Blocks, Builder};

pub mod client;
pub use client::Client;

pub mod config;
pub use config::{AreaConfig, Logging, Options, RetryPolicy};

mod connect;
pub use connect::Connect;

pub mod engine;
pub use engine::{BlockItem, ConsistencyWarning};

pub mod permission;
pub use permission::{PermissionGate, Permissions, UserPermissions};

pub mod probe;
pub use probe::Prober;

pub mod provision;
pub use provision::{Provisioner, SetupResult};

pub mod schema;
pub use schema::{DescriptorCache, JunctionDescriptor, SortStorage};

pub mod validate;

pub use layout_blocks_core::{
    driver::{self, Driver},
    query::{Filter, Query},
    schema::{Action, ItemId},
    Error, Result,
};

