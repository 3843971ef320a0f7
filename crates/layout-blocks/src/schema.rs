//! The inferred shape of a blocks junction and its process-wide cache.

mod cache;
pub use cache::DescriptorCache;

mod defaults;
pub use defaults::{default_item_data, default_value_for};

mod descriptor;
pub use descriptor::{JunctionDescriptor, SortStorage};
