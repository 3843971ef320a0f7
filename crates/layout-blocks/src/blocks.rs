mod builder;
pub use builder::Builder;

use crate::{
    engine::ConsistencyWarning, schema, BlockItem, Client, Error, JunctionDescriptor, Logging,
    Options, PermissionGate, Result, SetupResult,
};

use layout_blocks_core::ItemId;
use serde_json::Value;

use std::sync::Arc;

/// The blocks of one parent record's blocks field.
///
/// Holds the blocks loaded for the current parent in load order. Every
/// mutating operation checks the permission gate and placement rules
/// first, then calls the host, and only updates the in-memory list once
/// the host accepted the change.
#[derive(Debug)]
pub struct Blocks {
    pub(crate) client: Client,
    pub(crate) descriptor: Arc<JunctionDescriptor>,
    pub(crate) options: Arc<Options>,
    pub(crate) gate: Arc<dyn PermissionGate>,
    pub(crate) logging: Logging,

    pub(crate) parent: Option<ItemId>,
    pub(crate) blocks: Vec<BlockItem>,
    pub(crate) loading: bool,
    pub(crate) error: Option<Error>,
    pub(crate) warnings: Vec<ConsistencyWarning>,
    pub(crate) setup: Option<SetupResult>,
}

impl Blocks {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// An engine over an already probed junction.
    pub fn new(
        client: Client,
        descriptor: Arc<JunctionDescriptor>,
        options: Options,
        gate: Arc<dyn PermissionGate>,
    ) -> Blocks {
        Blocks {
            logging: client.logging(),
            client,
            descriptor,
            options: Arc::new(options),
            gate,
            parent: None,
            blocks: vec![],
            loading: false,
            error: None,
            warnings: vec![],
            setup: None,
        }
    }

    /// Loaded blocks, in load order.
    pub fn blocks(&self) -> &[BlockItem] {
        &self.blocks
    }

    pub fn block(&self, id: &ItemId) -> Option<&BlockItem> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn descriptor(&self) -> &JunctionDescriptor {
        &self.descriptor
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The error of the last failed load.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn warnings(&self) -> &[ConsistencyWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ConsistencyWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Outcome of field provisioning, when it ran on open.
    pub fn setup_result(&self) -> Option<&SetupResult> {
        self.setup.as_ref()
    }

    pub fn permissions(&self) -> &dyn PermissionGate {
        &*self.gate
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Initial payload for a new item of `collection`.
    pub async fn default_item_data(&self, collection: &str) -> Result<Value> {
        schema::default_item_data(&self.client, collection).await
    }
}
