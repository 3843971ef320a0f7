use super::Blocks;
use crate::{
    Client, Connect, DescriptorCache, Driver, Logging, Options, PermissionGate, Permissions, Prober,
    Provisioner, Result, RetryPolicy,
};

use std::sync::Arc;

/// Configures and opens a [`Blocks`] engine.
#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
    logging: Logging,
    retry: RetryPolicy,
    gate: Option<Arc<dyn PermissionGate>>,
    cache: Option<Arc<DescriptorCache>>,
}

impl Builder {
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn logging(&mut self, logging: Logging) -> &mut Self {
        self.logging = logging;
        self
    }

    pub fn retry(&mut self, retry: RetryPolicy) -> &mut Self {
        self.retry = retry;
        self
    }

    /// Use `gate` instead of loading the current user's permissions.
    pub fn permissions(&mut self, gate: impl PermissionGate) -> &mut Self {
        self.gate = Some(Arc::new(gate));
        self
    }

    /// Share probed descriptors with other engines.
    pub fn cache(&mut self, cache: Arc<DescriptorCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    pub async fn open(&self, driver: impl Driver, collection: &str, field: &str) -> Result<Blocks> {
        let client = Client::new(driver);
        self.open_with(client, collection, field).await
    }

    /// Opens the engine over the host at `url`. See [`Connect`].
    pub async fn connect(&self, url: &str, collection: &str, field: &str) -> Result<Blocks> {
        self.open(Connect::new(url)?, collection, field).await
    }

    /// Probes the junction behind `collection.field`, provisions missing
    /// columns when enabled, and loads permissions unless a gate was given.
    pub async fn open_with(&self, client: Client, collection: &str, field: &str) -> Result<Blocks> {
        let client = client.with_retry(self.retry).with_logging(self.logging);
        let cache = self.cache.clone().unwrap_or_default();

        let prober = Prober::new(client.clone(), &self.options);
        let mut descriptor = cache.get_or_probe(&prober, collection, field).await?;

        let setup = if self.options.auto_setup {
            let result = Provisioner::new(client.clone())
                .ensure_required_fields(&descriptor, &self.options)
                .await;
            if result.descriptor != *descriptor {
                descriptor = cache.insert(result.descriptor.clone());
            }
            Some(result)
        } else {
            None
        };

        let gate: Arc<dyn PermissionGate> = match &self.gate {
            Some(gate) => gate.clone(),
            None => Arc::new(Permissions::fetch(&client).await),
        };

        let mut blocks = Blocks::new(client, descriptor, self.options.clone(), gate);
        blocks.setup = setup;
        Ok(blocks)
    }
}
