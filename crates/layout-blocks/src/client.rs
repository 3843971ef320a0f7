use crate::{Logging, RetryPolicy};

use layout_blocks_core::{
    driver::{operation::*, Driver, Operation, Response},
    schema::{Collection, Field, PermissionRecord, Relation, User},
    Error, Filter, ItemId, Query, Result,
};
use serde_json::Value;

use std::sync::Arc;

/// Typed access to the host API over a [`Driver`], retrying transient
/// failures according to a [`RetryPolicy`].
///
/// Cloning is cheap; clones share the driver.
#[derive(Debug, Clone)]
pub struct Client {
    driver: Arc<dyn Driver>,
    retry: RetryPolicy,
    logging: Logging,
}

impl Client {
    pub fn new(driver: impl Driver) -> Client {
        Client::from_arc(Arc::new(driver))
    }

    pub fn from_arc(driver: Arc<dyn Driver>) -> Client {
        Client {
            driver,
            retry: RetryPolicy::default(),
            logging: Logging::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Client {
        self.retry = retry;
        self
    }

    pub fn with_logging(mut self, logging: Logging) -> Client {
        self.logging = logging;
        self
    }

    pub fn logging(&self) -> Logging {
        self.logging
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Executes `op`, retrying connectivity and server-side failures.
    pub async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();
        let mut attempt = 0;

        loop {
            debug!(self.logging, %op, attempt, "exec");

            match self.driver.exec(op.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        %op,
                        attempt,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        error = %err,
                        "request failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    debug!(self.logging, %op, error = %err, "request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Metadata of one field. `None` when the host does not know the field.
    pub async fn field(&self, collection: &str, field: &str) -> Result<Option<Field>> {
        let op = GetField {
            collection: collection.to_string(),
            field: field.to_string(),
        };

        match self.exec(op).await {
            Ok(response) if response.data.is_null() => Ok(None),
            Ok(response) => response.deserialize().map(Some),
            Err(err) if matches!(err.status(), Some(403 | 404)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn fields(&self, collection: &str) -> Result<Vec<Field>> {
        let op = GetFields {
            collection: collection.to_string(),
        };
        rows(self.exec(op).await?)
    }

    pub async fn create_field(&self, collection: &str, definition: Value) -> Result<()> {
        let op = CreateField {
            collection: collection.to_string(),
            definition,
        };
        self.exec(op).await?;
        Ok(())
    }

    pub async fn relations(&self, filter: Option<Filter>) -> Result<Vec<Relation>> {
        rows(self.exec(GetRelations { filter }).await?)
    }

    pub async fn collections(&self) -> Result<Vec<Collection>> {
        rows(self.exec(GetCollections).await?)
    }

    pub async fn query_items(&self, collection: &str, query: Query) -> Result<Response> {
        let op = QueryItems {
            collection: collection.to_string(),
            query,
        };
        self.exec(op).await
    }

    pub async fn get_item(&self, collection: &str, id: ItemId, fields: &[&str]) -> Result<Value> {
        let op = GetItem {
            collection: collection.to_string(),
            id,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        self.exec(op).await?.into_record()
    }

    pub async fn create_item(&self, collection: &str, data: Value) -> Result<Value> {
        let op = CreateItem {
            collection: collection.to_string(),
            data,
        };
        self.exec(op).await?.into_record()
    }

    /// Patches one record. Returns the updated record, or `null` when the host
    /// replies without a body.
    pub async fn update_item(&self, collection: &str, id: ItemId, data: Value) -> Result<Value> {
        let op = UpdateItem {
            collection: collection.to_string(),
            id,
            data,
        };
        Ok(self.exec(op).await?.into_data())
    }

    pub async fn update_items(&self, collection: &str, filter: Filter, data: Value) -> Result<()> {
        let op = UpdateItems {
            collection: collection.to_string(),
            filter,
            data,
        };
        self.exec(op).await?;
        Ok(())
    }

    pub async fn delete_item(&self, collection: &str, id: ItemId) -> Result<()> {
        let op = DeleteItem {
            collection: collection.to_string(),
            id,
        };
        self.exec(op).await?;
        Ok(())
    }

    /// Permission records of the current user.
    pub async fn permissions(&self) -> Result<Vec<PermissionRecord>> {
        let response = self.exec(GetPermissions).await?;
        if !response.data.is_array() {
            return Err(Error::invalid_response(
                "permission data is not a list of records",
            ));
        }
        response.deserialize()
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        let op = GetCurrentUser {
            fields: vec!["id".to_string(), "role.id".to_string(), "role.admin_access".to_string()],
        };
        let response = self.exec(op).await?;
        if response.data.is_null() {
            return Ok(None);
        }
        response.deserialize().map(Some)
    }
}

fn rows<T: serde::de::DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    response
        .into_rows()?
        .into_iter()
        .map(|row| Ok(serde_json::from_value(row)?))
        .collect()
}
