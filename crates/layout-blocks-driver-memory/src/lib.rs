mod fault;
pub use fault::Fault;

mod host;
use host::Host;

mod value;

use layout_blocks_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    err,
    schema::{Collection, Field, PermissionRecord, Relation, User},
    ItemId, Result,
};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// An in-process host holding collections, fields, relations, items,
/// permissions, and the current user.
///
/// Every executed operation is recorded, and failures can be injected with
/// [`Fault`]s. Listings follow the host's conventions: a default page size
/// of 100 unless `limit=-1`, `-key` for descending sort, and relation
/// expansion through `rel.*` and `rel:collection.*` field selectors.
#[derive(Debug, Default)]
pub struct Memory {
    host: Mutex<Host>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Opens an empty host for a `memory://` URL.
    pub fn connect(url: &str) -> Result<Memory> {
        let url = Url::parse(url).map_err(|e| err!("invalid host URL `{url}`: {e}"))?;
        if url.scheme() != "memory" {
            return Err(err!(
                "host URL does not have a `memory` scheme; url={url}"
            ));
        }
        Ok(Memory::new())
    }

    /// Adds a collection backed by a table, with an integer `id` primary key.
    pub fn add_collection(&self, name: &str) -> &Self {
        self.lock().add_collection(host::table(name));
        self
    }

    /// Adds a folder: a collection with metadata but no table.
    pub fn add_folder(&self, name: &str) -> &Self {
        self.lock().add_collection(Collection {
            collection: name.to_string(),
            meta: Some(serde_json::json!({ "collection": name })),
            schema: None,
        });
        self
    }

    /// Adds or replaces a field, creating its collection when needed.
    pub fn add_field(&self, field: Field) -> &Self {
        self.lock().add_field(field);
        self
    }

    pub fn add_relation(&self, relation: Relation) -> &Self {
        self.lock().relations.push(relation);
        self
    }

    /// Stores a record, assigning the next integer id when it has none.
    pub fn insert(&self, collection: &str, data: Value) -> Result<ItemId> {
        let mut host = self.lock();
        let pk = host.primary_key(collection);
        let row = host.create_item(collection, data)?;
        row.get(&pk)
            .and_then(ItemId::from_value)
            .ok_or_else(|| err!("record in `{collection}` has no usable `{pk}`"))
    }

    /// Every record of `collection`, in insertion order.
    pub fn rows(&self, collection: &str) -> Vec<Value> {
        let host = self.lock();
        host.rows(collection)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    pub fn item(&self, collection: &str, id: impl Into<ItemId>) -> Option<Value> {
        let id = id.into().to_value();
        let host = self.lock();
        let pk = host.primary_key(collection);
        host.rows(collection)
            .ok()?
            .iter()
            .find(|row| row.get(&pk).is_some_and(|v| value::same_id(v, &id)))
            .cloned()
            .map(Value::Object)
    }

    pub fn field(&self, collection: &str, field: &str) -> Option<Field> {
        self.lock().field(collection, field).cloned()
    }

    pub fn set_permissions(&self, permissions: Vec<PermissionRecord>) -> &Self {
        self.lock().permissions = permissions;
        self
    }

    pub fn set_user(&self, user: Option<User>) -> &Self {
        self.lock().user = user;
        self
    }

    pub fn inject(&self, fault: Fault) -> &Self {
        self.lock().faults.push(fault);
        self
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Operations executed so far, including failed ones.
    pub fn requests(&self) -> Vec<Operation> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Host> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, op: Operation) -> Result<Response> {
        self.lock().exec(op)
    }
}
