use crate::{value, Fault};

use indexmap::IndexMap;
use layout_blocks_core::{
    driver::{operation::*, Operation, Response},
    schema::{Collection, Field, PermissionRecord, Relation, User},
    Error, Filter, Result,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Page size applied when a listing sets no limit.
const DEFAULT_LIMIT: usize = 100;

type Row = Map<String, Value>;

/// State of the in-process host.
#[derive(Debug, Default)]
pub(crate) struct Host {
    pub(crate) collections: IndexMap<String, Collection>,
    pub(crate) fields: IndexMap<String, Vec<Field>>,
    pub(crate) rows: IndexMap<String, Vec<Row>>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) permissions: Vec<PermissionRecord>,
    pub(crate) user: Option<User>,
    pub(crate) faults: Vec<Fault>,
    pub(crate) requests: Vec<Operation>,
    sequences: HashMap<String, i64>,
}

impl Host {
    pub(crate) fn exec(&mut self, op: Operation) -> Result<Response> {
        self.requests.push(op.clone());

        self.faults.retain(|fault| !fault.is_spent());
        for fault in &mut self.faults {
            if let Some(err) = fault.fire(&op) {
                tracing::trace!(%op, error = %err, "injected fault");
                return Err(err);
            }
        }

        match op {
            Operation::GetField(op) => match self.field(&op.collection, &op.field) {
                Some(field) => json(field),
                None => Err(forbidden(&op.collection)),
            },
            Operation::GetFields(op) => {
                self.require(&op.collection)?;
                json(self.fields.get(&op.collection).cloned().unwrap_or_default())
            }
            Operation::CreateField(op) => self.create_field(op),
            Operation::GetRelations(op) => {
                let mut matched = vec![];
                for relation in &self.relations {
                    let record = serde_json::to_value(relation)?;
                    if op.filter.as_ref().map_or(true, |f| f.matches(&record)) {
                        matched.push(record);
                    }
                }
                Ok(Response::new(matched))
            }
            Operation::GetCollections(_) => json(self.collections.values().collect::<Vec<_>>()),
            Operation::QueryItems(op) => self.query_items(op),
            Operation::GetItem(op) => {
                let id = op.id.to_value();
                let row = self.find(&op.collection, &id)?;
                Ok(Response::new(self.project(&op.collection, row, &op.fields)))
            }
            Operation::CreateItem(op) => {
                let row = self.create_item(&op.collection, op.data)?;
                Ok(Response::new(row))
            }
            Operation::UpdateItem(op) => {
                let id = op.id.to_value();
                let patch = patch(&op.collection, op.data)?;
                let pk = self.primary_key(&op.collection);
                let row = self
                    .rows_mut(&op.collection)?
                    .iter_mut()
                    .find(|row| row.get(&pk).is_some_and(|v| value::same_id(v, &id)))
                    .ok_or_else(|| not_found(&op.collection))?;
                row.extend(patch);
                Ok(Response::new(Value::Object(row.clone())))
            }
            Operation::UpdateItems(op) => self.update_items(op),
            Operation::DeleteItem(op) => {
                let id = op.id.to_value();
                let pk = self.primary_key(&op.collection);
                let rows = self.rows_mut(&op.collection)?;
                let index = rows
                    .iter()
                    .position(|row| row.get(&pk).is_some_and(|v| value::same_id(v, &id)))
                    .ok_or_else(|| not_found(&op.collection))?;
                rows.remove(index);
                Ok(Response::empty())
            }
            Operation::GetPermissions(_) => json(&self.permissions),
            Operation::GetCurrentUser(_) => json(&self.user),
        }
    }

    pub(crate) fn add_collection(&mut self, collection: Collection) {
        let name = collection.collection.clone();
        let is_folder = collection.is_folder();
        self.collections.insert(name.clone(), collection);

        if is_folder {
            return;
        }

        self.rows.entry(name.clone()).or_default();
        let fields = self.fields.entry(name.clone()).or_default();
        if !fields.iter().any(Field::is_primary_key) {
            let mut id = Field::new(&name, "id", "integer");
            id.schema = Some(layout_blocks_core::schema::FieldSchema {
                data_type: Some("integer".to_string()),
                is_primary_key: true,
                is_nullable: false,
                ..Default::default()
            });
            fields.insert(0, id);
        }
    }

    /// Adds or replaces a field. Existing rows gain the column as `null`.
    pub(crate) fn add_field(&mut self, field: Field) {
        if !self.collections.contains_key(&field.collection) {
            self.add_collection(table(&field.collection));
        }

        if !field.is_alias() {
            for row in self.rows.entry(field.collection.clone()).or_default() {
                row.entry(field.field.clone()).or_insert(Value::Null);
            }
        }

        let fields = self.fields.entry(field.collection.clone()).or_default();
        match fields.iter_mut().find(|f| f.field == field.field) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }

    pub(crate) fn field(&self, collection: &str, field: &str) -> Option<&Field> {
        self.fields.get(collection)?.iter().find(|f| f.field == field)
    }

    pub(crate) fn primary_key(&self, collection: &str) -> String {
        self.fields
            .get(collection)
            .and_then(|fields| fields.iter().find(|f| f.is_primary_key()))
            .map_or_else(|| "id".to_string(), |f| f.field.clone())
    }

    pub(crate) fn create_item(&mut self, collection: &str, data: Value) -> Result<Value> {
        let mut row = patch(collection, data)?;
        let pk = self.primary_key(collection);

        for field in self.fields.get(collection).into_iter().flatten() {
            if field.is_alias() || row.contains_key(&field.field) {
                continue;
            }
            let default = field
                .schema
                .as_ref()
                .and_then(|schema| schema.default_value.clone())
                .unwrap_or(Value::Null);
            if !default.is_null() {
                row.insert(field.field.clone(), default);
            }
        }

        let id = match row.get(&pk).filter(|id| !id.is_null()) {
            Some(id) => id.clone(),
            None => {
                let id = self.next_id(collection);
                row.insert(pk.clone(), id.clone());
                id
            }
        };

        let rows = self.rows_mut(collection)?;
        if rows
            .iter()
            .any(|existing| existing.get(&pk).is_some_and(|v| value::same_id(v, &id)))
        {
            return Err(Error::remote_for(
                collection,
                Some(400),
                format!("Value for field \"{pk}\" in collection \"{collection}\" has to be unique."),
            ));
        }

        rows.push(row.clone());
        Ok(Value::Object(row))
    }

    fn create_field(&mut self, op: CreateField) -> Result<Response> {
        self.require(&op.collection)?;

        let mut field: Field = serde_json::from_value(op.definition).map_err(|e| {
            Error::remote_for(&op.collection, Some(400), format!("invalid field definition: {e}"))
        })?;
        field.collection = op.collection.clone();

        if self.field(&op.collection, &field.field).is_some() {
            return Err(Error::remote_for(
                &op.collection,
                Some(400),
                format!(
                    "Field \"{}\" already exists in collection \"{}\"",
                    field.field, op.collection
                ),
            ));
        }

        let created = serde_json::to_value(&field)?;
        self.add_field(field);
        Ok(Response::new(created))
    }

    fn query_items(&self, op: QueryItems) -> Result<Response> {
        let rows = self.rows(&op.collection)?;
        let query = op.query;

        let mut matched: Vec<&Row> = rows
            .iter()
            .filter(|row| {
                let record = Value::Object((*row).clone());
                query.filter.as_ref().map_or(true, |f| f.matches(&record))
            })
            .collect();
        let filter_count = matched.len();

        for key in query.sort.iter().rev() {
            let (key, descending) = match key.strip_prefix('-') {
                Some(key) => (key, true),
                None => (key.as_str(), false),
            };
            matched.sort_by(|a, b| {
                let ordering = value::compare(a.get(key), b.get(key));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let limit = match query.limit {
            Some(limit) if limit < 0 => usize::MAX,
            Some(limit) => limit as usize,
            None => DEFAULT_LIMIT,
        };
        let offset = query.offset.unwrap_or(0) as usize;

        let data: Vec<Value> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| self.project(&op.collection, row, &query.fields))
            .collect();

        let mut response = Response::new(data);
        if !query.meta.is_empty() {
            let mut meta = Map::new();
            for key in &query.meta {
                match key.as_str() {
                    "total_count" | "*" => {
                        meta.insert("total_count".into(), rows.len().into());
                    }
                    "filter_count" => {
                        meta.insert("filter_count".into(), filter_count.into());
                    }
                    _ => {}
                }
            }
            response = response.with_meta(Value::Object(meta));
        }

        Ok(response)
    }

    fn update_items(&mut self, op: UpdateItems) -> Result<Response> {
        let patch = patch(&op.collection, op.data)?;
        let pk = self.primary_key(&op.collection);
        let filter: Filter = op.filter;

        let mut keys = vec![];
        for row in self.rows_mut(&op.collection)? {
            if filter.matches(&Value::Object(row.clone())) {
                row.extend(patch.clone());
                keys.push(row.get(&pk).cloned().unwrap_or(Value::Null));
            }
        }

        Ok(Response::new(keys))
    }

    /// Applies a field selection to a row, expanding relations named with
    /// `rel.*` or `rel:collection.*`.
    fn project(&self, collection: &str, row: &Row, fields: &[String]) -> Value {
        if fields.is_empty() {
            return Value::Object(row.clone());
        }

        let mut out = Map::new();
        for selector in fields {
            if selector == "*" {
                out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
                continue;
            }

            let Some((head, rest)) = selector.split_once('.') else {
                out.insert(
                    selector.clone(),
                    row.get(selector).cloned().unwrap_or(Value::Null),
                );
                continue;
            };

            let (name, only) = match head.split_once(':') {
                Some((name, only)) => (name, Some(only)),
                None => (head, None),
            };

            let Some(target) = self.related(collection, name, row) else {
                continue;
            };
            if only.is_some_and(|only| only != target) {
                continue;
            }

            let expanded = row
                .get(name)
                .filter(|id| !id.is_null())
                .and_then(|id| self.find(&target, id).ok())
                .map(|item| self.project(&target, item, &[rest.to_string()]));

            if let Some(expanded) = expanded {
                out.insert(name.to_string(), expanded);
            }
        }

        Value::Object(out)
    }

    /// The collection a relational column of `row` points at.
    fn related(&self, collection: &str, field: &str, row: &Row) -> Option<String> {
        let relation = self
            .relations
            .iter()
            .find(|r| r.collection == collection && r.field == field)?;

        if let Some(related) = &relation.related_collection {
            return Some(related.clone());
        }

        let column = relation.one_collection_field()?;
        row.get(column)?.as_str().map(String::from)
    }

    fn find(&self, collection: &str, id: &Value) -> Result<&Row> {
        let pk = self.primary_key(collection);
        self.rows(collection)?
            .iter()
            .find(|row| row.get(&pk).is_some_and(|v| value::same_id(v, id)))
            .ok_or_else(|| not_found(collection))
    }

    fn next_id(&mut self, collection: &str) -> Value {
        let pk = self.primary_key(collection);
        let highest = self
            .rows
            .get(collection)
            .into_iter()
            .flatten()
            .filter_map(|row| row.get(&pk)?.as_i64())
            .max()
            .unwrap_or(0);

        let sequence = self.sequences.entry(collection.to_string()).or_insert(0);
        *sequence = (*sequence).max(highest) + 1;
        Value::from(*sequence)
    }

    fn require(&self, collection: &str) -> Result<()> {
        match self.collections.get(collection) {
            Some(c) if !c.is_folder() => Ok(()),
            _ => Err(forbidden(collection)),
        }
    }

    pub(crate) fn rows(&self, collection: &str) -> Result<&Vec<Row>> {
        self.require(collection)?;
        self.rows.get(collection).ok_or_else(|| forbidden(collection))
    }

    fn rows_mut(&mut self, collection: &str) -> Result<&mut Vec<Row>> {
        self.require(collection)?;
        self.rows
            .get_mut(collection)
            .ok_or_else(|| forbidden(collection))
    }
}

/// A collection backed by a table.
pub(crate) fn table(name: &str) -> Collection {
    Collection {
        collection: name.to_string(),
        meta: Some(serde_json::json!({ "collection": name })),
        schema: Some(serde_json::json!({ "name": name })),
    }
}

fn json(value: impl Serialize) -> Result<Response> {
    Ok(Response::new(serde_json::to_value(value)?))
}

fn patch(collection: &str, data: Value) -> Result<Row> {
    match data {
        Value::Object(row) => Ok(row),
        _ => Err(Error::remote_for(
            collection,
            Some(400),
            "request body must be an object",
        )),
    }
}

fn forbidden(collection: &str) -> Error {
    Error::remote_for(
        collection,
        Some(403),
        "You don't have permission to access this.",
    )
}

fn not_found(collection: &str) -> Error {
    Error::remote_for(collection, Some(404), "Item not found.")
}
