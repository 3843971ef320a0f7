//! Creates the area and sort columns a junction lacks.

mod analyze;
pub use analyze::DataSummary;

mod definition;
pub use definition::FieldKind;

use crate::{Client, JunctionDescriptor, Logging, Options, SortStorage};

use layout_blocks_core::{err, Error, Filter, ItemId, Query};
use serde_json::{Map, Value};

/// A column the provisioner created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedField {
    pub field: String,
    pub kind: FieldKind,
}

/// Outcome of [`Provisioner::ensure_required_fields`]. Partial success is a
/// normal outcome: `created` and `errors` may both be non-empty.
#[derive(Debug, Clone)]
pub struct SetupResult {
    pub created: Vec<CreatedField>,
    pub errors: Vec<Error>,

    /// The input descriptor, updated with the columns now present.
    pub descriptor: JunctionDescriptor,
}

impl SetupResult {
    fn new(descriptor: JunctionDescriptor) -> SetupResult {
        SetupResult {
            created: vec![],
            errors: vec![],
            descriptor,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn adopt(&mut self, kind: FieldKind, name: &str, storage: SortStorage) {
        let descriptor = self.descriptor.clone();
        self.descriptor = match kind {
            FieldKind::Area => descriptor.with_area_field(name),
            FieldKind::Sort => descriptor.with_sort_field(name, storage),
        };
    }
}

#[derive(Debug, Clone)]
pub struct Provisioner {
    client: Client,
    logging: Logging,
}

impl Provisioner {
    pub fn new(client: Client) -> Provisioner {
        Provisioner {
            logging: client.logging(),
            client,
        }
    }

    /// Makes sure the junction has usable area and sort columns, creating
    /// them when `options.auto_setup` is set. Existing columns are never
    /// altered; an incompatible column is worked around with a fallback
    /// name.
    pub async fn ensure_required_fields(
        &self,
        descriptor: &JunctionDescriptor,
        options: &Options,
    ) -> SetupResult {
        let mut result = SetupResult::new(descriptor.clone());

        if !options.auto_setup {
            debug!(self.logging, junction = %descriptor.junction_collection, "auto setup disabled");
            return result;
        }

        self.ensure(&mut result, FieldKind::Area, &options.area_field, options)
            .await;
        self.ensure(&mut result, FieldKind::Sort, &options.sort_field, options)
            .await;

        if !result.created.is_empty() {
            tracing::info!(
                junction = %descriptor.junction_collection,
                created = ?result.created.iter().map(|f| &f.field).collect::<Vec<_>>(),
                "created layout fields"
            );
            self.backfill(&mut result, options).await;
        }

        for err in &result.errors {
            tracing::error!(junction = %descriptor.junction_collection, error = %err, "layout field setup failed");
        }

        result
    }

    async fn ensure(&self, result: &mut SetupResult, kind: FieldKind, name: &str, options: &Options) {
        if !result.descriptor.has_column(name) {
            self.create(result, kind, name, options).await;
            return;
        }

        let junction = result.descriptor.junction_collection.clone();
        if let Some(storage) = self.compatible(&junction, kind, name).await {
            result.adopt(kind, name, storage);
            return;
        }

        let fallback = kind.fallback_name(name);
        tracing::warn!(
            junction = %junction,
            field = name,
            fallback = %fallback,
            "existing {kind} field has an incompatible type"
        );

        if !result.descriptor.has_column(&fallback) {
            self.create(result, kind, &fallback, options).await;
        } else if let Some(storage) = self.compatible(&junction, kind, &fallback).await {
            result.adopt(kind, &fallback, storage);
        } else {
            result.errors.push(Error::validation_field(
                junction,
                name,
                format!("field conflict: cannot use `{name}` or `{fallback}` for the {kind} column"),
            ));
        }
    }

    async fn create(&self, result: &mut SetupResult, kind: FieldKind, name: &str, options: &Options) {
        let junction = result.descriptor.junction_collection.clone();
        let definition = kind.definition(&junction, name, &options.default_area);

        match self.client.create_field(&junction, definition).await {
            Ok(()) => {
                debug!(self.logging, junction = %junction, field = name, "created {kind} field");
                result.created.push(CreatedField {
                    field: name.to_string(),
                    kind,
                });
                result.adopt(kind, name, SortStorage::Integer);
            }
            Err(err) if err.is_already_exists() => {
                debug!(self.logging, junction = %junction, field = name, "{kind} field already exists");
                result.adopt(kind, name, SortStorage::Integer);
            }
            Err(err) => {
                result
                    .errors
                    .push(err.context(err!("failed to create {kind} field `{name}` on `{junction}`")));
            }
        }
    }

    /// The sort storage of a compatible column, `None` when the column
    /// cannot serve as `kind`. Area columns report integer storage.
    async fn compatible(&self, junction: &str, kind: FieldKind, name: &str) -> Option<SortStorage> {
        let field = match self.client.field(junction, name).await {
            Ok(field) => field?,
            Err(err) => {
                tracing::error!(junction, field = name, error = %err, "failed to check field type");
                return None;
            }
        };

        let ty = field.storage_type()?;
        if !kind.accepts(ty) {
            return None;
        }

        Some(match kind {
            FieldKind::Area => SortStorage::Integer,
            FieldKind::Sort => SortStorage::from_type(ty).unwrap_or_default(),
        })
    }

    /// Fills area and sort on rows that predate the columns. Failures are
    /// collected; the rows keep their nulls.
    async fn backfill(&self, result: &mut SetupResult, options: &Options) {
        let descriptor = result.descriptor.clone();
        let junction = &descriptor.junction_collection;

        if let Some(area) = descriptor.area_field() {
            let mut data = Map::new();
            data.insert(area.to_string(), Value::from(&*options.default_area));

            if let Err(err) = self
                .client
                .update_items(junction, Filter::null(area), Value::Object(data))
                .await
            {
                result
                    .errors
                    .push(err.context(err!("failed to backfill `{area}` on `{junction}`")));
            }
        }

        if let Some(sort) = descriptor.sort_field() {
            if let Err(err) = self.backfill_sort(&descriptor, sort).await {
                result
                    .errors
                    .push(err.context(err!("failed to backfill `{sort}` on `{junction}`")));
            }
        }
    }

    /// Numbers rows without a rank sequentially, in primary key order.
    async fn backfill_sort(&self, descriptor: &JunctionDescriptor, sort: &str) -> crate::Result<()> {
        let junction = &descriptor.junction_collection;
        let pk = &descriptor.primary_key_field;

        let query = Query::new()
            .filter(Filter::null(sort))
            .fields([pk.as_str()])
            .sort([pk.as_str()])
            .limit(-1);
        let rows = self.client.query_items(junction, query).await?.into_rows()?;

        debug!(self.logging, junction = %junction, rows = rows.len(), "backfilling sort values");

        for (index, row) in rows.iter().enumerate() {
            let Some(id) = row.get(pk.as_str()).and_then(ItemId::from_value) else {
                return Err(Error::invalid_response(format!(
                    "row of `{junction}` without primary key `{pk}`"
                )));
            };

            let mut data = Map::new();
            data.insert(sort.to_string(), Value::from(index as i64));
            self.client
                .update_item(junction, id, Value::Object(data))
                .await?;
        }

        Ok(())
    }

    /// Problems that keep the junction from being used for layout blocks.
    /// Empty when setup is complete.
    pub async fn validate_setup(&self, descriptor: &JunctionDescriptor, options: &Options) -> Vec<String> {
        let junction = &descriptor.junction_collection;
        let mut issues = vec![];

        for (kind, name, expected) in [
            (FieldKind::Area, &options.area_field, "a string"),
            (FieldKind::Sort, &options.sort_field, "a numeric"),
        ] {
            if !descriptor.has_column(name) {
                issues.push(format!("{kind} field `{name}` not found"));
            } else if self.compatible(junction, kind, name).await.is_none() {
                issues.push(format!("{kind} field `{name}` is not {expected} type"));
            }
        }

        issues
    }
}
