//! Infers a [`JunctionDescriptor`] from the host's generic metadata API.
//!
//! Probing runs ordered lists of pure strategies over a
//! [`Snapshot`] of the metadata fetched so far. Each strategy declares the
//! metadata it needs; the prober fetches a source only when the first
//! strategy needing it is reached, so a field that is not a many-to-any
//! field costs a single call.

mod allowed;

mod columns;
pub use columns::Columns;

mod locate;
pub use locate::{candidate_names, Locator};

mod snapshot;
pub use snapshot::{Junction, Snapshot, Source};

mod strategy;
pub use strategy::{Partial, Strategy};

use crate::{Client, JunctionDescriptor, Logging, Options, Result, SortStorage};

use indexmap::IndexSet;
use layout_blocks_core::{Error, Filter};

#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    area_field: String,
    sort_field: String,
    logging: Logging,
}

impl Prober {
    pub fn new(client: Client, options: &Options) -> Prober {
        Prober {
            logging: client.logging(),
            client,
            area_field: options.area_field.clone(),
            sort_field: options.sort_field.clone(),
        }
    }

    /// Probes the junction behind `collection.field`.
    ///
    /// Fails with a schema error when the field does not exist, is not a
    /// many-to-any field, or no junction exposing item and collection
    /// columns can be found.
    pub async fn probe(&self, collection: &str, field: &str) -> Result<JunctionDescriptor> {
        debug!(self.logging, collection, field, "probing junction");

        let Some(info) = self.client.field(collection, field).await? else {
            return Err(Error::schema(collection, Some(field), "field does not exist"));
        };

        if !info.is_m2a() {
            let special = info
                .meta
                .as_ref()
                .map(|meta| meta.special.join(", "))
                .unwrap_or_default();
            return Err(Error::schema(
                collection,
                Some(field),
                format!(
                    "not a many-to-any field (type `{}`, special [{special}])",
                    info.ty
                ),
            ));
        }

        let mut snapshot = Snapshot::new(collection, field, info);
        let mut partial = self.locate(&mut snapshot).await?;

        if partial.allowed_collections.is_empty() {
            for strategy in allowed::STRATEGIES {
                self.load(&mut snapshot, strategy.needs).await?;

                if let Some(found) = (strategy.apply)(&snapshot) {
                    debug!(
                        self.logging,
                        strategy = strategy.name,
                        allowed = ?found.allowed_collections,
                        "allowed collections found"
                    );
                    partial.merge(found);
                    break;
                }
            }
        }

        Ok(self.describe(&snapshot, &partial))
    }

    /// Finds the first junction candidate whose columns check out.
    async fn locate(&self, snapshot: &mut Snapshot) -> Result<Partial> {
        for strategy in locate::STRATEGIES {
            self.load(snapshot, strategy.needs).await?;

            for candidate in (strategy.apply)(&*snapshot) {
                let Some(name) = candidate.junction_collection.clone() else {
                    continue;
                };

                snapshot.junction = Some(Junction::new(&name));
                self.load(snapshot, &[Source::JunctionFields]).await?;

                let mut resolved = snapshot
                    .junction()
                    .and_then(|junction| columns::resolve(junction, &candidate));

                if resolved.is_none() {
                    self.load(snapshot, &[Source::JunctionRelations]).await?;
                    resolved = snapshot
                        .junction()
                        .and_then(|junction| columns::resolve(junction, &candidate));
                }

                if let Some(columns) = resolved {
                    debug!(
                        self.logging,
                        strategy = strategy.name,
                        junction = %name,
                        item_field = %columns.item_field,
                        collection_field = %columns.collection_field,
                        "junction located"
                    );
                    if let Some(junction) = snapshot.junction.as_mut() {
                        junction.columns = Some(columns);
                    }
                    return Ok(candidate);
                }

                debug!(
                    self.logging,
                    strategy = strategy.name,
                    junction = %name,
                    "candidate lacks item or collection column; skipping"
                );
                snapshot.junction = None;
            }
        }

        Err(Error::schema(
            &*snapshot.collection,
            Some(&snapshot.field),
            "no junction collection found. Create the field as a \"Many to Any\" \
             relation selecting the block collections, then choose the layout \
             blocks interface for it",
        ))
    }

    /// Fetches every source in `needs` not loaded yet.
    async fn load(&self, snapshot: &mut Snapshot, needs: &[Source]) -> Result<()> {
        for &source in needs {
            if snapshot.has(source) {
                continue;
            }

            match source {
                Source::Relations => {
                    let filter = Filter::or([
                        Filter::and([
                            Filter::eq("collection", &*snapshot.collection),
                            Filter::eq("field", &*snapshot.field),
                        ]),
                        Filter::and([
                            Filter::eq("related_collection", &*snapshot.collection),
                            Filter::eq("meta.one_field", &*snapshot.field),
                        ]),
                    ]);
                    snapshot.relations = Some(self.client.relations(Some(filter)).await?);
                }
                Source::Collections => {
                    snapshot.collections = Some(self.client.collections().await?);
                }
                Source::JunctionFields => {
                    let Some(junction) = snapshot.junction.as_mut() else {
                        continue;
                    };
                    let fields = match self.client.fields(&junction.collection).await {
                        Ok(fields) => fields,
                        // The candidate does not exist; it fails validation.
                        Err(err) if matches!(err.status(), Some(403 | 404)) => vec![],
                        Err(err) => return Err(err),
                    };
                    junction.fields = Some(fields);
                }
                Source::JunctionRelations => {
                    let Some(junction) = snapshot.junction.as_mut() else {
                        continue;
                    };
                    let filter = Filter::eq("collection", &*junction.collection);
                    junction.relations = Some(self.client.relations(Some(filter)).await?);
                }
            }
        }

        Ok(())
    }

    fn describe(&self, snapshot: &Snapshot, partial: &Partial) -> JunctionDescriptor {
        let junction = snapshot
            .junction()
            .cloned()
            .unwrap_or_else(|| Junction::new(""));
        let resolved = junction.columns.clone().unwrap_or(Columns {
            item_field: "item".to_string(),
            collection_field: "collection".to_string(),
        });

        let sort_column = junction.field(&self.sort_field);
        let sort_storage = sort_column
            .and_then(|f| f.storage_type())
            .and_then(SortStorage::from_type)
            .unwrap_or_default();

        let descriptor = JunctionDescriptor {
            parent_collection: snapshot.collection.clone(),
            field: snapshot.field.clone(),
            junction_collection: junction.collection.clone(),
            primary_key_field: columns::primary_key(&junction),
            foreign_key_field: columns::foreign_key(snapshot, &junction, partial),
            item_field: resolved.item_field,
            collection_field: resolved.collection_field,
            area_field: self.area_field.clone(),
            has_area_field: junction.has_field(&self.area_field),
            sort_field: self.sort_field.clone(),
            has_sort_field: sort_column.is_some(),
            sort_storage,
            allowed_collections: partial
                .allowed_collections
                .iter()
                .cloned()
                .collect::<IndexSet<_>>(),
            junction_fields: junction.fields().iter().map(|f| f.field.clone()).collect(),
        };

        debug!(self.logging, ?descriptor, "junction probed");
        descriptor
    }
}
