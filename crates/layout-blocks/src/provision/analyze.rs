use super::Provisioner;
use crate::{JunctionDescriptor, Result};

use indexmap::IndexSet;
use layout_blocks_core::Query;
use serde_json::Value;

/// What a sample of existing junction rows says about area and sort usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSummary {
    pub total_count: u64,
    pub has_area_values: bool,
    pub has_sort_values: bool,
    pub unique_areas: Vec<String>,
}

const SAMPLE_SIZE: i64 = 100;

impl Provisioner {
    /// Samples up to 100 junction rows.
    pub async fn analyze_existing_data(&self, descriptor: &JunctionDescriptor) -> Result<DataSummary> {
        let area = &descriptor.area_field;
        let sort = &descriptor.sort_field;

        let query = Query::new()
            .fields([area.as_str(), sort.as_str()])
            .limit(SAMPLE_SIZE)
            .meta("total_count");

        let response = self
            .client
            .query_items(&descriptor.junction_collection, query)
            .await?;
        let total_count = response.total_count().unwrap_or(0);
        let rows = response.into_rows()?;

        let present = |row: &Value, column: &str| row.get(column).is_some_and(|v| !v.is_null());

        let unique_areas: IndexSet<String> = rows
            .iter()
            .filter_map(|row| row.get(area.as_str())?.as_str())
            .map(String::from)
            .collect();

        Ok(DataSummary {
            total_count,
            has_area_values: rows.iter().any(|row| present(row, area)),
            has_sort_values: rows.iter().any(|row| present(row, sort)),
            unique_areas: unique_areas.into_iter().collect(),
        })
    }
}
