mod filter;
pub use filter::Filter;

/// Parameters of an item or relation listing: filter, projected fields,
/// ordering, and pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,

    /// Projected fields. `*` selects every column; `rel.*` expands a
    /// relation; `rel:collection.*` expands one branch of a polymorphic
    /// relation.
    pub fields: Vec<String>,

    /// Sort keys; a leading `-` sorts descending.
    pub sort: Vec<String>,

    /// `-1` lifts the host's default page size.
    pub limit: Option<i64>,

    pub offset: Option<u64>,

    /// Metadata to return alongside the rows (`total_count`, `filter_count`).
    pub meta: Vec<String>,
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    pub fn filter(mut self, filter: Filter) -> Query {
        self.filter = Some(filter);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: i64) -> Query {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Query {
        self.offset = Some(offset);
        self
    }

    pub fn meta(mut self, meta: &str) -> Query {
        self.meta.push(meta.to_string());
        self
    }

    /// Encodes the query as URL query parameters, in the host's format.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];

        if let Some(filter) = &self.filter {
            params.push(("filter", filter.to_json().to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fields", self.fields.join(",")));
        }
        if !self.sort.is_empty() {
            params.push(("sort", self.sort.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if !self.meta.is_empty() {
            params.push(("meta", self.meta.join(",")));
        }

        params
    }
}
