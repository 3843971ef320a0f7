use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryItems {
    pub collection: String,
    pub query: Query,
}

impl From<QueryItems> for Operation {
    fn from(value: QueryItems) -> Self {
        Self::QueryItems(value)
    }
}
