use super::*;

use crate::Filter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRelations {
    /// Restrict the listing; `None` lists every relation.
    pub filter: Option<Filter>,
}

impl From<GetRelations> for Operation {
    fn from(value: GetRelations) -> Self {
        Self::GetRelations(value)
    }
}
