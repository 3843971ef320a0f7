use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetCollections;

impl From<GetCollections> for Operation {
    fn from(value: GetCollections) -> Self {
        Self::GetCollections(value)
    }
}
