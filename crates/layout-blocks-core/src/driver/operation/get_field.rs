use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct GetField {
    pub collection: String,
    pub field: String,
}

impl From<GetField> for Operation {
    fn from(value: GetField) -> Self {
        Self::GetField(value)
    }
}
