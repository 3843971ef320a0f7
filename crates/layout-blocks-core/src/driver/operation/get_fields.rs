use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct GetFields {
    pub collection: String,
}

impl From<GetFields> for Operation {
    fn from(value: GetFields) -> Self {
        Self::GetFields(value)
    }
}
