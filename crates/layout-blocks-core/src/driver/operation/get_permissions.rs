use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetPermissions;

impl From<GetPermissions> for Operation {
    fn from(value: GetPermissions) -> Self {
        Self::GetPermissions(value)
    }
}
