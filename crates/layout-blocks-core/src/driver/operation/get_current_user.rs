use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetCurrentUser {
    /// Which fields to return, e.g. `role.admin_access`
    pub fields: Vec<String>,
}

impl From<GetCurrentUser> for Operation {
    fn from(value: GetCurrentUser) -> Self {
        Self::GetCurrentUser(value)
    }
}
