use super::string_or_list;

use serde::{Deserialize, Serialize};

/// A CRUD action a permission record grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record from `GET /permissions/me`.
///
/// Every attribute is optional on the wire; records missing the collection
/// or action never grant anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    /// Field allow-list; `["*"]` grants every field. `None` means unrestricted.
    #[serde(default, deserialize_with = "fields_list")]
    pub fields: Option<Vec<String>>,
}

fn fields_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let fields = string_or_list(deserializer)?;
    Ok(if fields.is_empty() { None } else { Some(fields) })
}

impl PermissionRecord {
    pub fn new(collection: &str, action: Action) -> PermissionRecord {
        PermissionRecord {
            collection: Some(collection.to_string()),
            action: Some(action.as_str().to_string()),
            role: None,
            fields: None,
        }
    }

    pub fn role(mut self, role: &str) -> PermissionRecord {
        self.role = Some(role.to_string());
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> PermissionRecord {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn grants(&self, collection: &str, action: Action) -> bool {
        self.collection.as_deref() == Some(collection) && self.action.as_deref() == Some(action.as_str())
    }

    pub fn covers_field(&self, field: &str) -> bool {
        match &self.fields {
            None => true,
            Some(fields) => fields.iter().any(|f| f == "*" || f == field),
        }
    }
}

/// The current user, from `GET /users/me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub role: Option<UserRole>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(|role| role.admin_access)
    }

    pub fn role_id(&self) -> Option<&str> {
        self.role.as_ref()?.id.as_deref()
    }
}

/// The user's role. Hosts return either the bare role id or the expanded
/// role object, depending on the requested fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoleRepr")]
pub struct UserRole {
    pub id: Option<String>,
    pub admin_access: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Id(String),
    Object {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        admin_access: bool,
    },
}

impl From<RoleRepr> for UserRole {
    fn from(repr: RoleRepr) -> Self {
        match repr {
            RoleRepr::Id(id) => UserRole {
                id: Some(id),
                admin_access: false,
            },
            RoleRepr::Object { id, admin_access } => UserRole { id, admin_access },
        }
    }
}
