//! Gating of mutating block operations by the current user's rights.

use crate::Client;

use layout_blocks_core::schema::{Action, PermissionRecord, User};

use std::fmt::Debug;

/// Decides whether the current user may perform an action on a collection.
///
/// Checks never fail: anything a gate cannot decide is denied.
pub trait PermissionGate: Debug + Send + Sync + 'static {
    fn check(&self, collection: &str, action: Action) -> bool;

    fn can_link(&self, collection: &str) -> bool {
        self.check(collection, Action::Read)
    }

    fn can_duplicate(&self, collection: &str) -> bool {
        self.check(collection, Action::Read) && self.check(collection, Action::Create)
    }

    fn can_reorder(&self, collection: &str) -> bool {
        self.check(collection, Action::Update)
    }

    fn has_any(&self, collection: &str) -> bool {
        Action::ALL.iter().any(|&action| self.check(collection, action))
    }
}

/// What the editor may do with a blocks field, combining rights on the
/// junction with rights on the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserPermissions {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
    pub reorder: bool,
    pub manage_areas: bool,
}

impl UserPermissions {
    pub fn all() -> UserPermissions {
        UserPermissions {
            create: true,
            update: true,
            delete: true,
            reorder: true,
            manage_areas: true,
        }
    }

    pub fn none() -> UserPermissions {
        UserPermissions::default()
    }
}

/// Collection holding field definitions on the host. Creating records in
/// it is what managing areas requires.
const FIELDS_COLLECTION: &str = "directus_fields";

/// The permission gate backed by the host's permission records.
#[derive(Debug, Clone)]
pub struct Permissions {
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    /// The host reported no restrictions.
    Unrestricted,

    /// Permissions could not be determined.
    DenyAll,

    Records {
        user: Option<User>,
        records: Vec<PermissionRecord>,
    },
}

impl Permissions {
    /// Builds a gate from the user's permission records. An empty record
    /// list means the host applies no restrictions.
    pub fn new(user: Option<User>, records: Vec<PermissionRecord>) -> Permissions {
        let state = if records.is_empty() {
            State::Unrestricted
        } else {
            State::Records { user, records }
        };
        Permissions { state }
    }

    pub fn unrestricted() -> Permissions {
        Permissions {
            state: State::Unrestricted,
        }
    }

    pub fn deny_all() -> Permissions {
        Permissions {
            state: State::DenyAll,
        }
    }

    /// Loads the current user's permissions. Any failure yields a gate that
    /// denies everything.
    pub async fn fetch(client: &Client) -> Permissions {
        let records = match client.permissions().await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(error = %err, "failed to load permissions; denying all actions");
                return Permissions::deny_all();
            }
        };

        if records.is_empty() {
            debug!(client.logging(), "no permission records; access is unrestricted");
            return Permissions::unrestricted();
        }

        let user = match client.current_user().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load the current user");
                None
            }
        };

        debug!(
            client.logging(),
            records = records.len(),
            admin = user.as_ref().is_some_and(User::is_admin),
            "permissions loaded"
        );
        Permissions::new(user, records)
    }

    /// Whether `action` is granted on `field` of `collection`. Records
    /// without a field list, or listing `*`, cover every field.
    pub fn check_field(&self, collection: &str, action: Action, field: &str) -> bool {
        match &self.state {
            State::Unrestricted => true,
            State::DenyAll => false,
            State::Records { user, records } => match user {
                Some(user) if user.is_admin() => true,
                Some(user) => records.iter().any(|record| {
                    applies_to(record, user)
                        && record.grants(collection, action)
                        && record.covers_field(field)
                }),
                None => false,
            },
        }
    }

    /// Field-level update rights for each of `fields`.
    pub fn check_fields<'a>(&self, collection: &str, fields: &[&'a str]) -> Vec<(&'a str, bool)> {
        fields
            .iter()
            .map(|&field| (field, self.check_field(collection, Action::Update, field)))
            .collect()
    }

    /// Combined rights for editing the blocks stored in `junction` on
    /// records of `parent`.
    pub fn check_permissions(&self, junction: &str, parent: &str) -> UserPermissions {
        match self.state {
            State::Unrestricted => return UserPermissions::all(),
            State::DenyAll => return UserPermissions::none(),
            State::Records { .. } => {}
        }

        let parent_update = self.check(parent, Action::Update);
        let junction_update = self.check(junction, Action::Update);

        UserPermissions {
            create: self.check(junction, Action::Create) && parent_update,
            update: junction_update && parent_update,
            delete: self.check(junction, Action::Delete) && parent_update,
            reorder: junction_update && parent_update,
            manage_areas: self.check(FIELDS_COLLECTION, Action::Create),
        }
    }
}

impl PermissionGate for Permissions {
    fn check(&self, collection: &str, action: Action) -> bool {
        match &self.state {
            State::Unrestricted => true,
            State::DenyAll => false,
            State::Records { user, records } => match user {
                Some(user) if user.is_admin() => true,
                Some(user) => records
                    .iter()
                    .any(|record| applies_to(record, user) && record.grants(collection, action)),
                None => false,
            },
        }
    }
}

/// Records scoped to another role do not apply.
fn applies_to(record: &PermissionRecord, user: &User) -> bool {
    match (record.role.as_deref(), user.role_id()) {
        (Some(role), Some(user_role)) => role == user_role,
        _ => true,
    }
}
