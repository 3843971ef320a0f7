mod create_field;
pub use create_field::CreateField;

mod create_item;
pub use create_item::CreateItem;

mod delete_item;
pub use delete_item::DeleteItem;

mod get_collections;
pub use get_collections::GetCollections;

mod get_current_user;
pub use get_current_user::GetCurrentUser;

mod get_field;
pub use get_field::GetField;

mod get_fields;
pub use get_fields::GetFields;

mod get_item;
pub use get_item::GetItem;

mod get_permissions;
pub use get_permissions::GetPermissions;

mod get_relations;
pub use get_relations::GetRelations;

mod query_items;
pub use query_items::QueryItems;

mod update_item;
pub use update_item::UpdateItem;

mod update_items;
pub use update_items::UpdateItems;

use super::*;

use crate::Query;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `GET /fields/{collection}/{field}`
    GetField(GetField),

    /// `GET /fields/{collection}`
    GetFields(GetFields),

    /// `POST /fields/{collection}`
    CreateField(CreateField),

    /// `GET /relations`
    GetRelations(GetRelations),

    /// `GET /collections`
    GetCollections(GetCollections),

    /// `GET /items/{collection}`
    QueryItems(QueryItems),

    /// `GET /items/{collection}/{id}`
    GetItem(GetItem),

    /// `POST /items/{collection}`
    CreateItem(CreateItem),

    /// `PATCH /items/{collection}/{id}`
    UpdateItem(UpdateItem),

    /// `PATCH /items/{collection}` with a filter
    UpdateItems(UpdateItems),

    /// `DELETE /items/{collection}/{id}`
    DeleteItem(DeleteItem),

    /// `GET /permissions/me`
    GetPermissions(GetPermissions),

    /// `GET /users/me`
    GetCurrentUser(GetCurrentUser),
}

/// HTTP verb of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Operation::CreateField(_) | Operation::CreateItem(_) => Method::Post,
            Operation::UpdateItem(_) | Operation::UpdateItems(_) => Method::Patch,
            Operation::DeleteItem(_) => Method::Delete,
            _ => Method::Get,
        }
    }

    /// Path of the endpoint, relative to the API root.
    pub fn path(&self) -> String {
        match self {
            Operation::GetField(op) => format!("/fields/{}/{}", op.collection, op.field),
            Operation::GetFields(op) => format!("/fields/{}", op.collection),
            Operation::CreateField(op) => format!("/fields/{}", op.collection),
            Operation::GetRelations(_) => "/relations".to_string(),
            Operation::GetCollections(_) => "/collections".to_string(),
            Operation::QueryItems(op) => format!("/items/{}", op.collection),
            Operation::GetItem(op) => format!("/items/{}/{}", op.collection, op.id),
            Operation::CreateItem(op) => format!("/items/{}", op.collection),
            Operation::UpdateItem(op) => format!("/items/{}/{}", op.collection, op.id),
            Operation::UpdateItems(op) => format!("/items/{}", op.collection),
            Operation::DeleteItem(op) => format!("/items/{}/{}", op.collection, op.id),
            Operation::GetPermissions(_) => "/permissions/me".to_string(),
            Operation::GetCurrentUser(_) => "/users/me".to_string(),
        }
    }

    /// Query string parameters.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Operation::GetRelations(op) => Query {
                filter: op.filter.clone(),
                limit: Some(-1),
                ..Query::default()
            }
            .to_params(),
            Operation::QueryItems(op) => op.query.to_params(),
            Operation::GetItem(op) if !op.fields.is_empty() => {
                vec![("fields", op.fields.join(","))]
            }
            Operation::UpdateItems(op) => Query {
                filter: Some(op.filter.clone()),
                ..Query::default()
            }
            .to_params(),
            Operation::GetCurrentUser(op) if !op.fields.is_empty() => {
                vec![("fields", op.fields.join(","))]
            }
            _ => vec![],
        }
    }

    /// JSON request body, for writes.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Operation::CreateField(op) => Some(&op.definition),
            Operation::CreateItem(op) => Some(&op.data),
            Operation::UpdateItem(op) => Some(&op.data),
            Operation::UpdateItems(op) => Some(&op.data),
            _ => None,
        }
    }

    /// The collection the operation targets, when it targets one.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Operation::GetField(op) => Some(&op.collection),
            Operation::GetFields(op) => Some(&op.collection),
            Operation::CreateField(op) => Some(&op.collection),
            Operation::QueryItems(op) => Some(&op.collection),
            Operation::GetItem(op) => Some(&op.collection),
            Operation::CreateItem(op) => Some(&op.collection),
            Operation::UpdateItem(op) => Some(&op.collection),
            Operation::UpdateItems(op) => Some(&op.collection),
            Operation::DeleteItem(op) => Some(&op.collection),
            _ => None,
        }
    }

    pub fn is_write(&self) -> bool {
        self.method() != Method::Get
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}
