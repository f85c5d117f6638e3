//! User table binding: entity mapping, typed filter, update patch and the
//! email lookup used by authentication.

use serde::Deserialize;

use mercato_core::{NewUser, User};

use super::{Entity, EntityFilter, InsertRow, Repository, SqlValue};
use crate::error::DbResult;

impl Entity for User {
    const TABLE: &'static str = "users";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "phone_number",
        "email",
        "first_name",
        "last_name",
        "password",
        "is_user",
        "is_vendor",
        "is_analyst",
        "is_admin",
        "is_super_admin",
        "created_at",
        "updated_at",
    ];

    const ID_COLUMN: &'static str = "id";

    const ORDER_BY: &'static str = "id";

    const TIME_COLUMNS: &'static [&'static str] = &["created_at", "updated_at"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.phone_number.clone(),
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.password.clone(),
            self.is_user.to_string(),
            self.is_vendor.to_string(),
            self.is_analyst.to_string(),
            self.is_admin.to_string(),
            self.is_super_admin.to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl InsertRow for NewUser {
    // Role flags take their column defaults (is_user = true, rest false)
    const INSERT_COLUMNS: &'static [&'static str] =
        &["phone_number", "email", "first_name", "last_name", "password"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.phone_number.clone()),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.first_name.clone()),
            SqlValue::Text(self.last_name.clone()),
            SqlValue::Text(self.password.clone()),
        ]
    }
}

/// Equality filter over users; unset fields are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_user: Option<bool>,
    pub is_vendor: Option<bool>,
    pub is_analyst: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_super_admin: Option<bool>,
}

impl UserFilter {
    /// Filter matching a single id.
    pub fn by_id(id: i64) -> Self {
        UserFilter {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Filter matching a single email.
    pub fn by_email(email: &str) -> Self {
        UserFilter {
            email: Some(email.to_string()),
            ..Default::default()
        }
    }
}

impl EntityFilter for UserFilter {
    fn constraints(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(id) = self.id {
            out.push(("id", SqlValue::Int(id)));
        }
        if let Some(v) = &self.phone_number {
            out.push(("phone_number", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.email {
            out.push(("email", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.first_name {
            out.push(("first_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.last_name {
            out.push(("last_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.is_user {
            out.push(("is_user", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_vendor {
            out.push(("is_vendor", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_analyst {
            out.push(("is_analyst", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_admin {
            out.push(("is_admin", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_super_admin {
            out.push(("is_super_admin", SqlValue::Bool(v)));
        }
        out
    }
}

/// Update payload: `<field>` selects rows, `<field>_new` carries the new
/// value; only non-null parts apply.
///
/// `password_new` arrives as a plain password and must be hashed by the
/// HTTP layer before `changes()` is handed to the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub id: Option<i64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_user: Option<bool>,
    pub is_vendor: Option<bool>,
    pub is_analyst: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_super_admin: Option<bool>,

    pub phone_number_new: Option<String>,
    pub email_new: Option<String>,
    pub first_name_new: Option<String>,
    pub last_name_new: Option<String>,
    pub password_new: Option<String>,
    pub is_user_new: Option<bool>,
    pub is_vendor_new: Option<bool>,
    pub is_analyst_new: Option<bool>,
    pub is_admin_new: Option<bool>,
    pub is_super_admin_new: Option<bool>,
}

impl UserPatch {
    /// The filter half of the payload.
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            id: self.id,
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_user: self.is_user,
            is_vendor: self.is_vendor,
            is_analyst: self.is_analyst,
            is_admin: self.is_admin,
            is_super_admin: self.is_super_admin,
        }
    }

    /// The non-null `_new` values as update changes.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.phone_number_new {
            out.push(("phone_number", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.email_new {
            out.push(("email", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.first_name_new {
            out.push(("first_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.last_name_new {
            out.push(("last_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.password_new {
            out.push(("password", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.is_user_new {
            out.push(("is_user", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_vendor_new {
            out.push(("is_vendor", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_analyst_new {
            out.push(("is_analyst", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_admin_new {
            out.push(("is_admin", SqlValue::Bool(v)));
        }
        if let Some(v) = self.is_super_admin_new {
            out.push(("is_super_admin", SqlValue::Bool(v)));
        }
        out
    }
}

impl Repository<User> {
    /// Looks a user up by email (unique column; at most one row).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.find_one_by_filter(&UserFilter::by_email(email)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_shape_leaves_flags_to_defaults() {
        assert!(!NewUser::INSERT_COLUMNS.contains(&"is_super_admin"));
        assert_eq!(NewUser::INSERT_COLUMNS.len(), 5);
    }

    #[test]
    fn test_flag_filter_binds_bool() {
        let filter = UserFilter {
            is_admin: Some(true),
            ..Default::default()
        };
        assert_eq!(filter.constraints(), vec![("is_admin", SqlValue::Bool(true))]);
    }

    #[test]
    fn test_patch_changes_cover_flags() {
        let patch = UserPatch {
            email: Some("old@example.com".to_string()),
            is_analyst_new: Some(true),
            password_new: Some("$argon2id$rehashed".to_string()),
            ..Default::default()
        };
        let changes = patch.changes();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|(c, _)| *c == "is_analyst"));
        assert!(changes.iter().any(|(c, _)| *c == "password"));
    }
}
