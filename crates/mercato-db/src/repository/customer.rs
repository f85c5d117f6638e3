//! Customer table binding: entity mapping, typed filter and update patch.

use serde::Deserialize;

use mercato_core::{Customer, NewCustomer};

use super::{Entity, EntityFilter, InsertRow, SqlValue};

impl Entity for Customer {
    const TABLE: &'static str = "customers";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "date_of_birth",
        "email",
        "phone_number",
        "gender",
        "created_at",
        "updated_at",
    ];

    const ID_COLUMN: &'static str = "id";

    const ORDER_BY: &'static str = "id";

    const TIME_COLUMNS: &'static [&'static str] = &["date_of_birth", "created_at", "updated_at"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.date_of_birth.to_string(),
            self.email.clone(),
            self.phone_number.clone(),
            self.gender.clone(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl InsertRow for NewCustomer {
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "date_of_birth",
        "email",
        "phone_number",
        "gender",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.first_name.clone()),
            SqlValue::Text(self.last_name.clone()),
            SqlValue::Date(self.date_of_birth),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.phone_number.clone()),
            SqlValue::Text(self.gender.clone()),
        ]
    }
}

/// Equality filter over customers; unset fields are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerFilter {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
}

impl CustomerFilter {
    /// Filter matching a single id.
    pub fn by_id(id: i64) -> Self {
        CustomerFilter {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl EntityFilter for CustomerFilter {
    fn constraints(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(id) = self.id {
            out.push(("id", SqlValue::Int(id)));
        }
        if let Some(v) = &self.first_name {
            out.push(("first_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.last_name {
            out.push(("last_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.date_of_birth {
            out.push(("date_of_birth", SqlValue::Date(v)));
        }
        if let Some(v) = &self.email {
            out.push(("email", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.phone_number {
            out.push(("phone_number", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.gender {
            out.push(("gender", SqlValue::Text(v.clone())));
        }
        out
    }
}

/// Update payload: `<field>` selects rows, `<field>_new` carries the new
/// value; only non-null parts apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,

    pub first_name_new: Option<String>,
    pub last_name_new: Option<String>,
    pub date_of_birth_new: Option<chrono::NaiveDate>,
    pub email_new: Option<String>,
    pub phone_number_new: Option<String>,
    pub gender_new: Option<String>,
}

impl CustomerPatch {
    /// The filter half of the payload.
    pub fn filter(&self) -> CustomerFilter {
        CustomerFilter {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            gender: self.gender.clone(),
        }
    }

    /// The non-null `_new` values as update changes.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.first_name_new {
            out.push(("first_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.last_name_new {
            out.push(("last_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.date_of_birth_new {
            out.push(("date_of_birth", SqlValue::Date(v)));
        }
        if let Some(v) = &self.email_new {
            out.push(("email", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.phone_number_new {
            out.push(("phone_number", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.gender_new {
            out.push(("gender", SqlValue::Text(v.clone())));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_skips_unset_fields() {
        let filter = CustomerFilter {
            gender: Some("Male".to_string()),
            ..Default::default()
        };
        let constraints = filter.constraints();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].0, "gender");
    }

    #[test]
    fn test_patch_splits_filter_and_changes() {
        let patch = CustomerPatch {
            gender: Some("Male".to_string()),
            gender_new: Some("Female".to_string()),
            email_new: Some("new@example.com".to_string()),
            ..Default::default()
        };

        let filter = patch.filter();
        assert_eq!(filter.gender.as_deref(), Some("Male"));
        assert!(filter.email.is_none());

        let changes = patch.changes();
        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .any(|(col, _)| *col == "email"));
        assert!(changes
            .iter()
            .any(|(col, v)| *col == "gender" && *v == SqlValue::Text("Female".to_string())));
    }
}
