//! Product table binding: entity mapping, typed filter and update patch.

use serde::Deserialize;

use mercato_core::{NewProduct, Product};

use super::{Entity, EntityFilter, InsertRow, SqlValue};

impl Entity for Product {
    const TABLE: &'static str = "products";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "product_name",
        "product_description",
        "product_category",
        "unit_price",
        "created_at",
        "updated_at",
    ];

    const ID_COLUMN: &'static str = "id";

    const ORDER_BY: &'static str = "id";

    const TIME_COLUMNS: &'static [&'static str] = &["created_at", "updated_at"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.product_name.clone(),
            self.product_description.clone().unwrap_or_default(),
            self.product_category.clone(),
            self.unit_price.to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl InsertRow for NewProduct {
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "product_name",
        "product_description",
        "product_category",
        "unit_price",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.product_name.clone()),
            match &self.product_description {
                Some(v) => SqlValue::Text(v.clone()),
                None => SqlValue::Null,
            },
            SqlValue::Text(self.product_category.clone()),
            SqlValue::Float(self.unit_price),
        ]
    }
}

/// Equality filter over products; unset fields are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub id: Option<i64>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_category: Option<String>,
    pub unit_price: Option<f64>,
}

impl ProductFilter {
    /// Filter matching a single id.
    pub fn by_id(id: i64) -> Self {
        ProductFilter {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl EntityFilter for ProductFilter {
    fn constraints(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(id) = self.id {
            out.push(("id", SqlValue::Int(id)));
        }
        if let Some(v) = &self.product_name {
            out.push(("product_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.product_description {
            out.push(("product_description", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.product_category {
            out.push(("product_category", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.unit_price {
            out.push(("unit_price", SqlValue::Float(v)));
        }
        out
    }
}

/// Update payload: `<field>` selects rows, `<field>_new` carries the new
/// value; only non-null parts apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub id: Option<i64>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub product_category: Option<String>,
    pub unit_price: Option<f64>,

    pub product_name_new: Option<String>,
    pub product_description_new: Option<String>,
    pub product_category_new: Option<String>,
    pub unit_price_new: Option<f64>,
}

impl ProductPatch {
    /// The filter half of the payload.
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            id: self.id,
            product_name: self.product_name.clone(),
            product_description: self.product_description.clone(),
            product_category: self.product_category.clone(),
            unit_price: self.unit_price,
        }
    }

    /// The non-null `_new` values as update changes.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.product_name_new {
            out.push(("product_name", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.product_description_new {
            out.push(("product_description", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.product_category_new {
            out.push(("product_category", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.unit_price_new {
            out.push(("unit_price", SqlValue::Float(v)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_description_inserts_null() {
        let product = NewProduct {
            product_name: "Green Tea".to_string(),
            product_description: None,
            product_category: "Groceries".to_string(),
            unit_price: 4.20,
        };
        let values = product.values();
        assert_eq!(values[1], SqlValue::Null);
    }

    #[test]
    fn test_price_filter_constraint() {
        let filter = ProductFilter {
            unit_price: Some(666.0),
            ..Default::default()
        };
        let constraints = filter.constraints();
        assert_eq!(constraints, vec![("unit_price", SqlValue::Float(666.0))]);
    }
}
