//! Sale table binding, plus the joined total-amount aggregates.

use serde::Deserialize;

use mercato_core::{NewSale, Sale, SaleWithTotal};

use super::{push_eq_constraints, Conjunction, Entity, EntityFilter, InsertRow, Repository, SqlValue};
use crate::error::DbResult;

impl Entity for Sale {
    const TABLE: &'static str = "sales";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "branch",
        "city",
        "customer_type",
        "customer_id",
        "sale_date",
        "created_at",
        "updated_at",
    ];

    const ID_COLUMN: &'static str = "id";

    const ORDER_BY: &'static str = "id";

    const TIME_COLUMNS: &'static [&'static str] = &["sale_date", "created_at", "updated_at"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.branch.clone(),
            self.city.clone(),
            self.customer_type.clone(),
            self.customer_id.map(|id| id.to_string()).unwrap_or_default(),
            self.sale_date.to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl InsertRow for NewSale {
    const INSERT_COLUMNS: &'static [&'static str] =
        &["branch", "city", "customer_type", "customer_id", "sale_date"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.branch.clone()),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.customer_type.clone()),
            match self.customer_id {
                Some(id) => SqlValue::Int(id),
                None => SqlValue::Null,
            },
            SqlValue::Date(self.sale_date),
        ]
    }
}

/// Equality filter over sales; unset fields are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleFilter {
    pub id: Option<i64>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub customer_type: Option<String>,
    pub customer_id: Option<i64>,
    pub sale_date: Option<chrono::NaiveDate>,
}

impl SaleFilter {
    /// Filter matching a single id.
    pub fn by_id(id: i64) -> Self {
        SaleFilter {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl EntityFilter for SaleFilter {
    fn constraints(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(id) = self.id {
            out.push(("id", SqlValue::Int(id)));
        }
        if let Some(v) = &self.branch {
            out.push(("branch", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.city {
            out.push(("city", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.customer_type {
            out.push(("customer_type", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.customer_id {
            out.push(("customer_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.sale_date {
            out.push(("sale_date", SqlValue::Date(v)));
        }
        out
    }
}

/// Update payload: `<field>` selects rows, `<field>_new` carries the new
/// value; only non-null parts apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalePatch {
    pub id: Option<i64>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub customer_type: Option<String>,
    pub customer_id: Option<i64>,
    pub sale_date: Option<chrono::NaiveDate>,

    pub branch_new: Option<String>,
    pub city_new: Option<String>,
    pub customer_type_new: Option<String>,
    pub customer_id_new: Option<i64>,
    pub sale_date_new: Option<chrono::NaiveDate>,
}

impl SalePatch {
    /// The filter half of the payload.
    pub fn filter(&self) -> SaleFilter {
        SaleFilter {
            id: self.id,
            branch: self.branch.clone(),
            city: self.city.clone(),
            customer_type: self.customer_type.clone(),
            customer_id: self.customer_id,
            sale_date: self.sale_date,
        }
    }

    /// The non-null `_new` values as update changes.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.branch_new {
            out.push(("branch", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.city_new {
            out.push(("city", SqlValue::Text(v.clone())));
        }
        if let Some(v) = &self.customer_type_new {
            out.push(("customer_type", SqlValue::Text(v.clone())));
        }
        if let Some(v) = self.customer_id_new {
            out.push(("customer_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.sale_date_new {
            out.push(("sale_date", SqlValue::Date(v)));
        }
        out
    }
}

// =============================================================================
// Total-amount aggregates
// =============================================================================

/// `SELECT` head shared by the total-amount queries: sales joined with
/// their line items and product prices. Sales without line items total 0.
const SALE_TOTAL_SELECT: &str = "SELECT s.id, s.branch, s.city, s.customer_type, s.customer_id, \
     s.sale_date, COALESCE(SUM(p.unit_price * d.quantity), 0) AS total_amount, \
     s.created_at, s.updated_at \
     FROM sales s \
     LEFT JOIN saledetails d ON d.sale_id = s.id \
     LEFT JOIN products p ON p.id = d.product_id";

impl Repository<Sale> {
    /// Returns matching sales with the total value of their line items.
    pub async fn find_all_with_total(&self, filter: &SaleFilter) -> DbResult<Vec<SaleWithTotal>> {
        let constraints = filter.constraints();
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(SALE_TOTAL_SELECT);
        let mut conj = Conjunction::new();
        push_eq_constraints(&mut qb, &mut conj, Some("s"), &constraints);
        qb.push(" GROUP BY s.id ORDER BY s.id");

        qb.build_query_as::<SaleWithTotal>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::store_error("find_all_with_total", e))
    }

    /// Returns one sale with its line-item total, or `None`.
    pub async fn find_with_total_by_id(&self, id: i64) -> DbResult<Option<SaleWithTotal>> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(SALE_TOTAL_SELECT);
        qb.push(" WHERE s.id = ");
        qb.push_bind(id);
        qb.push(" GROUP BY s.id");

        qb.build_query_as::<SaleWithTotal>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::store_error("find_with_total_by_id", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphaned_sale_inserts_null_customer() {
        let sale = NewSale {
            branch: "Downtown".to_string(),
            city: "Yangon".to_string(),
            customer_type: "Member".to_string(),
            customer_id: None,
            sale_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(sale.values()[3], SqlValue::Null);
    }

    #[test]
    fn test_total_query_aliases_filter_columns() {
        let filter = SaleFilter {
            city: Some("Yangon".to_string()),
            ..Default::default()
        };
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(SALE_TOTAL_SELECT);
        let mut conj = Conjunction::new();
        push_eq_constraints(&mut qb, &mut conj, Some("s"), &filter.constraints());
        qb.push(" GROUP BY s.id ORDER BY s.id");

        let sql = qb.sql();
        assert!(sql.contains("WHERE s.city = $1"));
        assert!(sql.contains("COALESCE(SUM(p.unit_price * d.quantity), 0)"));
        assert!(sql.ends_with("GROUP BY s.id ORDER BY s.id"));
    }
}
