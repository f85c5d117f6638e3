//! Sale line-item table binding, plus the "full bill" aggregates.
//!
//! The table's identity is the composite `(sale_id, product_id)`; the by-id
//! repository operations key on `sale_id`, matching how the HTTP surface
//! addresses line items.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use mercato_core::{BillLine, NewSaleDetail, SaleDetail};

use super::{push_time_bounds, Conjunction, Entity, EntityFilter, InsertRow, Repository, SqlValue};
use crate::error::{DbError, DbResult};

impl Entity for SaleDetail {
    const TABLE: &'static str = "saledetails";

    const COLUMNS: &'static [&'static str] = &[
        "sale_id",
        "product_id",
        "quantity",
        "created_at",
        "updated_at",
    ];

    const ID_COLUMN: &'static str = "sale_id";

    const ORDER_BY: &'static str = "sale_id, product_id";

    const TIME_COLUMNS: &'static [&'static str] = &["created_at", "updated_at"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.sale_id.to_string(),
            self.product_id.to_string(),
            self.quantity.to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}

impl InsertRow for NewSaleDetail {
    const INSERT_COLUMNS: &'static [&'static str] = &["sale_id", "product_id", "quantity"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.sale_id),
            SqlValue::Int(self.product_id),
            // Unspecified quantity takes the column default
            SqlValue::Int(self.quantity.unwrap_or(0)),
        ]
    }
}

/// Equality filter over line items; unset fields are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleDetailFilter {
    pub sale_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

impl SaleDetailFilter {
    /// Filter matching every line of one sale.
    pub fn by_sale_id(sale_id: i64) -> Self {
        SaleDetailFilter {
            sale_id: Some(sale_id),
            ..Default::default()
        }
    }
}

impl EntityFilter for SaleDetailFilter {
    fn constraints(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = self.sale_id {
            out.push(("sale_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.product_id {
            out.push(("product_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.quantity {
            out.push(("quantity", SqlValue::Int(v)));
        }
        out
    }
}

/// Update payload: `<field>` selects rows, `<field>_new` carries the new
/// value; only non-null parts apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleDetailPatch {
    pub sale_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,

    pub sale_id_new: Option<i64>,
    pub product_id_new: Option<i64>,
    pub quantity_new: Option<i64>,
}

impl SaleDetailPatch {
    /// The filter half of the payload.
    pub fn filter(&self) -> SaleDetailFilter {
        SaleDetailFilter {
            sale_id: self.sale_id,
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }

    /// The non-null `_new` values as update changes.
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(v) = self.sale_id_new {
            out.push(("sale_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.product_id_new {
            out.push(("product_id", SqlValue::Int(v)));
        }
        if let Some(v) = self.quantity_new {
            out.push(("quantity", SqlValue::Int(v)));
        }
        out
    }
}

// =============================================================================
// Full-bill aggregates
// =============================================================================

/// `SELECT` head shared by the full-bill queries: line items joined with
/// their product's name and price, plus the computed line total.
const BILL_SELECT: &str = "SELECT d.sale_id, d.product_id, p.product_name, p.unit_price, \
     d.quantity, p.unit_price * d.quantity AS line_total, d.created_at, d.updated_at \
     FROM saledetails d \
     JOIN products p ON p.id = d.product_id";

impl Repository<SaleDetail> {
    /// Returns the full bill of one sale: every line item priced out.
    ///
    /// An empty result means the sale has no line items (or does not
    /// exist); callers translate that into a not-found response.
    pub async fn full_bill(&self, sale_id: i64) -> DbResult<Vec<BillLine>> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(BILL_SELECT);
        qb.push(" WHERE d.sale_id = ");
        qb.push_bind(sale_id);
        qb.push(" ORDER BY d.sale_id, d.product_id");

        qb.build_query_as::<BillLine>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::store_error("full_bill", e))
    }

    /// Returns priced-out bill lines whose `column` falls inside
    /// `[start, end]`, across all sales.
    ///
    /// `column` is validated against the line item's time-column allow-list
    /// before any SQL is assembled.
    pub async fn full_bill_in_time_range(
        &self,
        column: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<BillLine>> {
        if !SaleDetail::TIME_COLUMNS.contains(&column) {
            return Err(DbError::UnknownTimeColumn {
                entity: SaleDetail::TABLE,
                column: column.to_string(),
            });
        }

        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(BILL_SELECT);
        let mut conj = Conjunction::new();
        push_time_bounds(&mut qb, &mut conj, Some("d"), column, start, end);
        qb.push(" ORDER BY d.sale_id, d.product_id");

        qb.build_query_as::<BillLine>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::store_error("full_bill_in_time_range", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_defaults_to_zero_on_insert() {
        let detail = NewSaleDetail {
            sale_id: 1,
            product_id: 2,
            quantity: None,
        };
        assert_eq!(detail.values()[2], SqlValue::Int(0));
    }

    #[test]
    fn test_bill_query_computes_line_total() {
        assert!(BILL_SELECT.contains("p.unit_price * d.quantity AS line_total"));
        assert!(BILL_SELECT.contains("JOIN products p ON p.id = d.product_id"));
    }

    #[test]
    fn test_delete_by_id_keys_on_sale_id() {
        assert_eq!(SaleDetail::ID_COLUMN, "sale_id");
        assert_eq!(SaleDetail::ORDER_BY, "sale_id, product_id");
    }
}
