//! Sale line-item route handlers, including the full-bill aggregates.
//!
//! Line items are addressed by their composite `(sale_id, product_id)`
//! identity; the single-id delete keys on `sale_id` and removes every line
//! of that sale. Reads are gated on ViewAnalytics, adds on RecordSales,
//! everything else on Administer.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use mercato_core::validation::validate_quantity;
use mercato_core::{BillLine, NewSaleDetail, SaleDetail};
use mercato_db::{SaleDetailFilter, SaleDetailPatch};

use super::{CsvQuery, TimeRangeQuery};
use crate::bulk;
use crate::error::ApiError;
use crate::extract::{RequireAdmin, RequireAnalyst, RequireVendor};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_sale_details))
        .route("/full_bill/{sale_id}", get(get_full_bill))
        .route("/full_bill/time_range/{column}", get(get_full_bill_by_time_range))
        .route("/time_range/{column}", get(get_sale_details_by_time_range))
        .route("/add/", post(add_sale_detail))
        .route("/update/", put(update_sale_detail))
        .route("/delete/{id}", delete(delete_sale_detail_by_id))
        .route("/bulk_insert/", post(bulk_insert_sale_details))
        .route("/get_csv/", get(get_csv))
        .route("/download_csv/", get(download_csv))
}

/// Lists line items matching the query-string equality filters.
async fn get_all_sale_details(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(filter): Query<SaleDetailFilter>,
) -> Result<Json<Vec<SaleDetail>>, ApiError> {
    Ok(Json(state.db.sale_details().find_all(&filter).await?))
}

/// Returns the priced-out bill of one sale, or 404 when it has no lines.
async fn get_full_bill(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(sale_id): Path<i64>,
) -> Result<Json<Vec<BillLine>>, ApiError> {
    let lines = state.db.sale_details().full_bill(sale_id).await?;
    if lines.is_empty() {
        return Err(ApiError::NotFound {
            entity: "sale line items for sale",
            id: sale_id,
        });
    }
    Ok(Json(lines))
}

/// Lists priced-out bill lines inside a time range.
async fn get_full_bill_by_time_range(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
) -> Result<Json<Vec<BillLine>>, ApiError> {
    let rows = state
        .db
        .sale_details()
        .full_bill_in_time_range(&column, range.start_time, range.end_time)
        .await?;
    Ok(Json(rows))
}

/// Lists line items inside a time range on `created_at` or `updated_at`.
async fn get_sale_details_by_time_range(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
    Query(filter): Query<SaleDetailFilter>,
) -> Result<Json<Vec<SaleDetail>>, ApiError> {
    let rows = state
        .db
        .sale_details()
        .find_in_time_range(&column, range.start_time, range.end_time, &filter)
        .await?;
    Ok(Json(rows))
}

/// Adds one line item.
async fn add_sale_detail(
    RequireVendor(_user): RequireVendor,
    State(state): State<AppState>,
    Json(detail): Json<NewSaleDetail>,
) -> Result<Json<Value>, ApiError> {
    detail.validate()?;
    let created = state.db.sale_details().insert(&detail).await?;
    Ok(Json(json!({
        "message": "Sale line item added successfully!",
        "saledetail": created,
    })))
}

/// Applies the `_new` fields to every line item matching the filter fields.
///
/// The composite identity means updates address rows through the filter
/// half of the payload; there is no single-id update route.
async fn update_sale_detail(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<SaleDetailPatch>,
) -> Result<Json<Value>, ApiError> {
    if let Some(quantity) = patch.quantity_new {
        validate_quantity(quantity)?;
    }
    let rows = state
        .db
        .sale_details()
        .update(&patch.filter(), &patch.changes())
        .await?;
    if rows > 0 {
        Ok(Json(json!({
            "message": "Sale line items updated successfully!",
            "rows_updated": rows,
        })))
    } else {
        Ok(Json(json!({
            "message": "No matching sale line items to update",
            "rows_updated": 0,
        })))
    }
}

/// Deletes every line of one sale.
async fn delete_sale_detail_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .sale_details()
        .delete(&SaleDetailFilter::by_sale_id(id), false)
        .await?;
    if rows > 0 {
        Ok(Json(json!({
            "message": format!("Sale line items for sale {id} deleted!"),
            "rows_deleted": rows,
        })))
    } else {
        Ok(Json(json!({ "message": "No matching sale line items to delete" })))
    }
}

/// Bulk-imports line items from an uploaded CSV file.
async fn bulk_insert_sale_details(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let rows: Vec<NewSaleDetail> = bulk::read_csv_rows(&mut multipart).await?;
    for row in &rows {
        row.validate()?;
    }
    let inserted = state.db.sale_details().bulk_insert(&rows).await?;
    Ok(Json(json!({
        "message": "Sale line items added successfully!",
        "rows_inserted": inserted,
    })))
}

/// Cached CSV export.
async fn get_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<SaleDetailFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .sale_details()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response())
}

/// Cached CSV export as a file attachment.
async fn download_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<SaleDetailFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .sale_details()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=saledetails.csv",
            ),
        ],
        bytes,
    )
        .into_response())
}
