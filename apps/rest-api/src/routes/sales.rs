//! Sale route handlers, including the total-amount aggregates.
//!
//! Reads are gated on ViewAnalytics, adds on RecordSales, everything else
//! on Administer.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use mercato_core::{NewSale, Sale, SaleWithTotal};
use mercato_db::{SaleFilter, SalePatch};

use super::{CsvQuery, TimeRangeQuery};
use crate::bulk;
use crate::error::ApiError;
use crate::extract::{RequireAdmin, RequireAnalyst, RequireVendor};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_sales))
        .route("/{id}", get(get_sale_by_id))
        .route("/full_info/", get(get_all_sales_with_total))
        .route("/full_info/{id}", get(get_sale_with_total_by_id))
        .route("/time_range/{column}", get(get_sales_by_time_range))
        .route("/add/", post(add_sale))
        .route("/update_by_id/{id}", put(update_sale_by_id))
        .route("/update_by_filter/", put(update_sale_by_filter))
        .route("/delete/{id}", delete(delete_sale_by_id))
        .route("/bulk_insert/", post(bulk_insert_sales))
        .route("/get_csv/", get(get_csv))
        .route("/download_csv/", get(download_csv))
}

/// Lists sales matching the query-string equality filters.
async fn get_all_sales(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    Ok(Json(state.db.sales().find_all(&filter).await?))
}

/// Returns one sale or 404.
async fn get_sale_by_id(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Sale>, ApiError> {
    state
        .db
        .sales()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "sale", id })
}

/// Lists sales with the total value of their line items.
async fn get_all_sales_with_total(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> Result<Json<Vec<SaleWithTotal>>, ApiError> {
    Ok(Json(state.db.sales().find_all_with_total(&filter).await?))
}

/// Returns one sale with its line-item total, or 404.
async fn get_sale_with_total_by_id(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SaleWithTotal>, ApiError> {
    state
        .db
        .sales()
        .find_with_total_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "sale", id })
}

/// Lists sales inside a time range on `sale_date`, `created_at` or
/// `updated_at`.
async fn get_sales_by_time_range(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
    Query(filter): Query<SaleFilter>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let rows = state
        .db
        .sales()
        .find_in_time_range(&column, range.start_time, range.end_time, &filter)
        .await?;
    Ok(Json(rows))
}

/// Adds one sale.
async fn add_sale(
    RequireVendor(_user): RequireVendor,
    State(state): State<AppState>,
    Json(sale): Json<NewSale>,
) -> Result<Json<Value>, ApiError> {
    sale.validate()?;
    let created = state.db.sales().insert(&sale).await?;
    Ok(Json(json!({
        "message": "Sale added successfully!",
        "sale": created,
    })))
}

/// Applies the `_new` fields of the patch to one sale.
async fn update_sale_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<SalePatch>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .sales()
        .update(&SaleFilter::by_id(id), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Applies the `_new` fields to every sale matching the filter fields.
async fn update_sale_by_filter(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<SalePatch>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .sales()
        .update(&patch.filter(), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Deletes one sale.
async fn delete_sale_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .sales()
        .delete(&SaleFilter::by_id(id), false)
        .await?;
    if rows > 0 {
        Ok(Json(json!({ "message": format!("Sale {id} deleted!") })))
    } else {
        Ok(Json(json!({ "message": "No matching sale to delete" })))
    }
}

/// Bulk-imports sales from an uploaded CSV file.
async fn bulk_insert_sales(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let rows: Vec<NewSale> = bulk::read_csv_rows(&mut multipart).await?;
    for row in &rows {
        row.validate()?;
    }
    let inserted = state.db.sales().bulk_insert(&rows).await?;
    Ok(Json(json!({
        "message": "Sales added successfully!",
        "rows_inserted": inserted,
    })))
}

/// Cached CSV export.
async fn get_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<SaleFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .sales()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response())
}

/// Cached CSV export as a file attachment.
async fn download_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<SaleFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .sales()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=sales.csv"),
        ],
        bytes,
    )
        .into_response())
}

fn update_reply(rows: u64) -> Json<Value> {
    if rows > 0 {
        Json(json!({
            "message": "Sales updated successfully!",
            "rows_updated": rows,
        }))
    } else {
        Json(json!({
            "message": "No matching sales to update",
            "rows_updated": 0,
        }))
    }
}
