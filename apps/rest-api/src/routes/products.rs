//! Product route handlers.
//!
//! Reads are gated on ViewAnalytics; every write and the CSV exports on
//! Administer.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use mercato_core::validation::validate_unit_price;
use mercato_core::{NewProduct, Product};
use mercato_db::{ProductFilter, ProductPatch};

use super::{CsvQuery, TimeRangeQuery};
use crate::bulk;
use crate::error::ApiError;
use crate::extract::{RequireAdmin, RequireAnalyst};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_products))
        .route("/{id}", get(get_product_by_id))
        .route("/time_range/{column}", get(get_products_by_time_range))
        .route("/add/", post(add_product))
        .route("/update_by_id/{id}", put(update_product_by_id))
        .route("/update_by_filter/", put(update_product_by_filter))
        .route("/delete/{id}", delete(delete_product_by_id))
        .route("/bulk_insert/", post(bulk_insert_products))
        .route("/get_csv/", get(get_csv))
        .route("/download_csv/", get(download_csv))
}

/// Lists products matching the query-string equality filters.
async fn get_all_products(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db.products().find_all(&filter).await?))
}

/// Returns one product or 404.
async fn get_product_by_id(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .db
        .products()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "product", id })
}

/// Lists products inside a time range on `created_at` or `updated_at`.
async fn get_products_by_time_range(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let rows = state
        .db
        .products()
        .find_in_time_range(&column, range.start_time, range.end_time, &filter)
        .await?;
    Ok(Json(rows))
}

/// Adds one product.
async fn add_product(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> Result<Json<Value>, ApiError> {
    product.validate()?;
    let created = state.db.products().insert(&product).await?;
    Ok(Json(json!({
        "message": "Product added successfully!",
        "product": created,
    })))
}

/// Applies the `_new` fields of the patch to one product.
async fn update_product_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Value>, ApiError> {
    validate_patch(&patch)?;
    let rows = state
        .db
        .products()
        .update(&ProductFilter::by_id(id), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Applies the `_new` fields to every product matching the filter fields.
async fn update_product_by_filter(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Value>, ApiError> {
    validate_patch(&patch)?;
    let rows = state
        .db
        .products()
        .update(&patch.filter(), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Deletes one product.
async fn delete_product_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .products()
        .delete(&ProductFilter::by_id(id), false)
        .await?;
    if rows > 0 {
        Ok(Json(json!({ "message": format!("Product {id} deleted!") })))
    } else {
        Ok(Json(json!({ "message": "No matching product to delete" })))
    }
}

/// Bulk-imports products from an uploaded CSV file.
///
/// Every row must validate before any row is persisted.
async fn bulk_insert_products(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let rows: Vec<NewProduct> = bulk::read_csv_rows(&mut multipart).await?;
    for row in &rows {
        row.validate()?;
    }
    let inserted = state.db.products().bulk_insert(&rows).await?;
    Ok(Json(json!({
        "message": "Products added successfully!",
        "rows_inserted": inserted,
    })))
}

/// Cached CSV export.
async fn get_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<ProductFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .products()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response())
}

/// Cached CSV export as a file attachment.
async fn download_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<ProductFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .products()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=products.csv",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Patch-level invariants the store cannot check early enough.
fn validate_patch(patch: &ProductPatch) -> Result<(), ApiError> {
    if let Some(price) = patch.unit_price_new {
        validate_unit_price(price)?;
    }
    Ok(())
}

fn update_reply(rows: u64) -> Json<Value> {
    if rows > 0 {
        Json(json!({
            "message": "Products updated successfully!",
            "rows_updated": rows,
        }))
    } else {
        Json(json!({
            "message": "No matching products to update",
            "rows_updated": 0,
        }))
    }
}
