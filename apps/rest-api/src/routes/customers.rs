//! Customer route handlers.
//!
//! Reads are gated on ViewAnalytics, adds on RecordSales (vendors capture
//! customers at the till), everything else on Administer.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use mercato_core::validation::{validate_date_of_birth, validate_email, validate_phone_number};
use mercato_core::{Customer, NewCustomer};
use mercato_db::{CustomerFilter, CustomerPatch};

use super::{CsvQuery, TimeRangeQuery};
use crate::bulk;
use crate::error::ApiError;
use crate::extract::{RequireAdmin, RequireAnalyst, RequireVendor};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_customers))
        .route("/{id}", get(get_customer_by_id))
        .route("/time_range/{column}", get(get_customers_by_time_range))
        .route("/add/", post(add_customer))
        .route("/update_by_id/{id}", put(update_customer_by_id))
        .route("/update_by_filter/", put(update_customer_by_filter))
        .route("/delete/{id}", delete(delete_customer_by_id))
        .route("/bulk_insert/", post(bulk_insert_customers))
        .route("/get_csv/", get(get_csv))
        .route("/download_csv/", get(download_csv))
}

/// Lists customers matching the query-string equality filters.
async fn get_all_customers(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.db.customers().find_all(&filter).await?))
}

/// Returns one customer or 404.
async fn get_customer_by_id(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    state
        .db
        .customers()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "customer", id })
}

/// Lists customers inside a time range on `date_of_birth`, `created_at`
/// or `updated_at`.
async fn get_customers_by_time_range(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let rows = state
        .db
        .customers()
        .find_in_time_range(&column, range.start_time, range.end_time, &filter)
        .await?;
    Ok(Json(rows))
}

/// Adds one customer.
async fn add_customer(
    RequireVendor(_user): RequireVendor,
    State(state): State<AppState>,
    Json(customer): Json<NewCustomer>,
) -> Result<Json<Value>, ApiError> {
    customer.validate()?;
    let created = state.db.customers().insert(&customer).await?;
    Ok(Json(json!({
        "message": "Customer added successfully!",
        "customer": created,
    })))
}

/// Applies the `_new` fields of the patch to one customer.
async fn update_customer_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Value>, ApiError> {
    validate_patch(&patch)?;
    let rows = state
        .db
        .customers()
        .update(&CustomerFilter::by_id(id), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Applies the `_new` fields to every customer matching the filter fields.
async fn update_customer_by_filter(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Value>, ApiError> {
    validate_patch(&patch)?;
    let rows = state
        .db
        .customers()
        .update(&patch.filter(), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Deletes one customer.
async fn delete_customer_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .customers()
        .delete(&CustomerFilter::by_id(id), false)
        .await?;
    if rows > 0 {
        Ok(Json(json!({ "message": format!("Customer {id} deleted!") })))
    } else {
        Ok(Json(json!({ "message": "No matching customer to delete" })))
    }
}

/// Bulk-imports customers from an uploaded CSV file.
async fn bulk_insert_customers(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let rows: Vec<NewCustomer> = bulk::read_csv_rows(&mut multipart).await?;
    for row in &rows {
        row.validate()?;
    }
    let inserted = state.db.customers().bulk_insert(&rows).await?;
    Ok(Json(json!({
        "message": "Customers added successfully!",
        "rows_inserted": inserted,
    })))
}

/// Cached CSV export.
async fn get_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .customers()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response())
}

/// Cached CSV export as a file attachment.
async fn download_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .customers()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=customers.csv",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Patch-level invariants the store cannot check early enough.
fn validate_patch(patch: &CustomerPatch) -> Result<(), ApiError> {
    if let Some(date) = patch.date_of_birth_new {
        validate_date_of_birth(date)?;
    }
    if let Some(email) = &patch.email_new {
        validate_email(email)?;
    }
    if let Some(phone) = &patch.phone_number_new {
        validate_phone_number(phone)?;
    }
    Ok(())
}

fn update_reply(rows: u64) -> Json<Value> {
    if rows > 0 {
        Json(json!({
            "message": "Customers updated successfully!",
            "rows_updated": rows,
        }))
    } else {
        Json(json!({
            "message": "No matching customers to update",
            "rows_updated": 0,
        }))
    }
}
