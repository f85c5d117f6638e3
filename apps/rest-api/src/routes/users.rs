//! User route handlers.
//!
//! Listing and exports require Administer; account creation, updates and
//! deletion require ManageUsers (super admin). `/me` only needs a valid
//! session. Full user rows (including the password hash and role flags)
//! are visible to admins only; `/me` returns the public subset.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use mercato_core::validation::{
    validate_email, validate_password, validate_phone_number,
};
use mercato_core::{NewUser, User, UserPublic};
use mercato_db::{UserFilter, UserPatch};

use super::{CsvQuery, TimeRangeQuery};
use crate::auth::hash_password;
use crate::bulk;
use crate::error::ApiError;
use crate::extract::{CurrentUser, RequireAdmin, RequireSuperAdmin};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_users))
        .route("/me", get(get_me))
        .route("/{id}", get(get_user_by_id))
        .route("/time_range/{column}", get(get_users_by_time_range))
        .route("/add/", post(add_user))
        .route("/update_by_id/{id}", put(update_user_by_id))
        .route("/update_by_filter/", put(update_user_by_filter))
        .route("/delete/{id}", delete(delete_user_by_id))
        .route("/bulk_insert/", post(bulk_insert_users))
        .route("/get_csv/", get(get_csv))
        .route("/download_csv/", get(download_csv))
}

/// Lists all users (full rows, admin view).
async fn get_all_users(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.db.users().find_all(&filter).await?))
}

/// Returns the authenticated user's public profile.
async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(UserPublic::from(&user))
}

/// Returns one user (full row) or 404.
async fn get_user_by_id(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .db
        .users()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { entity: "user", id })
}

/// Lists users inside a time range on `created_at` or `updated_at`.
async fn get_users_by_time_range(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(column): Path<String>,
    Query(range): Query<TimeRangeQuery>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    let rows = state
        .db
        .users()
        .find_in_time_range(&column, range.start_time, range.end_time, &filter)
        .await?;
    Ok(Json(rows))
}

/// Adds one user account (role flags take their column defaults).
async fn add_user(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(mut user): Json<NewUser>,
) -> Result<Json<Value>, ApiError> {
    user.validate()?;
    user.password = hash_password(&user.password)?;
    let created = state.db.users().insert(&user).await?;
    Ok(Json(json!({
        "message": "User added successfully!",
        "user": UserPublic::from(&created),
    })))
}

/// Applies the `_new` fields of the patch to one user.
async fn update_user_by_id(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<Value>, ApiError> {
    let patch = validate_and_hash_patch(patch)?;
    let rows = state
        .db
        .users()
        .update(&UserFilter::by_id(id), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Applies the `_new` fields to every user matching the filter fields.
async fn update_user_by_filter(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<Value>, ApiError> {
    let patch = validate_and_hash_patch(patch)?;
    let rows = state
        .db
        .users()
        .update(&patch.filter(), &patch.changes())
        .await?;
    Ok(update_reply(rows))
}

/// Deletes one user account.
async fn delete_user_by_id(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .db
        .users()
        .delete(&UserFilter::by_id(id), false)
        .await?;
    if rows > 0 {
        Ok(Json(json!({ "message": format!("User {id} deleted!") })))
    } else {
        Ok(Json(json!({ "message": "No matching user to delete" })))
    }
}

/// Bulk-imports user accounts from an uploaded CSV file.
///
/// Every row validates first; plain passwords are hashed before the
/// batch is written.
async fn bulk_insert_users(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut rows: Vec<NewUser> = bulk::read_csv_rows(&mut multipart).await?;
    for row in &rows {
        row.validate()?;
    }
    for row in &mut rows {
        row.password = hash_password(&row.password)?;
    }
    let inserted = state.db.users().bulk_insert(&rows).await?;
    Ok(Json(json!({
        "message": "Users added successfully!",
        "rows_inserted": inserted,
    })))
}

/// Cached CSV export.
async fn get_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<UserFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .users()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], bytes).into_response())
}

/// Cached CSV export as a file attachment.
async fn download_csv(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Query(csv): Query<CsvQuery>,
    Query(filter): Query<UserFilter>,
) -> Result<Response, ApiError> {
    let bytes = state
        .db
        .users()
        .export_csv(&filter, csv.ignore_cache, &state.csv_cache)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=users.csv"),
        ],
        bytes,
    )
        .into_response())
}

/// Checks the patch invariants, then hashes an incoming plain password.
fn validate_and_hash_patch(mut patch: UserPatch) -> Result<UserPatch, ApiError> {
    if let Some(email) = &patch.email_new {
        validate_email(email)?;
    }
    if let Some(phone) = &patch.phone_number_new {
        validate_phone_number(phone)?;
    }
    if let Some(password) = patch.password_new.take() {
        validate_password(&password)?;
        patch.password_new = Some(hash_password(&password)?);
    }
    Ok(patch)
}

fn update_reply(rows: u64) -> Json<Value> {
    if rows > 0 {
        Json(json!({
            "message": "Users updated successfully!",
            "rows_updated": rows,
        }))
    } else {
        Json(json!({
            "message": "No matching users to update",
            "rows_updated": 0,
        }))
    }
}
