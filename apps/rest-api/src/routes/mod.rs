//! Route assembly for the REST surface.
//!
//! One module per entity plus the auth endpoints. Every route below a
//! prefix other than `/` and `/auth` requires the session cookie; absence
//! or invalidity redirects to `/auth/`.

pub mod auth;
pub mod customers;
pub mod products;
pub mod sale_details;
pub mod sales;
pub mod users;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::AppState;

/// Query bounds shared by every `time_range` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeRangeQuery {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Query switch shared by the CSV export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvQuery {
    #[serde(default)]
    pub ignore_cache: bool,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/sales", sales::router())
        .nest("/saledetails", sale_details::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service banner.
async fn home() -> Json<Value> {
    Json(json!({ "message": "Mercato retail-sales API" }))
}
