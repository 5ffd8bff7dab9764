pub mod api;
pub mod db;
pub mod models;
pub mod schema;
pub mod store;
pub mod web;

use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<db::DbPool>;

/// Check out a pooled connection or bail out of the handler with a 500.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                return (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json($crate::api::ErrorResponse {
                        error: "Database connection failed".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    };
}
