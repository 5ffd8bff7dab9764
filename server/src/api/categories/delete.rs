use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::categories;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category is still referenced by recipes", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // ON DELETE RESTRICT turns a referenced delete into an FK violation
    match diesel::delete(categories::table.filter(categories::slug.eq(&slug))).execute(&mut conn) {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Category not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Category is referenced by existing recipes".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete category: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete category".to_string(),
                }),
            )
                .into_response()
        }
    }
}
