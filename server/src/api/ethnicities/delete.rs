use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::ethnicities;
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
    path = "/api/v1/ethnicities/{slug}",
    tag = "ethnicities",
    params(("slug" = String, Path, description = "Ethnicity slug")),
    responses(
        (status = 204, description = "Ethnicity deleted"),
        (status = 404, description = "Ethnicity not found", body = ErrorResponse),
        (status = 409, description = "Ethnicity is still referenced by recipes", body = ErrorResponse)
    )
)]
pub async fn delete_ethnicity(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // ON DELETE RESTRICT turns a referenced delete into an FK violation
    match diesel::delete(ethnicities::table.filter(ethnicities::slug.eq(&slug))).execute(&mut conn)
    {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Ethnicity not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Ethnicity is referenced by existing recipes".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete ethnicity: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete ethnicity".to_string(),
                }),
            )
                .into_response()
        }
    }
}
