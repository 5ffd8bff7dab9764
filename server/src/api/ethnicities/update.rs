use crate::api::ethnicities::create::EthnicityRequest;
use crate::api::ethnicities::EthnicityResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Ethnicity;
use crate::schema::{ethnicities, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::count;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::Arc;

#[utoipa::path(
    put,
    path = "/api/v1/ethnicities/{slug}",
    tag = "ethnicities",
    params(("slug" = String, Path, description = "Ethnicity slug")),
    request_body = EthnicityRequest,
    responses(
        (status = 200, description = "Ethnicity updated", body = EthnicityResponse),
        (status = 400, description = "Invalid request (empty name)", body = ErrorResponse),
        (status = 404, description = "Ethnicity not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn update_ethnicity(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
    Json(request): Json<EthnicityRequest>,
) -> impl IntoResponse {
    let name = request.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    // Rename keeps the slug; the slug is the stable public key
    let result: Result<Ethnicity, _> = diesel::update(
        ethnicities::table.filter(ethnicities::slug.eq(&slug)),
    )
    .set((
        ethnicities::name.eq(name),
        ethnicities::description.eq(request.description.trim()),
        ethnicities::updated_at.eq(diesel::dsl::now),
    ))
    .returning(Ethnicity::as_returning())
    .get_result(&mut conn);

    let row = match result {
        Ok(row) => row,
        Err(DieselError::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Ethnicity not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "An ethnicity with this name already exists".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update ethnicity".to_string(),
                }),
            )
                .into_response();
        }
    };

    let recipe_count: i64 = recipes::table
        .filter(recipes::ethnicity_id.eq(row.id))
        .select(count(recipes::id))
        .first(&mut conn)
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(EthnicityResponse::from_row(row, recipe_count)),
    )
        .into_response()
}
