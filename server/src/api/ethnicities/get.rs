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
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/ethnicities/{slug}",
    tag = "ethnicities",
    params(("slug" = String, Path, description = "Ethnicity slug")),
    responses(
        (status = 200, description = "Ethnicity detail", body = EthnicityResponse),
        (status = 404, description = "Ethnicity not found", body = ErrorResponse)
    )
)]
pub async fn get_ethnicity(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let row: Option<(Ethnicity, i64)> = match ethnicities::table
        .left_join(recipes::table)
        .filter(ethnicities::slug.eq(&slug))
        .group_by(ethnicities::id)
        .select((Ethnicity::as_select(), count(recipes::id.nullable())))
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch ethnicity".to_string(),
                }),
            )
                .into_response();
        }
    };

    match row {
        Some((row, recipe_count)) => (
            StatusCode::OK,
            Json(EthnicityResponse::from_row(row, recipe_count)),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Ethnicity not found".to_string(),
            }),
        )
            .into_response(),
    }
}
