use crate::api::ethnicities::EthnicityResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Ethnicity, NewEthnicity};
use crate::schema::ethnicities;
use crate::store::escape_like;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use calabash_core::slug::slugify;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body shared by ethnicity create and update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EthnicityRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/ethnicities",
    tag = "ethnicities",
    request_body = EthnicityRequest,
    responses(
        (status = 201, description = "Ethnicity created", body = EthnicityResponse),
        (status = 400, description = "Invalid request (empty name)", body = ErrorResponse),
        (status = 409, description = "Ethnicity already exists", body = ErrorResponse)
    )
)]
pub async fn create_ethnicity(
    State(pool): State<Arc<DbPool>>,
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

    let slug = slugify(name);
    let mut conn = get_conn!(pool);

    // Conflict on either the case-insensitive name or the derived slug
    let existing: Option<Uuid> = match ethnicities::table
        .filter(
            ethnicities::name
                .ilike(escape_like(name))
                .or(ethnicities::slug.eq(&slug)),
        )
        .select(ethnicities::id)
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to check for existing ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create ethnicity".to_string(),
                }),
            )
                .into_response();
        }
    };

    if existing.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Ethnicity already exists".to_string(),
            }),
        )
            .into_response();
    }

    let result: Result<Ethnicity, _> = diesel::insert_into(ethnicities::table)
        .values(NewEthnicity {
            name,
            slug: &slug,
            description: request.description.trim(),
        })
        .returning(Ethnicity::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(row) => (
            StatusCode::CREATED,
            Json(EthnicityResponse::from_row(row, 0)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create ethnicity: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create ethnicity".to_string(),
                }),
            )
                .into_response()
        }
    }
}
