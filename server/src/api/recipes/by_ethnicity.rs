use crate::api::recipes::{ethnicity_by_slug, JoinedRecipe, RecipeResponse};
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{categories, ethnicities, recipes};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ByEthnicityParams {
    /// Ethnicity slug (required)
    pub ethnicity: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ByEthnicityResponse {
    pub ethnicity: String,
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/by-ethnicity",
    tag = "recipes",
    params(ByEthnicityParams),
    responses(
        (status = 200, description = "All recipes of one ethnicity", body = ByEthnicityResponse),
        (status = 400, description = "Missing ethnicity parameter", body = ErrorResponse),
        (status = 404, description = "Ethnicity not found", body = ErrorResponse)
    )
)]
pub async fn recipes_by_ethnicity(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ByEthnicityParams>,
) -> impl IntoResponse {
    let slug = match params.ethnicity.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "ethnicity parameter is required".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let name = match ethnicity_by_slug(&mut conn, &slug) {
        Ok(Some((_, name))) => name,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Ethnicity not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to look up ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let rows: Vec<JoinedRecipe> = match recipes::table
        .inner_join(ethnicities::table)
        .inner_join(categories::table)
        .filter(ethnicities::slug.eq(&slug))
        .order(recipes::title.asc())
        .select((
            Recipe::as_select(),
            ethnicities::name,
            ethnicities::slug,
            categories::name,
            categories::slug,
        ))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ByEthnicityResponse {
            ethnicity: name,
            recipes: rows.into_iter().map(RecipeResponse::from_joined).collect(),
        }),
    )
        .into_response()
}
