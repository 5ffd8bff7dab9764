use crate::api::recipes::{JoinedRecipe, RecipeResponse};
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

const DEFAULT_MAX_TIME: i32 = 45;

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuickRecipesParams {
    /// Upper bound on prep + cook time in minutes (default: 45)
    pub max_time: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuickRecipesResponse {
    pub max_time_minutes: i32,
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/quick",
    tag = "recipes",
    params(QuickRecipesParams),
    responses(
        (status = 200, description = "Recipes within the total-time bound", body = QuickRecipesResponse),
        (status = 400, description = "Invalid max_time", body = ErrorResponse)
    )
)]
pub async fn quick_recipes(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<QuickRecipesParams>,
) -> impl IntoResponse {
    let max_time = params.max_time.unwrap_or(DEFAULT_MAX_TIME);
    if max_time < 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "max_time must be at least 1".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let total_time = recipes::prep_time_minutes + recipes::cook_time_minutes;
    let rows: Vec<JoinedRecipe> = match recipes::table
        .inner_join(ethnicities::table)
        .inner_join(categories::table)
        .filter(total_time.le(max_time))
        .order(total_time.asc())
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
            tracing::error!("Failed to fetch quick recipes: {}", e);
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
        Json(QuickRecipesResponse {
            max_time_minutes: max_time,
            recipes: rows.into_iter().map(RecipeResponse::from_joined).collect(),
        }),
    )
        .into_response()
}
