use crate::api::recipes::create::RecipeRequest;
use crate::api::recipes::{category_by_slug, ethnicity_by_slug, RecipeResponse};
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, RecipeChangeset};
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    put,
    path = "/api/v1/recipes/{slug}",
    tag = "recipes",
    params(("slug" = String, Path, description = "Recipe slug")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
    Json(request): Json<RecipeRequest>,
) -> impl IntoResponse {
    let valid = match request.validated() {
        Ok(v) => v,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let existing: Option<Uuid> = match recipes::table
        .filter(recipes::slug.eq(&slug))
        .select(recipes::id)
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let id = match existing {
        Some(id) => id,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
    };

    let (ethnicity_id, ethnicity_name) = match ethnicity_by_slug(&mut conn, &request.ethnicity) {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown ethnicity: {}", request.ethnicity),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to look up ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (category_id, category_name) = match category_by_slug(&mut conn, &request.category) {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown category: {}", request.category),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to look up category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Full replace; the slug never changes across updates
    let result: Result<Recipe, _> = diesel::update(recipes::table.find(id))
        .set((
            RecipeChangeset {
                title: &valid.title,
                slug: &slug,
                description: &valid.description,
                ingredients: Value::from(valid.ingredients),
                instructions: Value::from(valid.instructions),
                prep_time_minutes: valid.prep_time_minutes,
                cook_time_minutes: valid.cook_time_minutes,
                servings: valid.servings,
                ethnicity_id,
                category_id,
            },
            recipes::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Recipe::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(recipe) => (
            StatusCode::OK,
            Json(RecipeResponse::from_joined((
                recipe,
                ethnicity_name,
                request.ethnicity,
                category_name,
                request.category,
            ))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
