use crate::api::recipes::{category_by_slug, ethnicity_by_slug, RecipeResponse};
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, RecipeChangeset};
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use calabash_core::slug::slugify;
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body shared by recipe create and full-replace update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ethnicity slug
    pub ethnicity: String,
    /// Category slug
    pub category: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Default: 30, minimum 1
    pub prep_time_minutes: Option<i32>,
    /// Default: 30, minimum 1
    pub cook_time_minutes: Option<i32>,
    /// Default: 4, minimum 1
    pub servings: Option<i32>,
}

pub(crate) struct ValidatedRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
}

impl RecipeRequest {
    pub(crate) fn validated(&self) -> Result<ValidatedRecipe, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        let ingredients: Vec<String> = self
            .ingredients
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if ingredients.is_empty() {
            return Err("Ingredients cannot be empty".to_string());
        }

        let instructions: Vec<String> = self
            .instructions
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if instructions.is_empty() {
            return Err("Instructions cannot be empty".to_string());
        }

        Ok(ValidatedRecipe {
            title,
            description: self.description.trim().to_string(),
            ingredients,
            instructions,
            prep_time_minutes: self.prep_time_minutes.unwrap_or(30).max(1),
            cook_time_minutes: self.cook_time_minutes.unwrap_or(30).max(1),
            servings: self.servings.unwrap_or(4).max(1),
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<RecipeRequest>,
) -> impl IntoResponse {
    let valid = match request.validated() {
        Ok(v) => v,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response()
        }
    };

    let slug = slugify(&valid.title);
    if slug.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Title produces an empty slug".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

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
                    error: "Failed to create recipe".to_string(),
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
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    // API creates never suffix: a taken slug is a conflict
    let existing: Option<Uuid> = match recipes::table
        .filter(recipes::slug.eq(&slug))
        .select(recipes::id)
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to check slug availability: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if existing.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("A recipe with slug {:?} already exists", slug),
            }),
        )
            .into_response();
    }

    let result: Result<Recipe, _> = diesel::insert_into(recipes::table)
        .values(RecipeChangeset {
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
        })
        .returning(Recipe::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(recipe) => (
            StatusCode::CREATED,
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
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
