use crate::api::recipes::RecipeResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{categories, ethnicities, recipes};
use crate::store::escape_like;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Filter by ethnicity slug
    pub ethnicity: Option<String>,
    /// Filter by category slug
    pub category: Option<String>,
    /// Filter by exact servings count
    pub servings: Option<i32>,
    /// Case-insensitive substring search over title and description
    pub search: Option<String>,
    /// Sort field: created_at, title, prep_time, cook_time, servings.
    /// Prefix with `-` for descending. Default: -created_at.
    pub ordering: Option<String>,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items matching the filters
    pub total: i64,
    /// Number of items requested (limit)
    pub limit: i64,
    /// Number of items skipped (offset)
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Filtered, paginated recipe list", body = ListRecipesResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    // Pre-compute the pattern so it lives long enough for the boxed query
    let search_pattern = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let mut conn = get_conn!(pool);

    let mut query = recipes::table
        .inner_join(ethnicities::table)
        .inner_join(categories::table)
        .into_boxed();

    if let Some(ref ethnicity) = params.ethnicity {
        query = query.filter(ethnicities::slug.eq(ethnicity));
    }
    if let Some(ref category) = params.category {
        query = query.filter(categories::slug.eq(category));
    }
    if let Some(servings) = params.servings {
        query = query.filter(recipes::servings.eq(servings));
    }
    if let Some(ref pattern) = search_pattern {
        query = query.filter(
            recipes::title
                .ilike(pattern)
                .or(recipes::description.ilike(pattern)),
        );
    }

    query = match params.ordering.as_deref().unwrap_or("-created_at") {
        "created_at" => query.order(recipes::created_at.asc()),
        "-created_at" => query.order(recipes::created_at.desc()),
        "title" => query.order(recipes::title.asc()),
        "-title" => query.order(recipes::title.desc()),
        "prep_time" => query.order(recipes::prep_time_minutes.asc()),
        "-prep_time" => query.order(recipes::prep_time_minutes.desc()),
        "cook_time" => query.order(recipes::cook_time_minutes.asc()),
        "-cook_time" => query.order(recipes::cook_time_minutes.desc()),
        "servings" => query.order(recipes::servings.asc()),
        "-servings" => query.order(recipes::servings.desc()),
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown ordering: {}", other),
                }),
            )
                .into_response()
        }
    };

    // COUNT(*) OVER() carries the total across all matching rows
    type ListRow = (Recipe, String, String, String, String, i64);
    let results: Vec<ListRow> = match query
        .select((
            Recipe::as_select(),
            ethnicities::name,
            ethnicities::slug,
            categories::name,
            categories::slug,
            sql::<BigInt>("COUNT(*) OVER()"),
        ))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = results.last().map(|r| r.5).unwrap_or(0);
    let recipes = results
        .into_iter()
        .map(|(recipe, en, es, cn, cs, _)| RecipeResponse::from_joined((recipe, en, es, cn, cs)))
        .collect();

    (
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        }),
    )
        .into_response()
}
