use crate::api::categories::CategoryResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Category, NewCategory};
use crate::schema::categories;
use crate::store::escape_like;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use calabash_core::slug::slugify;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body shared by category create and update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request (empty name)", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse)
    )
)]
pub async fn create_category(
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CategoryRequest>,
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

    let existing: Option<Uuid> = match categories::table
        .filter(
            categories::name
                .ilike(escape_like(name))
                .or(categories::slug.eq(&slug)),
        )
        .select(categories::id)
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to check for existing category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create category".to_string(),
                }),
            )
                .into_response();
        }
    };

    if existing.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Category already exists".to_string(),
            }),
        )
            .into_response();
    }

    let result: Result<Category, _> = diesel::insert_into(categories::table)
        .values(NewCategory {
            name,
            slug: &slug,
            description: request.description.trim(),
        })
        .returning(Category::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(row) => (
            StatusCode::CREATED,
            Json(CategoryResponse::from_row(row, 0)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create category: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create category".to_string(),
                }),
            )
                .into_response()
        }
    }
}
