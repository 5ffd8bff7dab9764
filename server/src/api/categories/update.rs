use crate::api::categories::create::CategoryRequest;
use crate::api::categories::CategoryResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Category;
use crate::schema::{categories, recipes};
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
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid request (empty name)", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn update_category(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
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

    let mut conn = get_conn!(pool);

    // Rename keeps the slug; the slug is the stable public key
    let result: Result<Category, _> =
        diesel::update(categories::table.filter(categories::slug.eq(&slug)))
            .set((
                categories::name.eq(name),
                categories::description.eq(request.description.trim()),
                categories::updated_at.eq(diesel::dsl::now),
            ))
            .returning(Category::as_returning())
            .get_result(&mut conn);

    let row = match result {
        Ok(row) => row,
        Err(DieselError::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Category not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "A category with this name already exists".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update category".to_string(),
                }),
            )
                .into_response();
        }
    };

    let recipe_count: i64 = recipes::table
        .filter(recipes::category_id.eq(row.id))
        .select(count(recipes::id))
        .first(&mut conn)
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(CategoryResponse::from_row(row, recipe_count)),
    )
        .into_response()
}
