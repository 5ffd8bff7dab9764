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
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category detail", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let row: Option<(Category, i64)> = match categories::table
        .left_join(recipes::table)
        .filter(categories::slug.eq(&slug))
        .group_by(categories::id)
        .select((Category::as_select(), count(recipes::id.nullable())))
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch category".to_string(),
                }),
            )
                .into_response();
        }
    };

    match row {
        Some((row, recipe_count)) => (
            StatusCode::OK,
            Json(CategoryResponse::from_row(row, recipe_count)),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Category not found".to_string(),
            }),
        )
            .into_response(),
    }
}
