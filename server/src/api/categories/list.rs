use crate::api::categories::CategoryResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Category;
use crate::schema::{categories, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::count;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories with recipe counts", body = Vec<CategoryResponse>)
    )
)]
pub async fn list_categories(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<(Category, i64)> = match categories::table
        .left_join(recipes::table)
        .group_by(categories::id)
        .select((Category::as_select(), count(recipes::id.nullable())))
        .order(categories::name.asc())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list categories: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch categories".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<CategoryResponse> = rows
        .into_iter()
        .map(|(row, recipe_count)| CategoryResponse::from_row(row, recipe_count))
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}
