pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::models::Category;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for category endpoints (mounted at /api/v1/categories)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_categories).post(create::create_category))
        .route(
            "/{slug}",
            get(get::get_category)
                .put(update::update_category)
                .delete(delete::delete_category),
        )
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Number of recipes referencing this category
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryResponse {
    pub(crate) fn from_row(row: Category, recipe_count: i64) -> Self {
        CategoryResponse {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            recipe_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_categories,
        create::create_category,
        get::get_category,
        update::update_category,
        delete::delete_category,
    ),
    components(schemas(CategoryResponse, create::CategoryRequest))
)]
pub struct ApiDoc;
