pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::models::Ethnicity;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for ethnicity endpoints (mounted at /api/v1/ethnicities)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_ethnicities).post(create::create_ethnicity))
        .route(
            "/{slug}",
            get(get::get_ethnicity)
                .put(update::update_ethnicity)
                .delete(delete::delete_ethnicity),
        )
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EthnicityResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Number of recipes referencing this ethnicity
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EthnicityResponse {
    pub(crate) fn from_row(row: Ethnicity, recipe_count: i64) -> Self {
        EthnicityResponse {
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
        list::list_ethnicities,
        create::create_ethnicity,
        get::get_ethnicity,
        update::update_ethnicity,
        delete::delete_ethnicity,
    ),
    components(schemas(EthnicityResponse, create::EthnicityRequest))
)]
pub struct ApiDoc;
