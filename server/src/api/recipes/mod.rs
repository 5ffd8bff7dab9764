pub mod by_ethnicity;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod quick;
pub mod statistics;
pub mod update;

use crate::models::{string_list, Recipe};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for recipe endpoints (mounted at /api/v1/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/by-ethnicity", get(by_ethnicity::recipes_by_ethnicity))
        .route("/quick", get(quick::quick_recipes))
        .route("/statistics", get(statistics::recipe_statistics))
        .route(
            "/{slug}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

/// Recipe row plus the ethnicity/category names and slugs it joins to.
pub(crate) type JoinedRecipe = (Recipe, String, String, String, String);

/// Look up an ethnicity by slug, returning its id and display name.
pub(crate) fn ethnicity_by_slug(
    conn: &mut diesel::PgConnection,
    slug: &str,
) -> diesel::QueryResult<Option<(Uuid, String)>> {
    use crate::schema::ethnicities;
    use diesel::prelude::*;

    ethnicities::table
        .filter(ethnicities::slug.eq(slug))
        .select((ethnicities::id, ethnicities::name))
        .first(conn)
        .optional()
}

/// Look up a category by slug, returning its id and display name.
pub(crate) fn category_by_slug(
    conn: &mut diesel::PgConnection,
    slug: &str,
) -> diesel::QueryResult<Option<(Uuid, String)>> {
    use crate::schema::categories;
    use diesel::prelude::*;

    categories::table
        .filter(categories::slug.eq(slug))
        .select((categories::id, categories::name))
        .first(conn)
        .optional()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub ethnicity: String,
    pub ethnicity_slug: String,
    pub category: String,
    pub category_slug: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    /// prep + cook; derived in responses, never stored
    pub total_time_minutes: i32,
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeResponse {
    pub(crate) fn from_joined(row: JoinedRecipe) -> Self {
        let (recipe, ethnicity, ethnicity_slug, category, category_slug) = row;
        RecipeResponse {
            id: recipe.id,
            title: recipe.title,
            slug: recipe.slug,
            description: recipe.description,
            ethnicity,
            ethnicity_slug,
            category,
            category_slug,
            ingredients: string_list(&recipe.ingredients),
            instructions: string_list(&recipe.instructions),
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            total_time_minutes: recipe.prep_time_minutes + recipe.cook_time_minutes,
            servings: recipe.servings,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        by_ethnicity::recipes_by_ethnicity,
        quick::quick_recipes,
        statistics::recipe_statistics,
    ),
    components(schemas(
        RecipeResponse,
        list::ListRecipesResponse,
        list::PaginationMetadata,
        create::RecipeRequest,
        by_ethnicity::ByEthnicityResponse,
        quick::QuickRecipesResponse,
        statistics::StatisticsResponse,
        statistics::GroupCount,
    ))
)]
pub struct ApiDoc;
