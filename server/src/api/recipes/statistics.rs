use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{categories, ethnicities, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::{count, sql};
use diesel::prelude::*;
use diesel::sql_types::{Double, Nullable};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub total_recipes: i64,
    pub by_ethnicity: Vec<GroupCount>,
    pub by_category: Vec<GroupCount>,
    /// 0 when the catalog is empty
    pub average_prep_time_minutes: f64,
    pub average_cook_time_minutes: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/statistics",
    tag = "recipes",
    responses(
        (status = 200, description = "Catalog-wide aggregates", body = StatisticsResponse)
    )
)]
pub async fn recipe_statistics(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let total_recipes: i64 = match recipes::table.count().get_result(&mut conn) {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Failed to count recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute statistics".to_string(),
                }),
            )
                .into_response();
        }
    };

    let by_ethnicity: Vec<(String, i64)> = match ethnicities::table
        .inner_join(recipes::table)
        .group_by(ethnicities::name)
        .select((ethnicities::name, count(recipes::id)))
        .order(ethnicities::name.asc())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to count recipes by ethnicity: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute statistics".to_string(),
                }),
            )
                .into_response();
        }
    };

    let by_category: Vec<(String, i64)> = match categories::table
        .inner_join(recipes::table)
        .group_by(categories::name)
        .select((categories::name, count(recipes::id)))
        .order(categories::name.asc())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to count recipes by category: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute statistics".to_string(),
                }),
            )
                .into_response();
        }
    };

    // AVG over integers is NUMERIC in Postgres; cast so diesel reads f64
    let averages: (Option<f64>, Option<f64>) = match recipes::table
        .select((
            sql::<Nullable<Double>>("AVG(prep_time_minutes)::FLOAT8"),
            sql::<Nullable<Double>>("AVG(cook_time_minutes)::FLOAT8"),
        ))
        .first(&mut conn)
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to average times: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute statistics".to_string(),
                }),
            )
                .into_response();
        }
    };

    let to_groups = |rows: Vec<(String, i64)>| {
        rows.into_iter()
            .map(|(name, count)| GroupCount { name, count })
            .collect()
    };

    (
        StatusCode::OK,
        Json(StatisticsResponse {
            total_recipes,
            by_ethnicity: to_groups(by_ethnicity),
            by_category: to_groups(by_category),
            average_prep_time_minutes: averages.0.unwrap_or(0.0),
            average_cook_time_minutes: averages.1.unwrap_or(0.0),
        }),
    )
        .into_response()
}
