use crate::api::ethnicities::EthnicityResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Ethnicity;
use crate::schema::{ethnicities, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::count;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/ethnicities",
    tag = "ethnicities",
    responses(
        (status = 200, description = "All ethnicities with recipe counts", body = Vec<EthnicityResponse>)
    )
)]
pub async fn list_ethnicities(State(pool): State<Arc<DbPool>>) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<(Ethnicity, i64)> = match ethnicities::table
        .left_join(recipes::table)
        .group_by(ethnicities::id)
        .select((Ethnicity::as_select(), count(recipes::id.nullable())))
        .order(ethnicities::name.asc())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list ethnicities: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch ethnicities".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<EthnicityResponse> = rows
        .into_iter()
        .map(|(row, recipe_count)| EthnicityResponse::from_row(row, recipe_count))
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}
