//! Server-rendered browse/detail pages. Read-only; all writes go through
//! the API or the import CLI.

use crate::db::DbPool;
use crate::models::{string_list, Recipe};
use crate::schema::{categories, ethnicities, recipes};
use crate::store::escape_like;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const PAGE_SIZE: i64 = 12;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse))
        .route("/recipe/{slug}", get(recipe_detail))
        .route("/ethnicity/{slug}", get(ethnicity_page))
}

/// Escape text for interpolation into HTML body or attribute context.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a query-string value.
fn urlencode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} - Calabash</title>\n\
         <style>\n\
         body {{ font-family: Georgia, serif; max-width: 60rem; margin: 0 auto; padding: 1rem; color: #222; }}\n\
         a {{ color: #a0522d; }}\n\
         header h1 a {{ text-decoration: none; color: inherit; }}\n\
         .cards {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1rem; }}\n\
         .card {{ border: 1px solid #ddd; border-radius: 4px; padding: 1rem; }}\n\
         .card h3 {{ margin-top: 0; }}\n\
         .meta {{ color: #666; font-size: 0.9rem; }}\n\
         form.filters {{ margin: 1rem 0; }}\n\
         form.filters select, form.filters input {{ margin-right: 0.5rem; }}\n\
         nav.pager {{ margin: 1.5rem 0; }}\n\
         </style>\n</head>\n<body>\n\
         <header><h1><a href=\"/\">Calabash</a></h1></header>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

fn error_page(status: StatusCode, message: &str) -> Response {
    (
        status,
        page("Error", &format!("<p>{}</p>", escape(message))),
    )
        .into_response()
}

macro_rules! web_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                return error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed",
                );
            }
        }
    };
}

fn recipe_card(slug: &str, title: &str, description: &str, total_time: i32, servings: i32) -> String {
    let blurb = if description.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", escape(description))
    };
    format!(
        "<div class=\"card\"><h3><a href=\"/recipe/{}\">{}</a></h3>{}\
         <p class=\"meta\">{} min &middot; serves {}</p></div>",
        escape(slug),
        escape(title),
        blurb,
        total_time,
        servings
    )
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    page: Option<i64>,
    ethnicity: Option<String>,
    category: Option<String>,
    q: Option<String>,
}

async fn browse(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<BrowseParams>,
) -> Response {
    let page_number = params.page.unwrap_or(1).max(1);
    let offset = (page_number - 1) * PAGE_SIZE;

    let search = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let search_pattern = search.as_deref().map(|s| format!("%{}%", escape_like(s)));

    let mut conn = web_conn!(pool);

    let mut query = recipes::table
        .inner_join(ethnicities::table)
        .inner_join(categories::table)
        .into_boxed();

    if let Some(ref slug) = params.ethnicity {
        if !slug.is_empty() {
            query = query.filter(ethnicities::slug.eq(slug));
        }
    }
    if let Some(ref slug) = params.category {
        if !slug.is_empty() {
            query = query.filter(categories::slug.eq(slug));
        }
    }
    if let Some(ref pattern) = search_pattern {
        query = query.filter(
            recipes::title
                .ilike(pattern)
                .or(recipes::description.ilike(pattern)),
        );
    }

    type BrowseRow = (Recipe, i64);
    let rows: Vec<BrowseRow> = match query
        .order(recipes::created_at.desc())
        .select((Recipe::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(PAGE_SIZE)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load browse page: {}", e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipes");
        }
    };

    let filters: (Vec<(String, String)>, Vec<(String, String)>) = match (
        ethnicities::table
            .select((ethnicities::name, ethnicities::slug))
            .order(ethnicities::name.asc())
            .load(&mut conn),
        categories::table
            .select((categories::name, categories::slug))
            .order(categories::name.asc())
            .load(&mut conn),
    ) {
        (Ok(e), Ok(c)) => (e, c),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to load filter options: {}", e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipes");
        }
    };

    let total = rows.last().map(|r| r.1).unwrap_or(0);
    let total_pages = (total + PAGE_SIZE - 1) / PAGE_SIZE;

    let mut body = String::new();

    let options = |items: &[(String, String)], selected: Option<&str>| {
        let mut out = String::from("<option value=\"\">all</option>");
        for (name, slug) in items {
            let marker = if selected == Some(slug.as_str()) {
                " selected"
            } else {
                ""
            };
            let _ = write!(
                out,
                "<option value=\"{}\"{}>{}</option>",
                escape(slug),
                marker,
                escape(name)
            );
        }
        out
    };

    let _ = write!(
        body,
        "<form class=\"filters\" method=\"get\" action=\"/\">\
         <select name=\"ethnicity\">{}</select>\
         <select name=\"category\">{}</select>\
         <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Search recipes\">\
         <button type=\"submit\">Filter</button></form>",
        options(&filters.0, params.ethnicity.as_deref()),
        options(&filters.1, params.category.as_deref()),
        escape(search.as_deref().unwrap_or(""))
    );

    if rows.is_empty() {
        body.push_str("<p>No recipes found.</p>");
    } else {
        body.push_str("<div class=\"cards\">");
        for (recipe, _) in &rows {
            body.push_str(&recipe_card(
                &recipe.slug,
                &recipe.title,
                &recipe.description,
                recipe.prep_time_minutes + recipe.cook_time_minutes,
                recipe.servings,
            ));
        }
        body.push_str("</div>");
    }

    // Pager links keep the active filters
    let mut query_string = String::new();
    if let Some(ref slug) = params.ethnicity {
        let _ = write!(query_string, "&ethnicity={}", urlencode(slug));
    }
    if let Some(ref slug) = params.category {
        let _ = write!(query_string, "&category={}", urlencode(slug));
    }
    if let Some(ref q) = search {
        let _ = write!(query_string, "&q={}", urlencode(q));
    }

    body.push_str("<nav class=\"pager\">");
    if page_number > 1 {
        let _ = write!(
            body,
            "<a href=\"/?page={}{}\">&laquo; previous</a> ",
            page_number - 1,
            query_string
        );
    }
    let _ = write!(
        body,
        "page {} of {}",
        page_number,
        total_pages.max(1)
    );
    if page_number < total_pages {
        let _ = write!(
            body,
            " <a href=\"/?page={}{}\">next &raquo;</a>",
            page_number + 1,
            query_string
        );
    }
    body.push_str("</nav>");

    page("Browse recipes", &body).into_response()
}

async fn recipe_detail(State(pool): State<Arc<DbPool>>, Path(slug): Path<String>) -> Response {
    let mut conn = web_conn!(pool);

    type DetailRow = (Recipe, String, String);
    let row: Option<DetailRow> = match recipes::table
        .inner_join(ethnicities::table)
        .inner_join(categories::table)
        .filter(recipes::slug.eq(&slug))
        .select((Recipe::as_select(), ethnicities::name, categories::name))
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load recipe page: {}", e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipe");
        }
    };

    let (recipe, ethnicity_name, category_name) = match row {
        Some(r) => r,
        None => return error_page(StatusCode::NOT_FOUND, "Recipe not found"),
    };

    // Up to four other dishes from the same kitchen
    let related: Vec<Recipe> = recipes::table
        .filter(recipes::ethnicity_id.eq(recipe.ethnicity_id))
        .filter(recipes::id.ne(recipe.id))
        .order(recipes::created_at.desc())
        .limit(4)
        .select(Recipe::as_select())
        .load(&mut conn)
        .unwrap_or_default();

    let mut body = String::new();
    let _ = write!(
        body,
        "<h2>{}</h2>\
         <p class=\"meta\">{} &middot; {} &middot; prep {} min &middot; cook {} min &middot; serves {}</p>",
        escape(&recipe.title),
        escape(&ethnicity_name),
        escape(&category_name),
        recipe.prep_time_minutes,
        recipe.cook_time_minutes,
        recipe.servings
    );

    if !recipe.description.is_empty() {
        let _ = write!(body, "<p>{}</p>", escape(&recipe.description));
    }

    body.push_str("<h3>Ingredients</h3><ul>");
    for item in string_list(&recipe.ingredients) {
        let _ = write!(body, "<li>{}</li>", escape(&item));
    }
    body.push_str("</ul><h3>Instructions</h3><ol>");
    for step in string_list(&recipe.instructions) {
        let _ = write!(body, "<li>{}</li>", escape(&step));
    }
    body.push_str("</ol>");

    if !related.is_empty() {
        let _ = write!(body, "<h3>More {} recipes</h3><ul>", escape(&ethnicity_name));
        for other in &related {
            let _ = write!(
                body,
                "<li><a href=\"/recipe/{}\">{}</a></li>",
                escape(&other.slug),
                escape(&other.title)
            );
        }
        body.push_str("</ul>");
    }

    page(&recipe.title, &body).into_response()
}

async fn ethnicity_page(State(pool): State<Arc<DbPool>>, Path(slug): Path<String>) -> Response {
    let mut conn = web_conn!(pool);

    let ethnicity: Option<(String, String)> = match ethnicities::table
        .filter(ethnicities::slug.eq(&slug))
        .select((ethnicities::name, ethnicities::description))
        .first(&mut conn)
        .optional()
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load ethnicity page: {}", e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load page");
        }
    };

    let (name, description) = match ethnicity {
        Some(r) => r,
        None => return error_page(StatusCode::NOT_FOUND, "Ethnicity not found"),
    };

    let rows: Vec<Recipe> = match recipes::table
        .inner_join(ethnicities::table)
        .filter(ethnicities::slug.eq(&slug))
        .order(recipes::title.asc())
        .select(Recipe::as_select())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load ethnicity page: {}", e);
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load page");
        }
    };

    let mut body = String::new();
    let _ = write!(body, "<h2>{} recipes</h2>", escape(&name));
    if !description.is_empty() {
        let _ = write!(body, "<p>{}</p>", escape(&description));
    }

    if rows.is_empty() {
        body.push_str("<p>No recipes yet.</p>");
    } else {
        body.push_str("<div class=\"cards\">");
        for recipe in &rows {
            body.push_str(&recipe_card(
                &recipe.slug,
                &recipe.title,
                &recipe.description,
                recipe.prep_time_minutes + recipe.cook_time_minutes,
                recipe.servings,
            ));
        }
        body.push_str("</div>");
    }

    page(&format!("{} recipes", name), &body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>\"&\"</script>"),
            "&lt;script&gt;&quot;&amp;&quot;&lt;/script&gt;"
        );
        assert_eq!(escape("Efo Riro"), "Efo Riro");
    }

    #[test]
    fn test_urlencode_query_values() {
        assert_eq!(urlencode("jollof rice"), "jollof+rice");
        assert_eq!(urlencode("a&b=c"), "a%26b%3Dc");
        assert_eq!(urlencode("efo-riro"), "efo-riro");
    }

    #[test]
    fn test_recipe_card_escapes_fields() {
        let card = recipe_card("x", "<b>Title</b>", "", 45, 4);
        assert!(card.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert!(card.contains("45 min"));
        assert!(!card.contains("<p></p>"));
    }
}
