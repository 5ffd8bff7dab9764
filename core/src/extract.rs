//! Heuristic recipe extraction from HTML.
//!
//! Works against the markup patterns recipe sites actually use: class
//! names containing "ingredient", "instruction"/"direction"/"method",
//! and the usual prep/cook/servings spans. Selectors are compiled once.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::normalize::{clean_text, parse_minutes, parse_servings};
use crate::record::RecipeInput;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no title found")]
    NoTitle,

    #[error("no ingredients found")]
    NoIngredients,

    #[error("no instructions found")]
    NoInstructions,
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

macro_rules! static_selector {
    ($css:expr) => {{
        static SEL: OnceLock<Selector> = OnceLock::new();
        SEL.get_or_init(|| sel($css))
    }};
}

fn element_text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<String>())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

fn item_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract a candidate recipe from a page. The caller supplies the
/// target ethnicity and category; everything else comes from the markup.
/// The result still goes through the shared validation path.
pub fn extract_recipe(
    html: &str,
    ethnicity: &str,
    category: &str,
) -> Result<RecipeInput, ExtractError> {
    let document = Html::parse_document(html);

    let title = first_text(
        &document,
        static_selector!("h1.recipe-title, h1.entry-title, h1"),
    )
    .or_else(|| first_text(&document, static_selector!("title")))
    .ok_or(ExtractError::NoTitle)?;

    let description = first_text(
        &document,
        static_selector!("[class*=\"description\"], [class*=\"summary\"]"),
    )
    .or_else(|| {
        document
            .select(static_selector!("meta[name=\"description\"]"))
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| clean_text(s))
    })
    .unwrap_or_default();

    let mut ingredients = item_texts(&document, static_selector!("[class*=\"ingredient\"] li"));
    if ingredients.is_empty() {
        ingredients = item_texts(&document, static_selector!("[class*=\"ingredient\"] p"));
    }
    if ingredients.is_empty() {
        return Err(ExtractError::NoIngredients);
    }

    let mut instructions = item_texts(
        &document,
        static_selector!(
            "[class*=\"instruction\"] li, [class*=\"direction\"] li, [class*=\"method\"] li, [class*=\"step\"] li"
        ),
    );
    if instructions.is_empty() {
        instructions = item_texts(
            &document,
            static_selector!("[class*=\"instruction\"] p, [class*=\"direction\"] p, [class*=\"method\"] p"),
        );
    }
    if instructions.is_empty() {
        return Err(ExtractError::NoInstructions);
    }

    let prep_time_minutes = first_text(&document, static_selector!("[class*=\"prep-time\"]"))
        .map(|t| parse_minutes(&t));
    let cook_time_minutes = first_text(&document, static_selector!("[class*=\"cook-time\"]"))
        .map(|t| parse_minutes(&t));
    let servings = first_text(
        &document,
        static_selector!("[class*=\"servings\"], [class*=\"yield\"]"),
    )
    .map(|t| parse_servings(&t));

    Ok(RecipeInput {
        title,
        ethnicity: ethnicity.to_string(),
        category: category.to_string(),
        description,
        ingredients,
        instructions,
        prep_time_minutes,
        cook_time_minutes,
        servings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Fallback</title></head><body>
        <h1 class="entry-title">Efo Riro</h1>
        <div class="recipe-description">A rich spinach stew.</div>
        <span class="prep-time">Prep: 20 minutes</span>
        <span class="cook-time">Cook: 1 hour</span>
        <span class="servings">Serves 4-6</span>
        <ul class="ingredients-list">
            <li>2 bunches spinach</li>
            <li>1 cup palm oil</li>
        </ul>
        <ol class="instructions">
            <li>Wash the spinach.</li>
            <li>Cook the stew base.</li>
        </ol>
        </body></html>"#;

    #[test]
    fn test_extract_full_page() {
        let input = extract_recipe(PAGE, "Yoruba", "Soup").unwrap();
        assert_eq!(input.title, "Efo Riro");
        assert_eq!(input.description, "A rich spinach stew.");
        assert_eq!(input.prep_time_minutes, Some(20));
        assert_eq!(input.cook_time_minutes, Some(60));
        assert_eq!(input.servings, Some(5));
        assert_eq!(
            input.ingredients,
            vec!["2 bunches spinach", "1 cup palm oil"]
        );
        assert_eq!(
            input.instructions,
            vec!["Wash the spinach.", "Cook the stew base."]
        );
    }

    #[test]
    fn test_extract_validates_downstream() {
        let input = extract_recipe(PAGE, "Yoruba", "Soup").unwrap();
        let draft = input.validate().unwrap();
        assert_eq!(draft.servings, 5);
    }

    #[test]
    fn test_missing_ingredients_rejected() {
        let html = "<html><body><h1>Bare Page</h1></body></html>";
        assert!(matches!(
            extract_recipe(html, "Yoruba", "Soup"),
            Err(ExtractError::NoIngredients)
        ));
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let html = r#"<html><head><title>Akara | Recipes</title></head><body>
            <div class="ingredients"><li>beans</li></div>
            <div class="method"><li>fry</li></div>
            </body></html>"#;
        let input = extract_recipe(html, "Yoruba", "Snack").unwrap();
        assert_eq!(input.title, "Akara | Recipes");
    }
}
