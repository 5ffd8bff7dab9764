//! PDF cookbook import: extract page text, segment it into candidate
//! recipe blocks, and funnel them through the shared validation path.
//!
//! Segmentation is heuristic by nature. A block that cannot be read as a
//! recipe is recorded as a failure and never aborts the rest of the file.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::batch::{import_candidates, BatchReport, Candidate};
use crate::error::ImportError;
use crate::record::RecipeInput;
use crate::store::CatalogStore;

/// Dish words that mark a short line as a probable recipe title.
const FOOD_KEYWORDS: &[&str] = &[
    "rice", "soup", "stew", "jollof", "egusi", "efo", "okra", "beans", "yam", "plantain",
    "chicken", "fish", "meat", "pepper", "tuwo", "masa", "moi moi", "akara", "suya", "fufu",
    "garri", "amala", "pounded", "fried", "boiled",
];

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\-\*\u{2022}\u{25E6}]\s*").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Extract the text of every page, joined with blank lines between pages.
pub fn extract_text(path: &Path) -> Result<String, ImportError> {
    let document = lopdf::Document::load(path)
        .map_err(|e| ImportError::Source(format!("cannot read {}: {}", path.display(), e)))?;

    let mut full_text = String::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => {
                full_text.push_str(&text);
                full_text.push_str("\n\n");
            }
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "page text extraction failed");
            }
        }
    }

    if full_text.trim().is_empty() {
        return Err(ImportError::Source(format!(
            "no text extracted from {}",
            path.display()
        )));
    }

    Ok(full_text)
}

/// Does this line look like the start of a new recipe?
///
/// Titles are short, start a line of their own, and either name a known
/// dish word or are set in all caps. Sentences, bullets, and metadata
/// lines ("Prep time: 20") are rejected up front.
fn is_likely_title(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.len() > 50 {
        return false;
    }
    let first = line.chars().next().unwrap_or(' ');
    if first.is_ascii_digit() || bullet_re().is_match(line) {
        return false;
    }
    if line.ends_with(['.', ':', ',', ';']) {
        return false;
    }
    if line.split_whitespace().count() > 6 {
        return false;
    }

    let lower = line.to_lowercase();
    if FOOD_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }

    // An all-caps heading is a title even without a known dish word.
    line.len() > 3
        && line.chars().any(|c| c.is_alphabetic())
        && !line.chars().any(|c| c.is_lowercase())
}

/// Split extracted text into one block per candidate recipe, using title
/// lines as delimiters. Text before the first title is discarded.
pub fn split_into_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_likely_title(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(vec![line]);
        } else if let Some(block) = current.as_mut() {
            block.push(line);
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }

    blocks.into_iter().map(|lines| lines.join("\n")).collect()
}

enum Section {
    Description,
    Ingredients,
    Instructions,
    Notes,
}

fn first_number(line: &str) -> Option<u32> {
    number_re()
        .find(line)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse one block into a candidate record: first line is the title,
/// marker lines switch sections, metadata lines set times and servings.
pub fn parse_block(block: &str, ethnicity: &str, category: &str) -> Option<RecipeInput> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
    let title = lines.next()?.to_string();

    let mut description: Vec<String> = Vec::new();
    let mut ingredients: Vec<String> = Vec::new();
    let mut instructions: Vec<String> = Vec::new();
    let mut prep_time_minutes = None;
    let mut cook_time_minutes = None;
    let mut servings = None;
    let mut section = Section::Description;

    for line in lines {
        let lower = line.to_lowercase();

        if ["ingredient", "you will need", "what you need"]
            .iter()
            .any(|m| lower.contains(m))
        {
            section = Section::Ingredients;
            continue;
        }
        if ["instruction", "method", "direction", "preparation", "how to", "steps"]
            .iter()
            .any(|m| lower.contains(m))
        {
            section = Section::Instructions;
            continue;
        }
        if ["note", "tip", "hint", "suggestion"].iter().any(|m| lower.contains(m)) {
            section = Section::Notes;
            continue;
        }
        if lower.contains("prep time") || lower.contains("preparation time") {
            prep_time_minutes = first_number(line).or(prep_time_minutes);
            continue;
        }
        if lower.contains("cook time") || lower.contains("cooking time") {
            cook_time_minutes = first_number(line).or(cook_time_minutes);
            continue;
        }
        if lower.contains("serve") || lower.contains("serving") || lower.contains("yield") {
            servings = first_number(line).or(servings);
            continue;
        }

        match section {
            Section::Description => description.push(line.to_string()),
            Section::Ingredients => {
                let item = bullet_re().replace(line, "").trim().to_string();
                if !item.is_empty() {
                    ingredients.push(item);
                }
            }
            Section::Instructions => instructions.push(line.to_string()),
            Section::Notes => {} // notes are not part of the catalog model
        }
    }

    Some(RecipeInput {
        title,
        ethnicity: ethnicity.to_string(),
        category: category.to_string(),
        description: description.join(" "),
        ingredients,
        instructions,
        prep_time_minutes,
        cook_time_minutes,
        servings,
    })
}

/// Turn the whole extracted text into candidates for the batch engine.
pub fn parse_candidates(text: &str, ethnicity: &str, category: &str) -> Vec<Candidate> {
    split_into_blocks(text)
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let identifier = block
                .lines()
                .next()
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| format!("section {}", index + 1));

            let draft = parse_block(block, ethnicity, category)
                .ok_or_else(|| ImportError::Validation("unreadable section".to_string()))
                .and_then(|input| input.validate());

            Candidate { identifier, draft }
        })
        .collect()
}

/// Import every recipe found in a PDF file. An unreadable file is fatal;
/// per-section failures are collected into the report.
pub fn import_file<S: CatalogStore>(
    store: &mut S,
    path: &Path,
    ethnicity: &str,
    category: &str,
) -> Result<BatchReport, ImportError> {
    let text = extract_text(path)?;
    let candidates = parse_candidates(&text, ethnicity, category);
    tracing::info!(path = %path.display(), sections = candidates.len(), "importing PDF");

    if candidates.is_empty() {
        return Err(ImportError::Source(format!(
            "no recipe sections found in {}",
            path.display()
        )));
    }

    Ok(import_candidates(store, candidates, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const COOKBOOK: &str = "\
Jollof Rice
A one-pot party classic.
Ingredients
- 2 cups rice
- 4 tomatoes
Instructions
Blend the tomatoes.
Cook the rice in the sauce.
Serves 6
Prep time: 20 minutes
Cook time: 40 minutes

EGUSI SOUP
What you need
1 cup ground egusi
2 cups spinach
Method
Toast the egusi.
Simmer with spinach.
";

    #[test]
    fn test_title_heuristic() {
        assert!(is_likely_title("Jollof Rice"));
        assert!(is_likely_title("EGUSI SOUP"));
        assert!(is_likely_title("Pepper Soup"));
        assert!(!is_likely_title("2 cups rice"));
        assert!(!is_likely_title(
            "This long sentence is clearly body text and not any kind of heading"
        ));
    }

    #[test]
    fn test_split_into_blocks() {
        let blocks = split_into_blocks(COOKBOOK);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Jollof Rice"));
        assert!(blocks[1].starts_with("EGUSI SOUP"));
    }

    #[test]
    fn test_parse_block_sections() {
        let blocks = split_into_blocks(COOKBOOK);
        let input = parse_block(&blocks[0], "Yoruba", "Main").unwrap();

        assert_eq!(input.title, "Jollof Rice");
        assert_eq!(input.description, "A one-pot party classic.");
        assert_eq!(input.ingredients, vec!["2 cups rice", "4 tomatoes"]);
        assert_eq!(
            input.instructions,
            vec!["Blend the tomatoes.", "Cook the rice in the sauce."]
        );
        assert_eq!(input.prep_time_minutes, Some(20));
        assert_eq!(input.cook_time_minutes, Some(40));
        assert_eq!(input.servings, Some(6));
    }

    #[test]
    fn test_candidates_import_end_to_end() {
        let mut store = MemoryStore::default();
        let candidates = parse_candidates(COOKBOOK, "Yoruba", "Main");
        let report = import_candidates(&mut store, candidates, None);

        assert_eq!(report.created, 2);
        assert!(store.recipes.contains_key("jollof-rice"));
        assert!(store.recipes.contains_key("egusi-soup"));
    }

    #[test]
    fn test_bad_section_is_recorded_not_fatal() {
        let text = "Pepper Soup\nIngredients\nInstructions\n\nSuya\nIngredients\n- beef\nMethod\nGrill it.\n";
        let mut store = MemoryStore::default();
        let report = import_candidates(
            &mut store,
            parse_candidates(text, "Hausa", "Grill"),
            None,
        );

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures[0].identifier, "Pepper Soup");
    }
}
