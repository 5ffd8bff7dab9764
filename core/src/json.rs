//! JSON batch import: a file holding either a top-level array of recipe
//! objects or `{"recipes": [...]}`.

use std::path::Path;

use crate::batch::{import_candidates, BatchReport, Candidate};
use crate::error::ImportError;
use crate::record::RecipeInput;
use crate::store::CatalogStore;

/// Parse a JSON document into per-record candidates.
///
/// The document-level shape is batch-scope: a file that is not valid JSON
/// or not a recipe sequence fails the whole run. Individual records that
/// fail to deserialize or validate become failed candidates.
pub fn parse_batch(text: &str) -> Result<Vec<Candidate>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ImportError::Source(format!("invalid JSON: {}", e)))?;

    let records = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(obj) => obj
            .get("recipes")
            .and_then(|v| v.as_array())
            .map(|a| a.as_slice())
            .ok_or_else(|| {
                ImportError::Source("expected a recipe array or {\"recipes\": [...]}".to_string())
            })?,
        _ => {
            return Err(ImportError::Source(
                "expected a recipe array or {\"recipes\": [...]}".to_string(),
            ))
        }
    };

    let candidates = records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            // Prefer the record's own title as its identifier, even when
            // the rest of the record is malformed.
            let identifier = raw
                .get("title")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("record {}", index + 1));

            let draft = serde_json::from_value::<RecipeInput>(raw.clone())
                .map_err(|e| ImportError::Validation(e.to_string()))
                .and_then(RecipeInput::validate);

            Candidate { identifier, draft }
        })
        .collect();

    Ok(candidates)
}

/// Import every recipe in a JSON file. File-level errors are fatal;
/// record-level errors are collected into the report.
pub fn import_file<S: CatalogStore>(
    store: &mut S,
    path: &Path,
) -> Result<BatchReport, ImportError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ImportError::Source(format!("cannot read {}: {}", path.display(), e)))?;

    let candidates = parse_batch(&text)?;
    tracing::info!(path = %path.display(), records = candidates.len(), "importing JSON batch");

    Ok(import_candidates(store, candidates, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const JOLLOF: &str = r#"[{"title": "Jollof Rice", "ethnicity": "Yoruba", "category": "Main",
        "ingredients": ["rice", "tomato"], "instructions": ["cook"]}]"#;

    #[test]
    fn test_top_level_array() {
        let candidates = parse_batch(JOLLOF).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].draft.is_ok());
    }

    #[test]
    fn test_recipes_envelope() {
        let text = format!("{{\"recipes\": {}}}", JOLLOF);
        let candidates = parse_batch(&text).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_not_a_sequence_is_fatal() {
        assert!(matches!(
            parse_batch("{\"title\": \"x\"}"),
            Err(ImportError::Source(_))
        ));
        assert!(matches!(parse_batch("not json"), Err(ImportError::Source(_))));
    }

    #[test]
    fn test_malformed_record_reported_by_title() {
        let text = r#"[
            {"title": "Egusi Soup", "ethnicity": "Igbo", "category": "Soup",
             "ingredients": ["egusi"], "instructions": ["grind", "cook"]},
            {"title": "Broken", "ethnicity": "Igbo", "category": "Soup",
             "ingredients": "not-a-list", "instructions": ["cook"]},
            {"title": "Suya", "ethnicity": "Hausa", "category": "Grill",
             "ingredients": ["beef", "yaji"], "instructions": ["skewer", "grill"]}
        ]"#;

        let mut store = MemoryStore::default();
        let report = import_candidates(&mut store, parse_batch(text).unwrap(), None);

        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures[0].identifier, "Broken");
        assert_eq!(store.recipes.len(), 2);
    }

    #[test]
    fn test_jollof_rice_scenario_end_to_end() {
        let mut store = MemoryStore::default();

        let first = import_candidates(&mut store, parse_batch(JOLLOF).unwrap(), None);
        assert_eq!(first.created, 1);

        let second = import_candidates(&mut store, parse_batch(JOLLOF).unwrap(), None);
        assert_eq!(second.updated, 1);

        assert_eq!(store.recipes.len(), 1);
        assert!(store.recipes.contains_key("jollof-rice"));
    }
}
