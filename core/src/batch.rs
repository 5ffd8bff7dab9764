//! The shared upsert path for all three import sources.
//!
//! One record's failure never aborts the batch: every candidate is
//! processed and the run always ends with a [`BatchReport`].

use crate::error::ImportError;
use crate::record::RecipeDraft;
use crate::slug::{slugify, suffixed};
use crate::store::{CatalogStore, UpsertOutcome};

/// One parsed-or-failed record heading into the upsert path.
/// The identifier is the record's title when known, otherwise a
/// positional label ("record 3", a URL, a PDF section).
pub struct Candidate {
    pub identifier: String,
    pub draft: Result<RecipeDraft, ImportError>,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub identifier: String,
    pub reason: String,
}

/// Summary of one import invocation.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }

    pub fn record_failure(&mut self, identifier: impl Into<String>, err: &ImportError) {
        self.skipped += 1;
        self.failures.push(Failure {
            identifier: identifier.into(),
            reason: err.to_string(),
        });
    }

    pub(crate) fn record_outcome(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// Resolve references, allocate a slug, and upsert one validated draft.
pub fn import_one<S: CatalogStore>(
    store: &mut S,
    draft: &RecipeDraft,
) -> Result<UpsertOutcome, ImportError> {
    let ethnicity = store
        .resolve_ethnicity(&draft.ethnicity)
        .map_err(|e| ImportError::Resolution(format!("ethnicity {:?}: {}", draft.ethnicity, e)))?;
    let category = store
        .resolve_category(&draft.category)
        .map_err(|e| ImportError::Resolution(format!("category {:?}: {}", draft.category, e)))?;

    let slug = allocate_slug(store, &draft.title)?;
    let outcome = store.upsert_recipe(&slug, draft, ethnicity, category)?;

    tracing::debug!(title = %draft.title, %slug, ?outcome, "imported recipe");
    Ok(outcome)
}

/// Slugify the title, then walk numeric suffixes until the slug is free
/// or already belongs to a recipe with this exact title (update case).
fn allocate_slug<S: CatalogStore>(store: &mut S, title: &str) -> Result<String, ImportError> {
    let base = slugify(title);
    if base.is_empty() {
        return Err(ImportError::Validation(format!(
            "title {:?} produces an empty slug",
            title
        )));
    }

    let mut slug = base.clone();
    let mut n = 2;
    loop {
        match store.recipe_title_for_slug(&slug)? {
            None => return Ok(slug),
            Some(existing) if existing == title => return Ok(slug),
            Some(_) => {
                slug = suffixed(&base, n);
                n += 1;
            }
        }
    }
}

/// Run a whole batch of candidates through [`import_one`].
///
/// `limit` bounds how many records are ingested (counted by successful
/// upserts); candidates beyond the limit are left untouched.
pub fn import_candidates<S: CatalogStore>(
    store: &mut S,
    candidates: Vec<Candidate>,
    limit: Option<usize>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for candidate in candidates {
        if let Some(max) = limit {
            if report.imported() >= max {
                break;
            }
        }

        match candidate.draft {
            Ok(draft) => match import_one(store, &draft) {
                Ok(outcome) => report.record_outcome(outcome),
                Err(err) => {
                    tracing::warn!(identifier = %candidate.identifier, error = %err, "record failed");
                    report.record_failure(candidate.identifier, &err);
                }
            },
            Err(err) => {
                tracing::warn!(identifier = %candidate.identifier, error = %err, "record rejected");
                report.record_failure(candidate.identifier, &err);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            ethnicity: "Yoruba".to_string(),
            category: "Main".to_string(),
            description: String::new(),
            ingredients: vec!["rice".to_string(), "tomato".to_string()],
            instructions: vec!["cook".to_string()],
            prep_time_minutes: 30,
            cook_time_minutes: 30,
            servings: 4,
        }
    }

    fn ok(title: &str) -> Candidate {
        Candidate {
            identifier: title.to_string(),
            draft: Ok(draft(title)),
        }
    }

    #[test]
    fn test_import_twice_is_idempotent() {
        let mut store = MemoryStore::default();

        let first = import_candidates(&mut store, vec![ok("Jollof Rice")], None);
        assert_eq!(first.created, 1);
        assert_eq!(first.updated, 0);

        let second = import_candidates(&mut store, vec![ok("Jollof Rice")], None);
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 1);

        assert_eq!(store.recipes.len(), 1);
        assert!(store.recipes.contains_key("jollof-rice"));
    }

    #[test]
    fn test_colliding_titles_get_distinct_slugs() {
        let mut store = MemoryStore::default();

        let report = import_candidates(
            &mut store,
            vec![ok("Jollof Rice"), ok("Jollof  Rice!"), ok("Jollof Rice?")],
            None,
        );
        assert_eq!(report.created, 3);
        assert!(store.recipes.contains_key("jollof-rice"));
        assert!(store.recipes.contains_key("jollof-rice-2"));
        assert!(store.recipes.contains_key("jollof-rice-3"));
    }

    #[test]
    fn test_suffixed_slug_stays_stable_on_reimport() {
        let mut store = MemoryStore::default();

        import_candidates(&mut store, vec![ok("Jollof Rice"), ok("Jollof  Rice!")], None);
        let again = import_candidates(&mut store, vec![ok("Jollof  Rice!")], None);

        assert_eq!(again.updated, 1);
        assert_eq!(store.recipes.len(), 2);
    }

    #[test]
    fn test_one_bad_record_does_not_abort_batch() {
        let mut store = MemoryStore::default();

        let bad = Candidate {
            identifier: "No Ingredients".to_string(),
            draft: Err(ImportError::Validation(
                "ingredients must be a non-empty list".to_string(),
            )),
        };
        let report =
            import_candidates(&mut store, vec![ok("Egusi Soup"), bad, ok("Suya")], None);

        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].identifier, "No Ingredients");
    }

    #[test]
    fn test_limit_bounds_imports() {
        let mut store = MemoryStore::default();

        let candidates = vec![ok("A1"), ok("A2"), ok("A3"), ok("A4"), ok("A5")];
        let report = import_candidates(&mut store, candidates, Some(3));

        assert_eq!(report.imported(), 3);
        assert_eq!(store.recipes.len(), 3);
    }

    #[test]
    fn test_ethnicity_resolution_is_case_insensitive() {
        let mut store = MemoryStore::default();

        let mut second = draft("Pepper Soup");
        second.ethnicity = "  yoruba ".to_string();

        import_candidates(
            &mut store,
            vec![
                ok("Jollof Rice"),
                Candidate {
                    identifier: "Pepper Soup".to_string(),
                    draft: Ok(second),
                },
            ],
            None,
        );

        assert_eq!(store.ethnicities.len(), 1);
    }

    #[test]
    fn test_order_preserved_through_import() {
        let mut store = MemoryStore::default();

        let mut d = draft("Ofada Stew");
        d.ingredients = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        d.instructions = vec!["second".to_string(), "first".to_string()];
        import_candidates(
            &mut store,
            vec![Candidate {
                identifier: "Ofada Stew".to_string(),
                draft: Ok(d),
            }],
            None,
        );

        let stored = &store.recipes["ofada-stew"];
        assert_eq!(stored.ingredients, vec!["c", "a", "b"]);
        assert_eq!(stored.instructions, vec!["second", "first"]);
    }
}
