//! The seam between the import pipeline and persistence.
//!
//! The server crate implements [`CatalogStore`] over diesel; tests run the
//! same pipeline against an in-memory store.

use thiserror::Error;
use uuid::Uuid;

use crate::record::RecipeDraft;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("integrity violation: {0}")]
    Integrity(String),
}

/// Handle to a resolved Ethnicity or Category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub id: Uuid,
}

/// Whether an upsert inserted a new recipe or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Persistence operations the import pipeline needs.
///
/// `resolve_*` match by trimmed, case-insensitive name and create the row
/// (name as given, slugified slug) when no match exists. `upsert_recipe`
/// runs in a single transaction per record.
pub trait CatalogStore {
    fn resolve_ethnicity(&mut self, name: &str) -> Result<EntityRef, StoreError>;

    fn resolve_category(&mut self, name: &str) -> Result<EntityRef, StoreError>;

    /// Title of the recipe currently holding `slug`, if any. Used for
    /// slug allocation: same title means update-in-place, different title
    /// means the slug is taken and a suffix is needed.
    fn recipe_title_for_slug(&mut self, slug: &str) -> Result<Option<String>, StoreError>;

    fn upsert_recipe(
        &mut self,
        slug: &str,
        draft: &RecipeDraft,
        ethnicity: EntityRef,
        category: EntityRef,
    ) -> Result<UpsertOutcome, StoreError>;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use super::*;
    use crate::slug::slugify;

    /// In-memory store for exercising the batch engine in tests.
    #[derive(Default)]
    pub struct MemoryStore {
        pub ethnicities: HashMap<String, (Uuid, String)>, // slug -> (id, name)
        pub categories: HashMap<String, (Uuid, String)>,
        pub recipes: HashMap<String, RecipeDraft>, // slug -> last written draft
    }

    impl MemoryStore {
        fn resolve(
            table: &mut HashMap<String, (Uuid, String)>,
            name: &str,
        ) -> Result<EntityRef, StoreError> {
            let trimmed = name.trim();
            for (id, existing) in table.values() {
                if existing.eq_ignore_ascii_case(trimmed) {
                    return Ok(EntityRef { id: *id });
                }
            }
            let id = Uuid::new_v4();
            table.insert(slugify(trimmed), (id, trimmed.to_string()));
            Ok(EntityRef { id })
        }
    }

    impl CatalogStore for MemoryStore {
        fn resolve_ethnicity(&mut self, name: &str) -> Result<EntityRef, StoreError> {
            Self::resolve(&mut self.ethnicities, name)
        }

        fn resolve_category(&mut self, name: &str) -> Result<EntityRef, StoreError> {
            Self::resolve(&mut self.categories, name)
        }

        fn recipe_title_for_slug(&mut self, slug: &str) -> Result<Option<String>, StoreError> {
            Ok(self.recipes.get(slug).map(|r| r.title.clone()))
        }

        fn upsert_recipe(
            &mut self,
            slug: &str,
            draft: &RecipeDraft,
            _ethnicity: EntityRef,
            _category: EntityRef,
        ) -> Result<UpsertOutcome, StoreError> {
            let outcome = if self.recipes.contains_key(slug) {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            };
            self.recipes.insert(slug.to_string(), draft.clone());
            Ok(outcome)
        }
    }
}
