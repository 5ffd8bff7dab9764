//! Diesel-backed [`CatalogStore`] used by the import CLI.

use calabash_core::slug::slugify;
use calabash_core::{CatalogStore, EntityRef, RecipeDraft, StoreError, UpsertOutcome};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::MigrationHarness;
use serde_json::Value;
use uuid::Uuid;

use crate::models::{NewCategory, NewEthnicity, RecipeChangeset};
use crate::schema::{categories, ethnicities, recipes};

pub struct PgCatalogStore {
    conn: PgConnection,
}

impl PgCatalogStore {
    /// Open a single connection and bring the schema up to date.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let mut conn = PgConnection::establish(database_url)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        conn.run_pending_migrations(crate::db::MIGRATIONS)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn map_error(e: DieselError) -> StoreError {
    match e {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
            info,
        ) => StoreError::Integrity(info.message().to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

/// Escape LIKE wildcards so an ILIKE against the literal name is a
/// case-insensitive equality match.
pub(crate) fn escape_like(name: &str) -> String {
    name.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl CatalogStore for PgCatalogStore {
    fn resolve_ethnicity(&mut self, name: &str) -> Result<EntityRef, StoreError> {
        let trimmed = name.trim();
        let existing: Option<Uuid> = ethnicities::table
            .filter(ethnicities::name.ilike(escape_like(trimmed)))
            .select(ethnicities::id)
            .first(&mut self.conn)
            .optional()
            .map_err(map_error)?;

        if let Some(id) = existing {
            return Ok(EntityRef { id });
        }

        let slug = slugify(trimmed);
        let id = diesel::insert_into(ethnicities::table)
            .values(NewEthnicity {
                name: trimmed,
                slug: &slug,
                description: "",
            })
            .returning(ethnicities::id)
            .get_result(&mut self.conn)
            .map_err(map_error)?;

        tracing::info!(name = trimmed, %slug, "created ethnicity");
        Ok(EntityRef { id })
    }

    fn resolve_category(&mut self, name: &str) -> Result<EntityRef, StoreError> {
        let trimmed = name.trim();
        let existing: Option<Uuid> = categories::table
            .filter(categories::name.ilike(escape_like(trimmed)))
            .select(categories::id)
            .first(&mut self.conn)
            .optional()
            .map_err(map_error)?;

        if let Some(id) = existing {
            return Ok(EntityRef { id });
        }

        let slug = slugify(trimmed);
        let id = diesel::insert_into(categories::table)
            .values(NewCategory {
                name: trimmed,
                slug: &slug,
                description: "",
            })
            .returning(categories::id)
            .get_result(&mut self.conn)
            .map_err(map_error)?;

        tracing::info!(name = trimmed, %slug, "created category");
        Ok(EntityRef { id })
    }

    fn recipe_title_for_slug(&mut self, slug: &str) -> Result<Option<String>, StoreError> {
        recipes::table
            .filter(recipes::slug.eq(slug))
            .select(recipes::title)
            .first(&mut self.conn)
            .optional()
            .map_err(map_error)
    }

    fn upsert_recipe(
        &mut self,
        slug: &str,
        draft: &RecipeDraft,
        ethnicity: EntityRef,
        category: EntityRef,
    ) -> Result<UpsertOutcome, StoreError> {
        let changes = RecipeChangeset {
            title: &draft.title,
            slug,
            description: &draft.description,
            ingredients: Value::from(draft.ingredients.clone()),
            instructions: Value::from(draft.instructions.clone()),
            prep_time_minutes: draft.prep_time_minutes as i32,
            cook_time_minutes: draft.cook_time_minutes as i32,
            servings: draft.servings as i32,
            ethnicity_id: ethnicity.id,
            category_id: category.id,
        };

        self.conn
            .transaction(|conn| {
                let existing: Option<Uuid> = recipes::table
                    .filter(recipes::slug.eq(slug))
                    .select(recipes::id)
                    .first(conn)
                    .optional()?;

                match existing {
                    Some(id) => {
                        diesel::update(recipes::table.find(id))
                            .set((changes, recipes::updated_at.eq(diesel::dsl::now)))
                            .execute(conn)?;
                        Ok(UpsertOutcome::Updated)
                    }
                    None => {
                        diesel::insert_into(recipes::table)
                            .values(changes)
                            .execute(conn)?;
                        Ok(UpsertOutcome::Created)
                    }
                }
            })
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("Yoruba"), "Yoruba");
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
    }

    #[test]
    fn test_foreign_key_violation_maps_to_integrity() {
        // Deleting a referenced ethnicity trips ON DELETE RESTRICT; the
        // violation must surface as an integrity error, not a plain
        // database error.
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("recipes still reference this ethnicity".to_string()),
        );
        assert!(matches!(
            map_error(err),
            StoreError::Integrity(msg) if msg.contains("reference")
        ));
    }

    #[test]
    fn test_unique_violation_maps_to_integrity() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        assert!(matches!(map_error(err), StoreError::Integrity(_)));
    }

    #[test]
    fn test_other_errors_map_to_database() {
        assert!(matches!(
            map_error(DieselError::NotFound),
            StoreError::Database(_)
        ));
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            Box::new("could not serialize access".to_string()),
        );
        assert!(matches!(map_error(err), StoreError::Database(_)));
    }
}
