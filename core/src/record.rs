use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Original-source defaults for records that omit the timing fields.
pub const DEFAULT_PREP_TIME: u32 = 30;
pub const DEFAULT_COOK_TIME: u32 = 30;
pub const DEFAULT_SERVINGS: u32 = 4;

/// Loosely-typed recipe object as it appears in an import source.
/// This is the wire shape; [`RecipeDraft`] is what domain logic sees.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeInput {
    pub title: String,
    pub ethnicity: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
}

/// A fully validated recipe record, ready for slug allocation and upsert.
/// Every field has been checked; downstream code never re-validates.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDraft {
    pub title: String,
    pub ethnicity: String,
    pub category: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
}

impl RecipeInput {
    /// Validate into a strict draft, rejecting missing or malformed fields.
    pub fn validate(self) -> Result<RecipeDraft, ImportError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ImportError::Validation("title is empty".to_string()));
        }

        let ethnicity = self.ethnicity.trim().to_string();
        if ethnicity.is_empty() {
            return Err(ImportError::Validation("ethnicity is empty".to_string()));
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(ImportError::Validation("category is empty".to_string()));
        }

        let ingredients: Vec<String> = self
            .ingredients
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if ingredients.is_empty() {
            return Err(ImportError::Validation(
                "ingredients must be a non-empty list".to_string(),
            ));
        }

        let instructions: Vec<String> = self
            .instructions
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if instructions.is_empty() {
            return Err(ImportError::Validation(
                "instructions must be a non-empty list".to_string(),
            ));
        }

        let prep_time_minutes = self.prep_time_minutes.unwrap_or(DEFAULT_PREP_TIME).max(1);
        let cook_time_minutes = self.cook_time_minutes.unwrap_or(DEFAULT_COOK_TIME).max(1);
        let servings = self.servings.unwrap_or(DEFAULT_SERVINGS).max(1);

        Ok(RecipeDraft {
            title,
            ethnicity,
            category,
            description: self.description.trim().to_string(),
            ingredients,
            instructions,
            prep_time_minutes,
            cook_time_minutes,
            servings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecipeInput {
        RecipeInput {
            title: "Jollof Rice".to_string(),
            ethnicity: "Yoruba".to_string(),
            category: "Main".to_string(),
            description: String::new(),
            ingredients: vec!["rice".to_string(), "tomato".to_string()],
            instructions: vec!["cook".to_string()],
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
        }
    }

    #[test]
    fn test_valid_record_gets_defaults() {
        let draft = sample().validate().unwrap();
        assert_eq!(draft.title, "Jollof Rice");
        assert_eq!(draft.prep_time_minutes, DEFAULT_PREP_TIME);
        assert_eq!(draft.cook_time_minutes, DEFAULT_COOK_TIME);
        assert_eq!(draft.servings, DEFAULT_SERVINGS);
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut input = sample();
        input.title = "   ".to_string();
        assert!(matches!(
            input.validate(),
            Err(ImportError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let mut input = sample();
        input.ingredients = vec!["  ".to_string()];
        assert!(matches!(
            input.validate(),
            Err(ImportError::Validation(_))
        ));
    }

    #[test]
    fn test_ingredient_order_preserved() {
        let mut input = sample();
        input.ingredients = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        let draft = input.validate().unwrap();
        assert_eq!(draft.ingredients, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_zero_times_clamped_to_one() {
        let mut input = sample();
        input.prep_time_minutes = Some(0);
        input.servings = Some(0);
        let draft = input.validate().unwrap();
        assert_eq!(draft.prep_time_minutes, 1);
        assert_eq!(draft.servings, 1);
    }
}
