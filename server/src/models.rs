use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ethnicities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ethnicity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ethnicities)]
pub struct NewEthnicity<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// JSONB array of strings, author order
    pub ingredients: Value,
    /// JSONB array of strings, author order
    pub instructions: Value,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
    pub ethnicity_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full field set for inserting a recipe or replacing one in place.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangeset<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub ingredients: Value,
    pub instructions: Value,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
    pub ethnicity_id: Uuid,
    pub category_id: Uuid,
}

/// Read a JSONB string array back into a Vec, dropping anything that
/// isn't a string.
pub fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_list_preserves_order() {
        let value = json!(["c", "a", "b"]);
        assert_eq!(string_list(&value), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_string_list_tolerates_non_arrays() {
        assert!(string_list(&json!("oops")).is_empty());
        assert!(string_list(&json!(null)).is_empty());
    }
}
