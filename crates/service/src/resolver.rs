#![forbid(unsafe_code)]

use crate::ServiceError;
use lt_storage::{CategoryRow, SqliteStore};

/// Bidirectional category lookup over the display-ordered category
/// list. Built once per operation; misses return `None` and leave the
/// fallback choice to the caller.
#[derive(Clone, Debug)]
pub struct CategoryResolver {
    categories: Vec<CategoryRow>,
}

impl CategoryResolver {
    pub fn new(categories: Vec<CategoryRow>) -> Self {
        Self { categories }
    }

    pub fn load(store: &SqliteStore) -> Result<Self, ServiceError> {
        Ok(Self::new(store.list_categories()?))
    }

    /// Import side: human-readable name to identifier.
    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.id.as_str())
    }

    /// Export and display side: identifier to human-readable name.
    pub fn name_for_id(&self, id: &str) -> Option<&str> {
        self.get(id).map(|category| category.name.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&CategoryRow> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// The full list in display order, for the filter UI.
    pub fn categories(&self) -> &[CategoryRow] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryResolver;
    use lt_storage::CategoryRow;

    fn category(id: &str, name: &str, display_order: i64) -> CategoryRow {
        CategoryRow {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            display_order,
            created_at_ms: 0,
        }
    }

    #[test]
    fn resolves_both_directions() {
        let resolver = CategoryResolver::new(vec![
            category("CAT-001", "Health", 1),
            category("CAT-002", "Career", 2),
        ]);
        assert_eq!(resolver.id_for_name("Career"), Some("CAT-002"));
        assert_eq!(resolver.name_for_id("CAT-001"), Some("Health"));
    }

    #[test]
    fn misses_are_none_not_errors() {
        let resolver = CategoryResolver::new(vec![category("CAT-001", "Health", 1)]);
        assert_eq!(resolver.id_for_name("Hobbies"), None);
        assert_eq!(resolver.name_for_id("CAT-404"), None);
    }
}
