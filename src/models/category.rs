use serde::Serialize;

use crate::error::TaskGenieError;

pub const DEFAULT_CATEGORIES: [&str; 5] = ["Work", "Personal", "Study", "Health", "Finance"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fixed set of categories for one session, kept in configured order.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build a registry from names. Names are trimmed; empty names and
    /// case-insensitive duplicates are rejected.
    pub fn new<I, S>(names: I) -> Result<Self, TaskGenieError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: Vec<Category> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(TaskGenieError::config("Category names cannot be empty"));
            }
            if categories.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
                return Err(TaskGenieError::config(format!(
                    "Duplicate category: {name}"
                )));
            }
            categories.push(Category::new(name));
        }
        if categories.is_empty() {
            return Err(TaskGenieError::config("At least one category is required"));
        }
        Ok(Self { categories })
    }

    /// Look up a category by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Canonical registered name for `name`, or a validation error.
    pub fn resolve(&self, name: &str) -> Result<&str, TaskGenieError> {
        self.get(name)
            .map(|c| c.name.as_str())
            .ok_or_else(|| TaskGenieError::unknown_category(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn first(&self) -> &Category {
        &self.categories[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|n| Category::new(*n)).collect(),
        }
    }
}
