use serde::{Deserialize, Serialize};

use super::{Entity, NoRelations};
use crate::validation::{Validate, ValidationErrors};

/// A product category. An `id` of 0 marks a category that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

impl Category {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

impl Validate for Category {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub id: Option<i32>,
}

impl CategoryFilter {
    pub fn by_id(id: i32) -> Self {
        Self { id: Some(id) }
    }
}

impl Entity for Category {
    type Filter = CategoryFilter;
    type Include = NoRelations;

    const NAME: &'static str = "Category";

    fn id(&self) -> i32 {
        self.id
    }

    fn matches(&self, filter: &CategoryFilter) -> bool {
        filter.id.map_or(true, |id| self.id == id)
    }
}
