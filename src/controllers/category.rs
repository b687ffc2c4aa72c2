use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::models::{Category, CategoryFilter, Entity};
use crate::validation::Validate;
use crate::{AdminError, AdminResult, UnitOfWorkSession};

/// View record returned by the category endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVm {
    pub category: Option<Category>,
    pub categories: Vec<Category>,
}

pub struct CategoryController {
    unit_of_work: Arc<dyn UnitOfWorkSession>,
}

impl CategoryController {
    pub fn new(unit_of_work: Arc<dyn UnitOfWorkSession>) -> Self {
        Self { unit_of_work }
    }

    /// Every category, in the order the repository yields them.
    #[instrument(skip(self))]
    pub async fn list(&self) -> AdminResult<CategoryVm> {
        let categories = self.unit_of_work.category().get_all(None, &[]).await?;
        debug!(count = categories.len(), "categories listed");
        Ok(CategoryVm {
            categories,
            ..CategoryVm::default()
        })
    }

    /// The category with `id`; a missing one leaves `category` empty.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> AdminResult<CategoryVm> {
        let category = self
            .unit_of_work
            .category()
            .get_one(&CategoryFilter::by_id(id), &[])
            .await?;
        Ok(CategoryVm {
            category,
            ..CategoryVm::default()
        })
    }

    /// Adds the category when its id is 0, otherwise updates it, then saves.
    #[instrument(skip(self, category), fields(id = category.id))]
    pub async fn create_or_update(&self, category: Category) -> AdminResult<Category> {
        if let Err(errors) = category.validate() {
            warn!(%errors, "category rejected");
            return Err(errors.into());
        }

        let repository = self.unit_of_work.category();
        let saved = if category.is_new() {
            repository.add(&category).await?
        } else {
            repository.update(&category).await?;
            category
        };
        self.unit_of_work.save().await?;

        info!(id = saved.id, name = %saved.name, "category saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> AdminResult<()> {
        let repository = self.unit_of_work.category();
        let category = match repository.get_one(&CategoryFilter::by_id(id), &[]).await? {
            Some(category) => category,
            None => {
                warn!("category not found");
                return Err(AdminError::not_found(Category::NAME, id));
            }
        };

        repository.delete(&category).await?;
        self.unit_of_work.save().await?;

        info!("category deleted");
        Ok(())
    }
}
