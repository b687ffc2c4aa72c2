use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};

use super::ensure_affected;
use crate::executor::connection;
use crate::models::{Category, CategoryFilter, Entity, NoRelations};
use crate::repository::Repository;
use crate::{Executor, PersistenceResult};

const SELECT_CATEGORIES: &str = "SELECT id, name FROM categories WHERE TRUE";

/// Transaction-aware category repository
pub struct PgCategoryRepository {
    executor: Executor,
}

impl PgCategoryRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

fn select(filter: Option<&CategoryFilter>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_CATEGORIES);
    if let Some(id) = filter.and_then(|f| f.id) {
        qb.push(" AND id = ").push_bind(id);
    }
    qb.push(" ORDER BY id");
    qb
}

fn from_row(row: &PgRow) -> PersistenceResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl Repository<Category> for PgCategoryRepository {
    async fn get_all(
        &self,
        filter: Option<&CategoryFilter>,
        _include: &[NoRelations],
    ) -> PersistenceResult<Vec<Category>> {
        let mut qb = select(filter);
        let mut guard = self.executor.acquire().await?;
        let rows = qb.build().fetch_all(connection(&mut guard)?).await?;
        rows.iter().map(from_row).collect()
    }

    async fn get_one(
        &self,
        filter: &CategoryFilter,
        _include: &[NoRelations],
    ) -> PersistenceResult<Option<Category>> {
        let mut qb = select(Some(filter));
        qb.push(" LIMIT 1");
        let mut guard = self.executor.acquire().await?;
        let row = qb.build().fetch_optional(connection(&mut guard)?).await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn add(&self, category: &Category) -> PersistenceResult<Category> {
        let mut guard = self.executor.acquire().await?;
        let id: i32 = sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(&category.name)
            .fetch_one(connection(&mut guard)?)
            .await?;
        tracing::debug!(id, "category inserted");
        Ok(Category {
            id,
            ..category.clone()
        })
    }

    async fn update(&self, category: &Category) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query("UPDATE categories SET name = $2 WHERE id = $1")
            .bind(category.id)
            .bind(&category.name)
            .execute(connection(&mut guard)?)
            .await?;
        ensure_affected(result, Category::NAME, category.id)
    }

    async fn delete(&self, category: &Category) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category.id)
            .execute(connection(&mut guard)?)
            .await?;
        ensure_affected(result, Category::NAME, category.id)
    }
}
