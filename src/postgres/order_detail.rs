use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};

use super::{ensure_affected, load_products};
use crate::executor::connection;
use crate::models::{Entity, OrderDetail, OrderDetailFilter, OrderDetailInclude};
use crate::repository::Repository;
use crate::{Executor, PersistenceResult};

const SELECT_ORDER_DETAILS: &str =
    "SELECT id, order_header_id, product_id, count, price FROM order_details WHERE TRUE";

/// Transaction-aware order-detail repository
pub struct PgOrderDetailRepository {
    executor: Executor,
}

impl PgOrderDetailRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    async fn fetch(
        &self,
        filter: Option<&OrderDetailFilter>,
        include: &[OrderDetailInclude],
        limit: Option<i64>,
    ) -> PersistenceResult<Vec<OrderDetail>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ORDER_DETAILS);
        if let Some(order_header_id) = filter.and_then(|f| f.order_header_id) {
            qb.push(" AND order_header_id = ").push_bind(order_header_id);
        }
        qb.push(" ORDER BY id");
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let mut guard = self.executor.acquire().await?;
        let rows = qb.build().fetch_all(connection(&mut guard)?).await?;
        let mut details = rows.iter().map(from_row).collect::<PersistenceResult<Vec<_>>>()?;

        if include.contains(&OrderDetailInclude::Product) && !details.is_empty() {
            let ids = details.iter().map(|d| d.product_id).collect();
            let products = load_products(connection(&mut guard)?, ids).await?;
            for detail in details.iter_mut() {
                detail.product = products.get(&detail.product_id).cloned();
            }
        }
        Ok(details)
    }
}

fn from_row(row: &PgRow) -> PersistenceResult<OrderDetail> {
    Ok(OrderDetail {
        id: row.try_get("id")?,
        order_header_id: row.try_get("order_header_id")?,
        product_id: row.try_get("product_id")?,
        product: None,
        count: row.try_get("count")?,
        price: row.try_get("price")?,
    })
}

#[async_trait]
impl Repository<OrderDetail> for PgOrderDetailRepository {
    async fn get_all(
        &self,
        filter: Option<&OrderDetailFilter>,
        include: &[OrderDetailInclude],
    ) -> PersistenceResult<Vec<OrderDetail>> {
        self.fetch(filter, include, None).await
    }

    async fn get_one(
        &self,
        filter: &OrderDetailFilter,
        include: &[OrderDetailInclude],
    ) -> PersistenceResult<Option<OrderDetail>> {
        let details = self.fetch(Some(filter), include, Some(1)).await?;
        Ok(details.into_iter().next())
    }

    async fn add(&self, detail: &OrderDetail) -> PersistenceResult<OrderDetail> {
        let mut guard = self.executor.acquire().await?;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO order_details (order_header_id, product_id, count, price) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(detail.order_header_id)
        .bind(detail.product_id)
        .bind(detail.count)
        .bind(detail.price)
        .fetch_one(connection(&mut guard)?)
        .await?;
        Ok(OrderDetail {
            id,
            ..detail.clone()
        })
    }

    async fn update(&self, detail: &OrderDetail) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query(
            "UPDATE order_details \
             SET order_header_id = $2, product_id = $3, count = $4, price = $5 \
             WHERE id = $1",
        )
        .bind(detail.id)
        .bind(detail.order_header_id)
        .bind(detail.product_id)
        .bind(detail.count)
        .bind(detail.price)
        .execute(connection(&mut guard)?)
        .await?;
        ensure_affected(result, OrderDetail::NAME, detail.id)
    }

    async fn delete(&self, detail: &OrderDetail) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query("DELETE FROM order_details WHERE id = $1")
            .bind(detail.id)
            .execute(connection(&mut guard)?)
            .await?;
        ensure_affected(result, OrderDetail::NAME, detail.id)
    }
}
