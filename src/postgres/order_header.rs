use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};

use super::{ensure_affected, load_users};
use crate::executor::connection;
use crate::models::{
    Entity, OrderHeader, OrderHeaderFilter, OrderHeaderInclude, OrderStatus, PaymentStatus,
};
use crate::repository::{OrderHeaderRepository, Repository};
use crate::{Executor, PersistenceResult};

const SELECT_ORDER_HEADERS: &str = "SELECT id, application_user_id, date_of_order, \
    date_of_shipping, order_total, order_status, payment_status, carrier, tracking_number, \
    date_of_payment, session_id, payment_intent_id, name, phone, address, city, state, \
    postal_code FROM order_headers WHERE TRUE";

/// Transaction-aware order-header repository
pub struct PgOrderHeaderRepository {
    executor: Executor,
}

impl PgOrderHeaderRepository {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    async fn fetch(
        &self,
        filter: Option<&OrderHeaderFilter>,
        include: &[OrderHeaderInclude],
        limit: Option<i64>,
    ) -> PersistenceResult<Vec<OrderHeader>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ORDER_HEADERS);
        if let Some(filter) = filter {
            push_filter(&mut qb, filter);
        }
        qb.push(" ORDER BY id");
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let mut guard = self.executor.acquire().await?;
        let rows = qb.build().fetch_all(connection(&mut guard)?).await?;
        let mut headers = rows.iter().map(from_row).collect::<PersistenceResult<Vec<_>>>()?;

        if include.contains(&OrderHeaderInclude::ApplicationUser) && !headers.is_empty() {
            let ids = headers.iter().map(|h| h.application_user_id).collect();
            let users = load_users(connection(&mut guard)?, ids).await?;
            for header in headers.iter_mut() {
                header.application_user = users.get(&header.application_user_id).cloned();
            }
        }
        Ok(headers)
    }
}

fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &OrderHeaderFilter) {
    if let Some(id) = filter.id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(user_id) = filter.application_user_id {
        qb.push(" AND application_user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.order_status {
        qb.push(" AND order_status = ").push_bind(status.as_str());
    }
    if let Some(status) = filter.payment_status {
        qb.push(" AND payment_status = ").push_bind(status.as_str());
    }
}

fn from_row(row: &PgRow) -> PersistenceResult<OrderHeader> {
    Ok(OrderHeader {
        id: row.try_get("id")?,
        application_user_id: row.try_get("application_user_id")?,
        application_user: None,
        date_of_order: row.try_get("date_of_order")?,
        date_of_shipping: row.try_get("date_of_shipping")?,
        order_total: row.try_get("order_total")?,
        order_status: row.try_get::<String, _>("order_status")?.parse()?,
        payment_status: row.try_get::<String, _>("payment_status")?.parse()?,
        carrier: row.try_get("carrier")?,
        tracking_number: row.try_get("tracking_number")?,
        date_of_payment: row.try_get("date_of_payment")?,
        session_id: row.try_get("session_id")?,
        payment_intent_id: row.try_get("payment_intent_id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        postal_code: row.try_get("postal_code")?,
    })
}

#[async_trait]
impl Repository<OrderHeader> for PgOrderHeaderRepository {
    async fn get_all(
        &self,
        filter: Option<&OrderHeaderFilter>,
        include: &[OrderHeaderInclude],
    ) -> PersistenceResult<Vec<OrderHeader>> {
        self.fetch(filter, include, None).await
    }

    async fn get_one(
        &self,
        filter: &OrderHeaderFilter,
        include: &[OrderHeaderInclude],
    ) -> PersistenceResult<Option<OrderHeader>> {
        let headers = self.fetch(Some(filter), include, Some(1)).await?;
        Ok(headers.into_iter().next())
    }

    async fn add(&self, header: &OrderHeader) -> PersistenceResult<OrderHeader> {
        let mut guard = self.executor.acquire().await?;
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO order_headers (
                application_user_id, date_of_order, date_of_shipping, order_total,
                order_status, payment_status, carrier, tracking_number, date_of_payment,
                session_id, payment_intent_id, name, phone, address, city, state, postal_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(header.application_user_id)
        .bind(header.date_of_order)
        .bind(header.date_of_shipping)
        .bind(header.order_total)
        .bind(header.order_status.as_str())
        .bind(header.payment_status.as_str())
        .bind(&header.carrier)
        .bind(&header.tracking_number)
        .bind(header.date_of_payment)
        .bind(&header.session_id)
        .bind(&header.payment_intent_id)
        .bind(&header.name)
        .bind(&header.phone)
        .bind(&header.address)
        .bind(&header.city)
        .bind(&header.state)
        .bind(&header.postal_code)
        .fetch_one(connection(&mut guard)?)
        .await?;
        tracing::debug!(id, "order header inserted");
        Ok(OrderHeader {
            id,
            ..header.clone()
        })
    }

    async fn update(&self, header: &OrderHeader) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE order_headers SET
                application_user_id = $2, date_of_order = $3, date_of_shipping = $4,
                order_total = $5, order_status = $6, payment_status = $7, carrier = $8,
                tracking_number = $9, date_of_payment = $10, session_id = $11,
                payment_intent_id = $12, name = $13, phone = $14, address = $15, city = $16,
                state = $17, postal_code = $18
            WHERE id = $1
            "#,
        )
        .bind(header.id)
        .bind(header.application_user_id)
        .bind(header.date_of_order)
        .bind(header.date_of_shipping)
        .bind(header.order_total)
        .bind(header.order_status.as_str())
        .bind(header.payment_status.as_str())
        .bind(&header.carrier)
        .bind(&header.tracking_number)
        .bind(header.date_of_payment)
        .bind(&header.session_id)
        .bind(&header.payment_intent_id)
        .bind(&header.name)
        .bind(&header.phone)
        .bind(&header.address)
        .bind(&header.city)
        .bind(&header.state)
        .bind(&header.postal_code)
        .execute(connection(&mut guard)?)
        .await?;
        ensure_affected(result, OrderHeader::NAME, header.id)
    }

    async fn delete(&self, header: &OrderHeader) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query("DELETE FROM order_headers WHERE id = $1")
            .bind(header.id)
            .execute(connection(&mut guard)?)
            .await?;
        ensure_affected(result, OrderHeader::NAME, header.id)
    }
}

#[async_trait]
impl OrderHeaderRepository for PgOrderHeaderRepository {
    async fn update_status(
        &self,
        id: i32,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query(
            "UPDATE order_headers \
             SET order_status = $2, payment_status = COALESCE($3, payment_status) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(order_status.as_str())
        .bind(payment_status.map(|s| s.as_str()))
        .execute(connection(&mut guard)?)
        .await?;
        ensure_affected(result, OrderHeader::NAME, id)
    }

    async fn update_payment_intent(
        &self,
        id: i32,
        session_id: &str,
        payment_intent_id: &str,
    ) -> PersistenceResult<()> {
        let mut guard = self.executor.acquire().await?;
        let result = sqlx::query(
            "UPDATE order_headers \
             SET session_id = $2, payment_intent_id = $3, date_of_payment = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(session_id)
        .bind(payment_intent_id)
        .bind(Utc::now())
        .execute(connection(&mut guard)?)
        .await?;
        ensure_affected(result, OrderHeader::NAME, id)
    }
}
