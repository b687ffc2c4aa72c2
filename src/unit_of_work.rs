use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::{Category, OrderDetail};
use crate::postgres::{PgCategoryRepository, PgOrderDetailRepository, PgOrderHeaderRepository};
use crate::repository::{OrderHeaderRepository, Repository};
use crate::{Executor, PersistenceResult, TransactionAware};

/// Unit of Work pattern for request-scoped data access.
///
/// The UnitOfWork is a long-lived factory; each request begins its own
/// session and drops it when done.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession + 'static;

    /// Begin a new session.
    async fn begin(&self) -> PersistenceResult<Self::Session>;
}

/// One request's view of the store.
///
/// Repository writes made through a session stay pending until [`save`]
/// commits them. Dropping a session without saving discards them.
///
/// [`save`]: UnitOfWorkSession::save
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    fn category(&self) -> &dyn Repository<Category>;

    fn order_header(&self) -> &dyn OrderHeaderRepository;

    fn order_detail(&self) -> &dyn Repository<OrderDetail>;

    /// Register a component that needs to be notified of save and rollback.
    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>);

    /// Commit all pending changes and notify registered observers.
    async fn save(&self) -> PersistenceResult<()>;

    /// Discard all pending changes and notify registered observers.
    async fn rollback(&self) -> PersistenceResult<()>;
}

pub(crate) type Observers = Arc<RwLock<Vec<Arc<dyn TransactionAware>>>>;

pub(crate) async fn notify_commit(observers: &Observers) -> PersistenceResult<()> {
    let observers = observers.read().clone();
    for observer in observers.iter() {
        observer.on_commit().await?;
    }
    Ok(())
}

pub(crate) async fn notify_rollback(observers: &Observers) -> PersistenceResult<()> {
    let observers = observers.read().clone();
    for observer in observers.iter() {
        observer.on_rollback().await?;
    }
    Ok(())
}

/// UnitOfWork backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    /// Create a new PostgresUnitOfWork with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Session = PostgresUnitOfWorkSession;

    async fn begin(&self) -> PersistenceResult<Self::Session> {
        Ok(PostgresUnitOfWorkSession::new(Executor::new(self.pool.clone())))
    }
}

/// Session whose repositories share a single PostgreSQL transaction.
pub struct PostgresUnitOfWorkSession {
    executor: Executor,
    categories: PgCategoryRepository,
    order_headers: PgOrderHeaderRepository,
    order_details: PgOrderDetailRepository,
    observers: Observers,
}

impl PostgresUnitOfWorkSession {
    pub fn new(executor: Executor) -> Self {
        Self {
            categories: PgCategoryRepository::new(executor.clone()),
            order_headers: PgOrderHeaderRepository::new(executor.clone()),
            order_details: PgOrderDetailRepository::new(executor.clone()),
            executor,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get the executor for this session (provides access to the transaction).
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresUnitOfWorkSession {
    fn category(&self) -> &dyn Repository<Category> {
        &self.categories
    }

    fn order_header(&self) -> &dyn OrderHeaderRepository {
        &self.order_headers
    }

    fn order_detail(&self) -> &dyn Repository<OrderDetail> {
        &self.order_details
    }

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    async fn save(&self) -> PersistenceResult<()> {
        // No open transaction means nothing was touched since the last save
        if let Some(tx) = self.executor.take_transaction().await {
            tx.commit().await?;
            tracing::debug!("transaction committed");
        }
        notify_commit(&self.observers).await
    }

    async fn rollback(&self) -> PersistenceResult<()> {
        if let Some(tx) = self.executor.take_transaction().await {
            tx.rollback().await?;
            tracing::debug!("transaction rolled back");
        }
        notify_rollback(&self.observers).await
    }
}
