use async_trait::async_trait;

use crate::PersistenceResult;

/// Trait for components that need to hear about the outcome of a unit of work.
///
/// Observers registered with a [`UnitOfWorkSession`](crate::UnitOfWorkSession)
/// are called once per successful `save` or `rollback`, in registration order.
/// Typical uses are audit trails and cache invalidation after order changes.
#[async_trait]
pub trait TransactionAware: Send + Sync {
    /// Called after pending changes were committed.
    async fn on_commit(&self) -> PersistenceResult<()>;

    /// Called after pending changes were discarded.
    async fn on_rollback(&self) -> PersistenceResult<()>;
}
