use async_trait::async_trait;

use crate::models::{Entity, OrderHeader, OrderStatus, PaymentStatus};
use crate::PersistenceResult;

/// Generic CRUD access to one entity type within a unit-of-work session.
///
/// Writes are pending until the owning session is saved.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Fetch every entity matching `filter` (all of them when `None`),
    /// resolving the relations named in `include`.
    async fn get_all(
        &self,
        filter: Option<&E::Filter>,
        include: &[E::Include],
    ) -> PersistenceResult<Vec<E>>;

    /// Fetch the first entity matching `filter`, if any.
    async fn get_one(
        &self,
        filter: &E::Filter,
        include: &[E::Include],
    ) -> PersistenceResult<Option<E>>;

    /// Store a new entity and return it with its assigned identifier.
    async fn add(&self, entity: &E) -> PersistenceResult<E>;

    async fn update(&self, entity: &E) -> PersistenceResult<()>;

    async fn delete(&self, entity: &E) -> PersistenceResult<()>;
}

/// Order-header repository with its single-field shortcuts.
#[async_trait]
pub trait OrderHeaderRepository: Repository<OrderHeader> {
    /// Set the order status, and the payment status when one is given,
    /// without loading the header first.
    async fn update_status(
        &self,
        id: i32,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> PersistenceResult<()>;

    /// Record the checkout session and payment intent issued by the payment
    /// processor and stamp the payment date.
    async fn update_payment_intent(
        &self,
        id: i32,
        session_id: &str,
        payment_intent_id: &str,
    ) -> PersistenceResult<()>;
}
