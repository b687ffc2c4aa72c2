//! Persisted entities, their typed filters and the relations they can eager-load.

pub mod category;
pub mod order;
pub mod product;
pub mod status;
pub mod user;

pub use category::{Category, CategoryFilter};
pub use order::{
    OrderDetail, OrderDetailFilter, OrderDetailInclude, OrderHeader, OrderHeaderFilter,
    OrderHeaderInclude,
};
pub use product::Product;
pub use status::{OrderStatus, PaymentStatus, UnknownStatus};
pub use user::ApplicationUser;

/// Marker for entities that have no eager-loadable relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRelations {}

/// An entity managed by a [`Repository`](crate::repository::Repository).
///
/// `Filter` replaces an arbitrary predicate with a typed query object and
/// `Include` names the relations a fetch may resolve.
pub trait Entity: Clone + Send + Sync + 'static {
    type Filter: Send + Sync;
    type Include: Copy + PartialEq + Send + Sync;

    /// Name used in log lines and error messages.
    const NAME: &'static str;

    fn id(&self) -> i32;

    fn matches(&self, filter: &Self::Filter) -> bool;
}
