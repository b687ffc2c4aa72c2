//! Request handlers for the admin area.
//!
//! Each handler works against one request-scoped
//! [`UnitOfWorkSession`](crate::UnitOfWorkSession) and commits at most once.

pub mod category;
pub mod order;

pub use category::{CategoryController, CategoryVm};
pub use order::{OrderController, OrderListStatus, OrderVm};
