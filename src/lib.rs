//! Storefront admin backend
//!
//! Category management and order fulfilment handlers on top of a
//! repository / unit-of-work data-access layer, with refunds delegated to the
//! payment processor. PostgreSQL and in-memory units of work are provided.

pub mod admin;
pub mod authorization;
pub mod config;
pub mod controllers;
pub mod error;
pub mod executor;
pub mod in_memory;
pub mod models;
pub mod payment;
pub mod postgres;
pub mod repository;
pub mod transaction_aware;
pub mod unit_of_work;
pub mod validation;

pub use admin::AdminPortal;
pub use error::{AdminError, AdminResult, PersistenceError, PersistenceResult};
pub use executor::Executor;
pub use in_memory::{InMemoryUnitOfWork, InMemoryUnitOfWorkSession};
pub use repository::{OrderHeaderRepository, Repository};
pub use transaction_aware::TransactionAware;
pub use unit_of_work::{
    PostgresUnitOfWork, PostgresUnitOfWorkSession, UnitOfWork, UnitOfWorkSession,
};
