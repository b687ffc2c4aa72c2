use crate::authorization::AuthorizationError;
use crate::models::UnknownStatus;
use crate::payment::PaymentError;
use crate::validation::ValidationErrors;

/// Error type for repository and unit-of-work operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} {id} does not exist")]
    EntityMissing { entity: &'static str, id: String },

    #[error("Could not decode stored value: {0}")]
    Decode(String),

    #[error("Transaction is no longer available")]
    TransactionClosed,
}

impl From<UnknownStatus> for PersistenceError {
    fn from(err: UnknownStatus) -> Self {
        PersistenceError::Decode(err.to_string())
    }
}

/// Result type for repository and unit-of-work operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Error returned by the category and order handlers.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    InvalidInput(ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Order {order_id} is approved but has no payment intent to refund")]
    PaymentReferenceMissing { order_id: i32 },

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Payment gateway failure: {0}")]
    Payment(#[from] PaymentError),
}

impl AdminError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AdminError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True when a collaborator (database or payment gateway) failed.
    pub fn is_downstream(&self) -> bool {
        matches!(self, AdminError::Persistence(_) | AdminError::Payment(_))
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::InvalidInput(errors)
    }
}

/// Result type for handler operations.
pub type AdminResult<T> = Result<T, AdminError>;
