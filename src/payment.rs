//! Contract with the payment processor's refund API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    Duplicate,
    Fraudulent,
    RequestedByCustomer,
}

impl fmt::Display for RefundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefundReason::Duplicate => "duplicate",
            RefundReason::Fraudulent => "fraudulent",
            RefundReason::RequestedByCustomer => "requested_by_customer",
        })
    }
}

/// Full refund of the charge behind a payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub reason: RefundReason,
    pub payment_intent: String,
}

impl RefundRequest {
    pub fn requested_by_customer(payment_intent: impl Into<String>) -> Self {
        Self {
            reason: RefundReason::RequestedByCustomer,
            payment_intent: payment_intent.into(),
        }
    }
}

/// Confirmation returned by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub payment_intent: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Refund declined: {0}")]
    Declined(String),

    #[error("Payment gateway unavailable: {0}")]
    Gateway(String),
}

/// Refund endpoint of the payment processor.
///
/// Timeouts and retries are the implementation's concern; callers surface
/// any error unchanged.
#[async_trait]
pub trait RefundService: Send + Sync {
    async fn create(&self, request: RefundRequest) -> Result<Refund, PaymentError>;
}
