use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApplicationUser, Entity, OrderStatus, PaymentStatus, Product};
use crate::validation::{Validate, ValidationErrors};

/// Header record of a customer order: who ordered, where it ships, and its
/// fulfilment and payment state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: i32,
    pub application_user_id: Uuid,
    /// Resolved only when fetched with [`OrderHeaderInclude::ApplicationUser`].
    pub application_user: Option<ApplicationUser>,
    pub date_of_order: DateTime<Utc>,
    pub date_of_shipping: Option<DateTime<Utc>>,
    pub order_total: Decimal,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub date_of_payment: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl OrderHeader {
    pub fn new(application_user_id: Uuid, order_total: Decimal) -> Self {
        Self {
            application_user_id,
            order_total,
            date_of_order: Utc::now(),
            ..Self::default()
        }
    }

    /// Header carrying only an identifier, as submitted by a status action.
    pub fn with_id(id: i32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl Validate for OrderHeader {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require("phone", &self.phone);
        errors.require("address", &self.address);
        errors.require("city", &self.city);
        errors.require("state", &self.state);
        errors.require("postal_code", &self.postal_code);
        errors.into_result()
    }
}

/// Query object for order headers. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHeaderFilter {
    pub id: Option<i32>,
    pub application_user_id: Option<Uuid>,
    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl OrderHeaderFilter {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_user(application_user_id: Uuid) -> Self {
        Self {
            application_user_id: Some(application_user_id),
            ..Self::default()
        }
    }

    pub fn with_order_status(mut self, status: OrderStatus) -> Self {
        self.order_status = Some(status);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderHeaderInclude {
    ApplicationUser,
}

impl Entity for OrderHeader {
    type Filter = OrderHeaderFilter;
    type Include = OrderHeaderInclude;

    const NAME: &'static str = "OrderHeader";

    fn id(&self) -> i32 {
        self.id
    }

    fn matches(&self, filter: &OrderHeaderFilter) -> bool {
        filter.id.map_or(true, |id| self.id == id)
            && filter
                .application_user_id
                .map_or(true, |user| self.application_user_id == user)
            && filter
                .order_status
                .map_or(true, |status| self.order_status == status)
            && filter
                .payment_status
                .map_or(true, |status| self.payment_status == status)
    }
}

/// A single line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i32,
    pub order_header_id: i32,
    pub product_id: i32,
    /// Resolved only when fetched with [`OrderDetailInclude::Product`].
    pub product: Option<Product>,
    pub count: i32,
    pub price: Decimal,
}

impl OrderDetail {
    pub fn new(order_header_id: i32, product_id: i32, count: i32, price: Decimal) -> Self {
        Self {
            order_header_id,
            product_id,
            count,
            price,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDetailFilter {
    pub order_header_id: Option<i32>,
}

impl OrderDetailFilter {
    pub fn by_order_header(order_header_id: i32) -> Self {
        Self {
            order_header_id: Some(order_header_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDetailInclude {
    Product,
}

impl Entity for OrderDetail {
    type Filter = OrderDetailFilter;
    type Include = OrderDetailInclude;

    const NAME: &'static str = "OrderDetail";

    fn id(&self) -> i32 {
        self.id
    }

    fn matches(&self, filter: &OrderDetailFilter) -> bool {
        filter
            .order_header_id
            .map_or(true, |id| self.order_header_id == id)
    }
}
