use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use storefront_admin::authorization::{Principal, Role};
use storefront_admin::models::{
    ApplicationUser, Category, OrderDetail, OrderHeader, OrderStatus, PaymentStatus, Product,
};

pub fn category(id: i32, name: &str) -> Category {
    Category::new(id, name)
}

pub fn customer() -> ApplicationUser {
    ApplicationUser {
        id: Uuid::new_v4(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone_number: Some("555-0100".to_string()),
    }
}

pub fn product(id: i32, name: &str, price: Decimal) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        price,
        category_id: 1,
    }
}

/// A pending, unpaid order with a complete shipping address.
pub fn order_header(id: i32, application_user_id: Uuid) -> OrderHeader {
    OrderHeader {
        id,
        application_user_id,
        application_user: None,
        date_of_order: Utc::now(),
        date_of_shipping: None,
        order_total: dec!(120.00),
        order_status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        carrier: None,
        tracking_number: None,
        date_of_payment: None,
        session_id: None,
        payment_intent_id: None,
        name: "John Doe".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main Street".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
    }
}

/// An order whose payment went through.
pub fn approved_order(id: i32, application_user_id: Uuid, payment_intent: &str) -> OrderHeader {
    OrderHeader {
        order_status: OrderStatus::Approved,
        payment_status: PaymentStatus::Approved,
        session_id: Some("cs_test_session".to_string()),
        payment_intent_id: Some(payment_intent.to_string()),
        date_of_payment: Some(Utc::now()),
        ..order_header(id, application_user_id)
    }
}

pub fn order_detail(id: i32, order_header_id: i32, product_id: i32, count: i32) -> OrderDetail {
    OrderDetail {
        id,
        count,
        ..OrderDetail::new(order_header_id, product_id, count, Decimal::from(10 * count))
    }
}

pub fn admin() -> Principal {
    Principal::new(Uuid::new_v4(), [Role::Admin])
}

pub fn employee() -> Principal {
    Principal::new(Uuid::new_v4(), [Role::Employee])
}

pub fn shopper(user_id: Uuid) -> Principal {
    Principal::new(user_id, [Role::Individual])
}
