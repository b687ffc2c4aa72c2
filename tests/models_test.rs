mod common;

use rust_decimal_macros::dec;

use storefront_admin::models::{Category, OrderDetail, OrderHeader, OrderStatus, PaymentStatus};
use storefront_admin::validation::{Validate, ValidationErrors};
use storefront_admin::PersistenceError;

use common::{customer, order_header};

#[test]
fn test_statuses_use_stored_names() {
    assert_eq!(OrderStatus::InProcess.as_str(), "Processing");
    assert_eq!(OrderStatus::Shipped.to_string(), "Shipped");
    assert_eq!(
        PaymentStatus::ApprovedForDelayedPayment.as_str(),
        "ApprovedForDelayedPayment"
    );

    assert_eq!("Processing".parse::<OrderStatus>(), Ok(OrderStatus::InProcess));
    assert_eq!("Refunded".parse::<PaymentStatus>(), Ok(PaymentStatus::Refunded));
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
}

#[test]
fn test_unknown_status_is_a_decode_error() {
    let err = "InProcess"
        .parse::<OrderStatus>()
        .expect_err("Enum name is not the stored name");
    assert_eq!(err.value, "InProcess");

    let err: PersistenceError = "Paid"
        .parse::<PaymentStatus>()
        .expect_err("Unknown payment status")
        .into();
    assert!(matches!(err, PersistenceError::Decode(ref message) if message.contains("Paid")));
}

#[test]
fn test_terminal_statuses() {
    assert!(OrderStatus::Shipped.is_terminal());
    assert!(OrderStatus::Cancelled.is_terminal());
    assert!(!OrderStatus::Pending.is_terminal());
    assert!(!OrderStatus::InProcess.is_terminal());
}

#[test]
fn test_category_requires_name() {
    assert!(Category::new(0, "Books").validate().is_ok());
    assert!(Category::new(0, "Books").is_new());
    assert!(!Category::new(4, "Books").is_new());

    let errors = Category::new(0, "").validate().expect_err("Blank name");
    assert_eq!(errors.to_string(), "model is invalid: name required");
}

#[test]
fn test_order_header_requires_shipping_contact() {
    let user = customer();
    assert!(order_header(1, user.id).validate().is_ok());

    let errors = OrderHeader::with_id(1)
        .validate()
        .expect_err("Empty header is invalid");
    for field in ["name", "phone", "address", "city", "state", "postal_code"] {
        assert!(errors.has_field(field), "{} should be required", field);
    }
    assert_eq!(errors.errors().len(), 6);
}

#[test]
fn test_validation_errors_behave_as_std_errors() {
    let mut errors = ValidationErrors::new();
    assert_eq!(errors.to_string(), "model is invalid");
    errors.require("name", " ");
    errors.add("phone", "too short");

    let boxed: Box<dyn std::error::Error> = Box::new(errors);
    assert_eq!(boxed.to_string(), "model is invalid: name required, phone too short");
    assert!(boxed.source().is_none());
}

#[test]
fn test_line_prices_add_up_exactly() {
    let lines = [
        OrderDetail::new(1, 1, 1, dec!(0.10)),
        OrderDetail::new(1, 2, 1, dec!(0.20)),
    ];
    let total: rust_decimal::Decimal = lines.iter().map(|l| l.price).sum();
    assert_eq!(total, dec!(0.30));

    let header = OrderHeader::new(uuid::Uuid::new_v4(), total);
    assert_eq!(header.order_total.to_string(), "0.30");
}
