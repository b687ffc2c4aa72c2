use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::authorization::Principal;
use crate::models::{
    Entity, OrderDetail, OrderDetailFilter, OrderDetailInclude, OrderHeader, OrderHeaderFilter,
    OrderHeaderInclude, OrderStatus, PaymentStatus,
};
use crate::payment::{Refund, RefundRequest, RefundService};
use crate::validation::Validate;
use crate::{AdminError, AdminResult, UnitOfWorkSession};

/// View record with an order header and its lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderVm {
    pub order_header: Option<OrderHeader>,
    pub order_details: Vec<OrderDetail>,
}

/// Status tab of the order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderListStatus {
    #[default]
    All,
    /// Awaiting a delayed payment.
    Pending,
    InProcess,
    Completed,
    Approved,
}

impl FromStr for OrderListStatus {
    type Err = Infallible;

    /// Unrecognised names select every order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "pending" => OrderListStatus::Pending,
            "inprocess" => OrderListStatus::InProcess,
            "completed" => OrderListStatus::Completed,
            "approved" => OrderListStatus::Approved,
            _ => OrderListStatus::All,
        })
    }
}

impl OrderListStatus {
    fn narrow(self, filter: OrderHeaderFilter) -> OrderHeaderFilter {
        match self {
            OrderListStatus::All => filter,
            OrderListStatus::Pending => {
                filter.with_payment_status(PaymentStatus::ApprovedForDelayedPayment)
            }
            OrderListStatus::InProcess => filter.with_order_status(OrderStatus::InProcess),
            OrderListStatus::Completed => filter.with_order_status(OrderStatus::Shipped),
            OrderListStatus::Approved => filter.with_order_status(OrderStatus::Approved),
        }
    }
}

pub struct OrderController {
    unit_of_work: Arc<dyn UnitOfWorkSession>,
    refunds: Arc<dyn RefundService>,
}

impl OrderController {
    pub fn new(unit_of_work: Arc<dyn UnitOfWorkSession>, refunds: Arc<dyn RefundService>) -> Self {
        Self {
            unit_of_work,
            refunds,
        }
    }

    async fn current_header(&self, id: i32) -> AdminResult<OrderHeader> {
        match self
            .unit_of_work
            .order_header()
            .get_one(&OrderHeaderFilter::by_id(id), &[])
            .await?
        {
            Some(header) => Ok(header),
            None => {
                warn!(order_id = id, "order not found");
                Err(AdminError::not_found(OrderHeader::NAME, id))
            }
        }
    }

    /// Header with its customer plus every line with its product. A missing
    /// header is reported as `None`, not as an error.
    #[instrument(skip(self))]
    pub async fn order_details(&self, id: i32) -> AdminResult<OrderVm> {
        let order_header = self
            .unit_of_work
            .order_header()
            .get_one(
                &OrderHeaderFilter::by_id(id),
                &[OrderHeaderInclude::ApplicationUser],
            )
            .await?;
        let order_details = self
            .unit_of_work
            .order_detail()
            .get_all(
                Some(&OrderDetailFilter::by_order_header(id)),
                &[OrderDetailInclude::Product],
            )
            .await?;

        Ok(OrderVm {
            order_header,
            order_details,
        })
    }

    /// Orders visible to `principal`: staff see all of them, customers only
    /// their own.
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn list_orders(
        &self,
        principal: &Principal,
        status: OrderListStatus,
    ) -> AdminResult<Vec<OrderHeader>> {
        let filter = if principal.is_staff() {
            OrderHeaderFilter::default()
        } else {
            OrderHeaderFilter::by_user(principal.user_id)
        };
        let orders = self
            .unit_of_work
            .order_header()
            .get_all(
                Some(&status.narrow(filter)),
                &[OrderHeaderInclude::ApplicationUser],
            )
            .await?;
        Ok(orders)
    }

    /// Copies the shipping address, and carrier and tracking number when
    /// given, onto the stored header.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn update_order_details(&self, order: &OrderHeader) -> AdminResult<OrderHeader> {
        if let Err(errors) = order.validate() {
            warn!(%errors, "order details rejected");
            return Err(errors.into());
        }

        let mut header = self.current_header(order.id).await?;
        header.name = order.name.clone();
        header.phone = order.phone.clone();
        header.address = order.address.clone();
        header.city = order.city.clone();
        header.state = order.state.clone();
        header.postal_code = order.postal_code.clone();
        if order.carrier.is_some() {
            header.carrier = order.carrier.clone();
        }
        if order.tracking_number.is_some() {
            header.tracking_number = order.tracking_number.clone();
        }

        self.unit_of_work.order_header().update(&header).await?;
        self.unit_of_work.save().await?;

        info!("order details updated");
        Ok(header)
    }

    #[instrument(skip(self))]
    pub async fn mark_in_process(&self, order_id: i32) -> AdminResult<()> {
        self.unit_of_work
            .order_header()
            .update_status(order_id, OrderStatus::InProcess, None)
            .await?;
        self.unit_of_work.save().await?;

        info!("order in process");
        Ok(())
    }

    /// Reloads the header, takes only carrier and tracking number from
    /// `order`, and stamps the shipping date.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn mark_shipped(&self, order: &OrderHeader) -> AdminResult<OrderHeader> {
        let mut header = self.current_header(order.id).await?;
        header.carrier = order.carrier.clone();
        header.tracking_number = order.tracking_number.clone();
        header.order_status = OrderStatus::Shipped;
        header.date_of_shipping = Some(Utc::now());

        self.unit_of_work.order_header().update(&header).await?;
        self.unit_of_work.save().await?;

        info!(carrier = ?header.carrier, "order shipped");
        Ok(header)
    }

    /// Cancels the order, refunding it first when the payment was approved.
    ///
    /// A failed refund aborts the request before the status changes. A failed
    /// save after a successful refund does not undo the refund.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn cancel(&self, order: &OrderHeader) -> AdminResult<Option<Refund>> {
        let header = self.current_header(order.id).await?;

        let refund = if header.payment_status == PaymentStatus::Approved {
            let payment_intent = header
                .payment_intent_id
                .clone()
                .ok_or(AdminError::PaymentReferenceMissing {
                    order_id: header.id,
                })?;
            let refund = self
                .refunds
                .create(RefundRequest::requested_by_customer(payment_intent))
                .await?;
            info!(refund_id = %refund.id, "payment refunded");

            self.unit_of_work
                .order_header()
                .update_status(
                    header.id,
                    OrderStatus::Cancelled,
                    Some(PaymentStatus::Refunded),
                )
                .await?;
            Some(refund)
        } else {
            self.unit_of_work
                .order_header()
                .update_status(
                    header.id,
                    OrderStatus::Cancelled,
                    Some(PaymentStatus::Cancelled),
                )
                .await?;
            None
        };
        self.unit_of_work.save().await?;

        info!(refunded = refund.is_some(), "order cancelled");
        Ok(refund)
    }
}
