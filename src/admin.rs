use std::sync::Arc;

use crate::authorization::{AdminAction, Authorizer, Principal};
use crate::controllers::{CategoryController, CategoryVm, OrderController, OrderListStatus, OrderVm};
use crate::models::{Category, OrderHeader};
use crate::payment::{Refund, RefundService};
use crate::{AdminResult, UnitOfWorkSession};

/// Entry point for one admin request: checks the caller's roles, then runs
/// the handler.
pub struct AdminPortal {
    authorizer: Arc<dyn Authorizer>,
    categories: CategoryController,
    orders: OrderController,
}

impl AdminPortal {
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        unit_of_work: Arc<dyn UnitOfWorkSession>,
        refunds: Arc<dyn RefundService>,
    ) -> Self {
        Self {
            authorizer,
            categories: CategoryController::new(unit_of_work.clone()),
            orders: OrderController::new(unit_of_work, refunds),
        }
    }

    pub async fn list_categories(&self, principal: &Principal) -> AdminResult<CategoryVm> {
        self.authorizer
            .authorize(principal, AdminAction::ManageCategories)?;
        self.categories.list().await
    }

    pub async fn get_category(&self, principal: &Principal, id: i32) -> AdminResult<CategoryVm> {
        self.authorizer
            .authorize(principal, AdminAction::ManageCategories)?;
        self.categories.get(id).await
    }

    pub async fn create_or_update_category(
        &self,
        principal: &Principal,
        category: Category,
    ) -> AdminResult<Category> {
        self.authorizer
            .authorize(principal, AdminAction::ManageCategories)?;
        self.categories.create_or_update(category).await
    }

    pub async fn delete_category(&self, principal: &Principal, id: i32) -> AdminResult<()> {
        self.authorizer
            .authorize(principal, AdminAction::ManageCategories)?;
        self.categories.delete(id).await
    }

    pub async fn order_details(&self, principal: &Principal, id: i32) -> AdminResult<OrderVm> {
        self.authorizer.authorize(principal, AdminAction::ViewOrder)?;
        self.orders.order_details(id).await
    }

    pub async fn list_orders(
        &self,
        principal: &Principal,
        status: OrderListStatus,
    ) -> AdminResult<Vec<OrderHeader>> {
        self.authorizer.authorize(principal, AdminAction::ListOrders)?;
        self.orders.list_orders(principal, status).await
    }

    pub async fn update_order_details(
        &self,
        principal: &Principal,
        order: &OrderHeader,
    ) -> AdminResult<OrderHeader> {
        self.authorizer
            .authorize(principal, AdminAction::UpdateOrderDetails)?;
        self.orders.update_order_details(order).await
    }

    pub async fn mark_in_process(&self, principal: &Principal, order_id: i32) -> AdminResult<()> {
        self.authorizer
            .authorize(principal, AdminAction::ProcessOrder)?;
        self.orders.mark_in_process(order_id).await
    }

    pub async fn mark_shipped(
        &self,
        principal: &Principal,
        order: &OrderHeader,
    ) -> AdminResult<OrderHeader> {
        self.authorizer.authorize(principal, AdminAction::ShipOrder)?;
        self.orders.mark_shipped(order).await
    }

    pub async fn cancel_order(
        &self,
        principal: &Principal,
        order: &OrderHeader,
    ) -> AdminResult<Option<Refund>> {
        self.authorizer.authorize(principal, AdminAction::CancelOrder)?;
        self.orders.cancel(order).await
    }
}
