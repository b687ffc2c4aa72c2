//! Role checks run before a handler is invoked.
//!
//! Handlers themselves never look at roles; [`AdminPortal`](crate::AdminPortal)
//! asks an [`Authorizer`] first and only then calls into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Employee,
    Individual,
    Company,
}

/// The authenticated caller of an admin operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Admins and employees can see and act on every order.
    pub fn is_staff(&self) -> bool {
        self.has_role(Role::Admin) || self.has_role(Role::Employee)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    ManageCategories,
    ViewOrder,
    ListOrders,
    UpdateOrderDetails,
    ProcessOrder,
    ShipOrder,
    CancelOrder,
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdminAction::ManageCategories => "manage categories",
            AdminAction::ViewOrder => "view order",
            AdminAction::ListOrders => "list orders",
            AdminAction::UpdateOrderDetails => "update order details",
            AdminAction::ProcessOrder => "process order",
            AdminAction::ShipOrder => "ship order",
            AdminAction::CancelOrder => "cancel order",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("User {user_id} may not {action}")]
    Forbidden { user_id: Uuid, action: AdminAction },
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, principal: &Principal, action: AdminAction)
        -> Result<(), AuthorizationError>;
}

/// Default role table: categories are admin-only, order fulfilment is open to
/// staff, and any signed-in user may view and list orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    fn allowed(principal: &Principal, action: AdminAction) -> bool {
        match action {
            AdminAction::ManageCategories => principal.has_role(Role::Admin),
            AdminAction::UpdateOrderDetails
            | AdminAction::ProcessOrder
            | AdminAction::ShipOrder
            | AdminAction::CancelOrder => principal.is_staff(),
            AdminAction::ViewOrder | AdminAction::ListOrders => true,
        }
    }
}

impl Authorizer for RoleAuthorizer {
    fn authorize(
        &self,
        principal: &Principal,
        action: AdminAction,
    ) -> Result<(), AuthorizationError> {
        if Self::allowed(principal, action) {
            Ok(())
        } else {
            tracing::warn!(user_id = %principal.user_id, %action, "authorization denied");
            Err(AuthorizationError::Forbidden {
                user_id: principal.user_id,
                action,
            })
        }
    }
}
