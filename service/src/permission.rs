use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::ServiceError;

pub const ADMIN_PRIVILEGE: &str = "admin";

#[automock]
#[async_trait]
pub trait UserService {
    async fn current_user(&self) -> Result<Arc<str>, ServiceError>;
}

#[automock]
#[async_trait]
pub trait PermissionService {
    /// Fails with `ServiceError::Forbidden` when the current user does not
    /// hold the privilege.
    async fn check_permission(&self, privilege: &str) -> Result<(), ServiceError>;

    /// Non-failing variant for "admins see everything, others see their own
    /// data" style decisions.
    async fn has_permission(&self, privilege: &str) -> Result<bool, ServiceError>;

    async fn current_user(&self) -> Result<Arc<str>, ServiceError>;
}
