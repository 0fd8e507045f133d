use std::sync::Arc;

use async_trait::async_trait;
use service::permission::{PermissionService, UserService};

pub mod appointment;
pub mod availability;
pub mod clock;
pub mod service_offering;
pub mod uuid_service;
pub mod working_hours;

mod test;

pub struct PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::permission::UserService + Send + Sync,
{
    pub permission_dao: Arc<PermissionDao>,
    pub user_service: Arc<UserService>,
}
impl<PermissionDao, UserService> PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::permission::UserService + Send + Sync,
{
    pub fn new(permission_dao: Arc<PermissionDao>, user_service: Arc<UserService>) -> Self {
        Self {
            permission_dao,
            user_service,
        }
    }
}

#[async_trait]
impl<PermissionDao, UserService> PermissionService
    for PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::permission::UserService + Send + Sync,
{
    async fn check_permission(&self, privilege: &str) -> Result<(), service::ServiceError> {
        if self.has_permission(privilege).await? {
            Ok(())
        } else {
            Err(service::ServiceError::Forbidden)
        }
    }

    async fn has_permission(&self, privilege: &str) -> Result<bool, service::ServiceError> {
        let current_user = self.user_service.current_user().await?;
        Ok(self
            .permission_dao
            .has_privilege(current_user.as_ref(), privilege)
            .await?)
    }

    async fn current_user(&self) -> Result<Arc<str>, service::ServiceError> {
        self.user_service.current_user().await
    }
}

/// Development stand-in for the external authentication collaborator.
pub struct UserServiceDev;

#[async_trait]
impl UserService for UserServiceDev {
    async fn current_user(&self) -> Result<Arc<str>, service::ServiceError> {
        Ok("DEVUSER".into())
    }
}
