use std::sync::Arc;

use async_trait::async_trait;
use service::{
    permission::ADMIN_PRIVILEGE,
    working_hours::{WorkingHours, WorkingHoursService},
    ServiceError,
};

const WORKING_HOURS_SERVICE_PROCESS: &str = "working-hours-service";

pub struct WorkingHoursServiceImpl<WorkingHoursDao, PermissionService, UuidService, TransactionDao>
where
    WorkingHoursDao: dao::working_hours::WorkingHoursDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = WorkingHoursDao::Transaction> + Send + Sync,
{
    pub working_hours_dao: Arc<WorkingHoursDao>,
    pub permission_service: Arc<PermissionService>,
    pub uuid_service: Arc<UuidService>,
    pub transaction_dao: Arc<TransactionDao>,
}

#[async_trait]
impl<WorkingHoursDao, PermissionService, UuidService, TransactionDao> WorkingHoursService
    for WorkingHoursServiceImpl<WorkingHoursDao, PermissionService, UuidService, TransactionDao>
where
    WorkingHoursDao: dao::working_hours::WorkingHoursDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = WorkingHoursDao::Transaction> + Send + Sync,
{
    async fn get_all(&self) -> Result<Arc<[WorkingHours]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let working_hours = self
            .working_hours_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(WorkingHours::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(working_hours)
    }

    async fn upsert(
        &self,
        working_hours: &WorkingHours,
    ) -> Result<WorkingHours, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE)
            .await?;

        // An unavailable day keeps its stored times but never produces
        // slots, so the order check only applies to available windows.
        if working_hours.available && working_hours.start_time >= working_hours.end_time {
            return Err(ServiceError::TimeOrderWrong(
                working_hours.start_time,
                working_hours.end_time,
            ));
        }

        let tx = self.transaction_dao.use_transaction(None).await?;
        let existing = self
            .working_hours_dao
            .find_by_day_of_week(working_hours.day_of_week, tx.clone())
            .await?;

        let stored = WorkingHours {
            id: existing
                .as_ref()
                .map(|entity| entity.id)
                .unwrap_or_else(|| self.uuid_service.new_uuid("working-hours-id")),
            version: self.uuid_service.new_uuid("working-hours-version"),
            ..working_hours.clone()
        };
        self.working_hours_dao
            .upsert(&(&stored).into(), WORKING_HOURS_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookease_utils::DayOfWeek;
    use dao::{working_hours::MockWorkingHoursDao, MockTransaction, MockTransactionDao};
    use service::{
        permission::MockPermissionService, uuid_service::MockUuidService,
        working_hours::WorkingHoursService,
    };
    use time::macros::time;
    use uuid::{uuid, Uuid};

    fn build_service(
        working_hours_dao: MockWorkingHoursDao,
        permission_service: MockPermissionService,
        uuid_service: MockUuidService,
    ) -> WorkingHoursServiceImpl<
        MockWorkingHoursDao,
        MockPermissionService,
        MockUuidService,
        MockTransactionDao,
    > {
        let mut transaction_dao = MockTransactionDao::new();
        transaction_dao
            .expect_use_transaction()
            .returning(|_| Ok(MockTransaction));
        transaction_dao.expect_commit().returning(|_| Ok(()));
        WorkingHoursServiceImpl {
            working_hours_dao: Arc::new(working_hours_dao),
            permission_service: Arc::new(permission_service),
            uuid_service: Arc::new(uuid_service),
            transaction_dao: Arc::new(transaction_dao),
        }
    }

    fn monday_window() -> WorkingHours {
        WorkingHours {
            id: Uuid::nil(),
            day_of_week: DayOfWeek::Monday,
            start_time: time!(09:00),
            end_time: time!(18:00),
            available: true,
            version: Uuid::nil(),
        }
    }

    #[tokio::test]
    async fn test_upsert_requires_admin() {
        let mut permission_service = MockPermissionService::new();
        permission_service
            .expect_check_permission()
            .returning(|_| Err(ServiceError::Forbidden));
        let service = build_service(
            MockWorkingHoursDao::new(),
            permission_service,
            MockUuidService::new(),
        );
        let result = service.upsert(&monday_window()).await;
        if let Err(ServiceError::Forbidden) = result {
            // All good
        } else {
            panic!("Expected forbidden error");
        }
    }

    #[tokio::test]
    async fn test_upsert_rejects_reversed_window() {
        let mut permission_service = MockPermissionService::new();
        permission_service
            .expect_check_permission()
            .returning(|_| Ok(()));
        let service = build_service(
            MockWorkingHoursDao::new(),
            permission_service,
            MockUuidService::new(),
        );
        let mut window = monday_window();
        window.start_time = time!(18:00);
        window.end_time = time!(09:00);
        let result = service.upsert(&window).await;
        if let Err(ServiceError::TimeOrderWrong(_, _)) = result {
            // All good
        } else {
            panic!("Expected time order failure");
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_new_day() {
        let mut permission_service = MockPermissionService::new();
        permission_service
            .expect_check_permission()
            .returning(|_| Ok(()));
        let mut working_hours_dao = MockWorkingHoursDao::new();
        working_hours_dao
            .expect_find_by_day_of_week()
            .returning(|_, _| Ok(None));
        working_hours_dao
            .expect_upsert()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut uuid_service = MockUuidService::new();
        uuid_service
            .expect_new_uuid()
            .returning(|_| uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50"));
        let service = build_service(working_hours_dao, permission_service, uuid_service);
        let stored = service.upsert(&monday_window()).await.unwrap();
        assert_ne!(stored.id, Uuid::nil());
        assert_ne!(stored.version, Uuid::nil());
        assert_eq!(stored.day_of_week, DayOfWeek::Monday);
    }

    #[tokio::test]
    async fn test_upsert_keeps_id_of_existing_day() {
        let existing_id = uuid!("CEA260A0-112B-4970-936C-F7E529955BD0");
        let mut permission_service = MockPermissionService::new();
        permission_service
            .expect_check_permission()
            .returning(|_| Ok(()));
        let mut working_hours_dao = MockWorkingHoursDao::new();
        working_hours_dao
            .expect_find_by_day_of_week()
            .returning(move |_, _| {
                Ok(Some(dao::working_hours::WorkingHoursEntity {
                    id: existing_id,
                    day_of_week: DayOfWeek::Monday,
                    start_time: time!(08:00),
                    end_time: time!(16:00),
                    available: true,
                    version: uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E51"),
                }))
            });
        working_hours_dao
            .expect_upsert()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut uuid_service = MockUuidService::new();
        uuid_service
            .expect_new_uuid()
            .returning(|_| uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E52"));
        let service = build_service(working_hours_dao, permission_service, uuid_service);
        let stored = service.upsert(&monday_window()).await.unwrap();
        assert_eq!(stored.id, existing_id);
    }
}
