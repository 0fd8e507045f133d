use std::sync::Arc;

use dao::{service_offering::MockServiceOfferingDao, MockTransaction, MockTransactionDao};
use service::{
    clock::MockClockService,
    permission::MockPermissionService,
    service_offering::{ServiceOffering, ServiceOfferingService},
    uuid_service::MockUuidService,
    ServiceError, ValidationFailureItem,
};
use time::macros::datetime;
use uuid::{uuid, Uuid};

use crate::service_offering::ServiceOfferingServiceImpl;
use crate::test::availability::{default_offering_entity, default_service_id};

pub struct ServiceOfferingServiceDependencies {
    pub service_offering_dao: MockServiceOfferingDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl ServiceOfferingServiceDependencies {
    pub fn build_service(
        self,
    ) -> ServiceOfferingServiceImpl<
        MockServiceOfferingDao,
        MockPermissionService,
        MockClockService,
        MockUuidService,
        MockTransactionDao,
    > {
        let mut transaction_dao = MockTransactionDao::new();
        transaction_dao
            .expect_use_transaction()
            .returning(|_| Ok(MockTransaction));
        transaction_dao.expect_commit().returning(|_| Ok(()));
        ServiceOfferingServiceImpl {
            service_offering_dao: Arc::new(self.service_offering_dao),
            permission_service: Arc::new(self.permission_service),
            clock_service: Arc::new(self.clock_service),
            uuid_service: Arc::new(self.uuid_service),
            transaction_dao: Arc::new(transaction_dao),
        }
    }
}

pub fn build_dependencies(admin: bool) -> ServiceOfferingServiceDependencies {
    let mut permission_service = MockPermissionService::new();
    permission_service.expect_check_permission().returning(
        move |_| {
            if admin {
                Ok(())
            } else {
                Err(ServiceError::Forbidden)
            }
        },
    );
    let mut clock_service = MockClockService::new();
    clock_service
        .expect_date_time_now()
        .returning(|| datetime!(2025-06-01 12:00));
    let mut uuid_service = MockUuidService::new();
    uuid_service
        .expect_new_uuid()
        .returning(|_| uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E58"));
    ServiceOfferingServiceDependencies {
        service_offering_dao: MockServiceOfferingDao::new(),
        permission_service,
        clock_service,
        uuid_service,
    }
}

fn new_offering() -> ServiceOffering {
    ServiceOffering {
        id: Uuid::nil(),
        name: "Haircut".into(),
        description: Some("Wash, cut and style".into()),
        duration_minutes: 30,
        price: 35.0,
        address: None,
        image_url: None,
        created: None,
        deleted: None,
        version: Uuid::nil(),
    }
}

#[tokio::test]
async fn test_get_all_is_public() {
    let mut deps = build_dependencies(false);
    deps.service_offering_dao
        .expect_all()
        .returning(|_| Ok([default_offering_entity()].into()));
    let service = deps.build_service();
    let offerings = service.get_all().await.unwrap();
    assert_eq!(offerings.len(), 1);
    assert_eq!(offerings[0].name.as_ref(), "Haircut");
}

#[tokio::test]
async fn test_get_unknown_offering() {
    let mut deps = build_dependencies(false);
    deps.service_offering_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let result = service.get(default_service_id()).await;
    if let Err(ServiceError::EntityNotFound(id)) = result {
        assert_eq!(id, default_service_id());
    } else {
        panic!("Expected entity not found error");
    }
}

#[tokio::test]
async fn test_create_requires_admin() {
    let service = build_dependencies(false).build_service();
    let result = service.create(&new_offering()).await;
    if let Err(ServiceError::Forbidden) = result {
        // All good
    } else {
        panic!("Expected forbidden error");
    }
}

#[tokio::test]
async fn test_create_rejects_preset_id() {
    let service = build_dependencies(true).build_service();
    let mut offering = new_offering();
    offering.id = default_service_id();
    let result = service.create(&offering).await;
    if let Err(ServiceError::IdSetOnCreate) = result {
        // All good
    } else {
        panic!("Expected id set on create error");
    }
}

#[tokio::test]
async fn test_create_rejects_preset_version() {
    let service = build_dependencies(true).build_service();
    let mut offering = new_offering();
    offering.version = uuid!("F79C462A-8D4E-42E1-8171-DB4DBD019E50");
    let result = service.create(&offering).await;
    if let Err(ServiceError::VersionSetOnCreate) = result {
        // All good
    } else {
        panic!("Expected version set on create error");
    }
}

#[tokio::test]
async fn test_create_validates_fields() {
    let service = build_dependencies(true).build_service();
    let mut offering = new_offering();
    offering.name = "".into();
    offering.duration_minutes = 0;
    offering.price = -1.0;
    let result = service.create(&offering).await;
    if let Err(ServiceError::ValidationError(items)) = result {
        assert_eq!(items.len(), 3);
        assert!(items.contains(&ValidationFailureItem::MissingField("name".into())));
        assert!(items.contains(&ValidationFailureItem::InvalidValue(
            "duration_minutes".into()
        )));
        assert!(items.contains(&ValidationFailureItem::InvalidValue("price".into())));
    } else {
        panic!("Expected validation error");
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_version() {
    let mut deps = build_dependencies(true);
    deps.service_offering_dao
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = deps.build_service();
    let created = service.create(&new_offering()).await.unwrap();
    assert_ne!(created.id, Uuid::nil());
    assert_ne!(created.version, Uuid::nil());
    assert_eq!(created.created, Some(datetime!(2025-06-01 12:00)));
}

#[tokio::test]
async fn test_update_missing_offering() {
    let mut deps = build_dependencies(true);
    deps.service_offering_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = deps.build_service();
    let mut offering = new_offering();
    offering.id = default_service_id();
    let result = service.update(&offering).await;
    if let Err(ServiceError::EntityNotFound(_)) = result {
        // All good
    } else {
        panic!("Expected entity not found error");
    }
}

#[tokio::test]
async fn test_delete_marks_deleted() {
    let mut deps = build_dependencies(true);
    deps.service_offering_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_offering_entity())));
    deps.service_offering_dao
        .expect_update()
        .times(1)
        .returning(|entity, _, _| {
            assert!(entity.deleted.is_some());
            Ok(())
        });
    let service = deps.build_service();
    service.delete(default_service_id()).await.unwrap();
}
