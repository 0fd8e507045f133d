#[cfg(test)]
mod integration_test;

use std::sync::Arc;

use dao_impl_sqlite::{
    appointment::AppointmentDaoImpl, service_offering::ServiceOfferingDaoImpl,
    working_hours::WorkingHoursDaoImpl, PermissionDaoImpl, TransactionDaoImpl,
};
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type TransactionDao = TransactionDaoImpl;
type PermissionDao = PermissionDaoImpl;
type ServiceOfferingDao = ServiceOfferingDaoImpl;
type WorkingHoursDao = WorkingHoursDaoImpl;
type AppointmentDao = AppointmentDaoImpl;

type UserService = service_impl::UserServiceDev;
type PermissionService = service_impl::PermissionServiceImpl<PermissionDao, UserService>;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type ServiceOfferingService = service_impl::service_offering::ServiceOfferingServiceImpl<
    ServiceOfferingDao,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
>;
type WorkingHoursService = service_impl::working_hours::WorkingHoursServiceImpl<
    WorkingHoursDao,
    PermissionService,
    UuidService,
    TransactionDao,
>;
type AvailabilityService = service_impl::availability::AvailabilityServiceImpl<
    ServiceOfferingDao,
    WorkingHoursDao,
    AppointmentDao,
    ClockService,
    TransactionDao,
>;
type AppointmentService = service_impl::appointment::AppointmentServiceImpl<
    AppointmentDao,
    ServiceOfferingDao,
    AvailabilityService,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
>;

#[derive(Clone)]
pub struct RestStateImpl {
    service_offering_service: Arc<ServiceOfferingService>,
    working_hours_service: Arc<WorkingHoursService>,
    availability_service: Arc<AvailabilityService>,
    appointment_service: Arc<AppointmentService>,
}

impl rest::RestStateDef for RestStateImpl {
    type ServiceOfferingService = ServiceOfferingService;
    type WorkingHoursService = WorkingHoursService;
    type AvailabilityService = AvailabilityService;
    type AppointmentService = AppointmentService;

    fn service_offering_service(&self) -> Arc<Self::ServiceOfferingService> {
        self.service_offering_service.clone()
    }
    fn working_hours_service(&self) -> Arc<Self::WorkingHoursService> {
        self.working_hours_service.clone()
    }
    fn availability_service(&self) -> Arc<Self::AvailabilityService> {
        self.availability_service.clone()
    }
    fn appointment_service(&self) -> Arc<Self::AppointmentService> {
        self.appointment_service.clone()
    }
}

impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let permission_dao = Arc::new(PermissionDao::new(pool.clone()));
        let service_offering_dao = Arc::new(ServiceOfferingDao::new(pool.clone()));
        let working_hours_dao = Arc::new(WorkingHoursDao::new(pool.clone()));
        let appointment_dao = Arc::new(AppointmentDao::new(pool.clone()));

        // Every request acts as DEVUSER until a real authentication
        // integration takes its place.
        let user_service = Arc::new(service_impl::UserServiceDev);
        let permission_service = Arc::new(service_impl::PermissionServiceImpl {
            permission_dao,
            user_service,
        });
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);

        let service_offering_service =
            Arc::new(service_impl::service_offering::ServiceOfferingServiceImpl {
                service_offering_dao: service_offering_dao.clone(),
                permission_service: permission_service.clone(),
                clock_service: clock_service.clone(),
                uuid_service: uuid_service.clone(),
                transaction_dao: transaction_dao.clone(),
            });
        let working_hours_service =
            Arc::new(service_impl::working_hours::WorkingHoursServiceImpl {
                working_hours_dao: working_hours_dao.clone(),
                permission_service: permission_service.clone(),
                uuid_service: uuid_service.clone(),
                transaction_dao: transaction_dao.clone(),
            });
        let availability_service = Arc::new(service_impl::availability::AvailabilityServiceImpl {
            service_offering_dao: service_offering_dao.clone(),
            working_hours_dao: working_hours_dao.clone(),
            appointment_dao: appointment_dao.clone(),
            clock_service: clock_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let appointment_service = Arc::new(service_impl::appointment::AppointmentServiceImpl {
            appointment_dao,
            service_offering_dao,
            availability_service: availability_service.clone(),
            permission_service,
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            service_offering_service,
            working_hours_service,
            availability_service,
            appointment_service,
        }
    }
}

async fn grant_admin_privilege(pool: Arc<SqlitePool>, username: &str) {
    use dao::PermissionDao as _;
    let permission_dao = PermissionDaoImpl::new(pool);
    permission_dao
        .grant_privilege(
            username,
            service::permission::ADMIN_PRIVILEGE,
            "dev-first-start",
        )
        .await
        .expect("Could not grant the admin privilege");
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("Bookease backend version: {}", version);
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./bookease.sqlite3?mode=rwc".to_string());
    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let pool = Arc::new(
        SqlitePool::connect(&database_url)
            .await
            .expect("Could not connect to database"),
    );
    dao_impl_sqlite::create_schema(pool.as_ref())
        .await
        .expect("Could not create database schema");

    let rest_state = RestStateImpl::new(pool.clone());
    grant_admin_privilege(pool.clone(), "DEVUSER").await;

    rest::start_server(rest_state, &bind_address).await
}
