mod booking_flow;

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::RestStateImpl;

/// Fresh database in a temporary file with the schema applied and DEVUSER
/// promoted to admin.  The file and its sqlite sidecars are removed again
/// when the setup is dropped.
pub struct TestSetup {
    pub rest_state: RestStateImpl,
    database_path: PathBuf,
}

impl TestSetup {
    pub async fn new() -> Self {
        let database_path =
            std::env::temp_dir().join(format!("bookease-test-{}.sqlite3", uuid::Uuid::new_v4()));
        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = Arc::new(
            SqlitePool::connect(&database_url)
                .await
                .expect("Could not open test database"),
        );
        dao_impl_sqlite::create_schema(pool.as_ref())
            .await
            .expect("Could not create test schema");
        crate::grant_admin_privilege(pool.clone(), "DEVUSER").await;
        Self {
            rest_state: RestStateImpl::new(pool),
            database_path,
        }
    }
}

impl Drop for TestSetup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.database_path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.database_path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = std::fs::remove_file(sidecar);
        }
    }
}

#[tokio::test]
async fn test_setup_removes_database_file_on_drop() {
    let test_setup = TestSetup::new().await;
    let database_path = test_setup.database_path.clone();
    assert!(database_path.exists());
    drop(test_setup);
    assert!(!database_path.exists());
}
