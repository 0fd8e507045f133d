use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

pub mod appointment;
pub mod service_offering;
pub mod working_hours;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS service_offering (
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        duration_minutes INTEGER NOT NULL,
        price REAL NOT NULL,
        address TEXT,
        image_url TEXT,
        created TEXT NOT NULL,
        deleted TEXT,
        update_version BLOB NOT NULL,
        update_process TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS working_hours (
        id BLOB PRIMARY KEY,
        day_of_week INTEGER NOT NULL UNIQUE,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        available INTEGER NOT NULL,
        update_version BLOB NOT NULL,
        update_process TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS appointment (
        id BLOB PRIMARY KEY,
        user_name TEXT NOT NULL,
        service_id BLOB NOT NULL REFERENCES service_offering (id),
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        status TEXT NOT NULL,
        created TEXT NOT NULL,
        deleted TEXT,
        update_version BLOB NOT NULL,
        update_process TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS appointment_confirmed_start_time
        ON appointment (start_time)
        WHERE status = 'confirmed' AND deleted IS NULL;
    CREATE TABLE IF NOT EXISTS user_privilege (
        user_name TEXT NOT NULL,
        privilege_name TEXT NOT NULL,
        update_process TEXT NOT NULL,
        PRIMARY KEY (user_name, privilege_name)
    );
";

/// Creates all tables and indexes if they do not exist yet.  Safe to run on
/// every startup.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), DaoError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await.map_db_error()?;
    tracing::info!("Database schema is up to date");
    Ok(())
}

pub struct PermissionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl PermissionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::PermissionDao for PermissionDaoImpl {
    async fn has_privilege(&self, user: &str, privilege: &str) -> Result<bool, DaoError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT count(*) FROM user_privilege WHERE user_name = ? AND privilege_name = ?",
        )
        .bind(user)
        .bind(privilege)
        .fetch_one(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(count > 0)
    }

    async fn grant_privilege(
        &self,
        user: &str,
        privilege: &str,
        process: &str,
    ) -> Result<(), DaoError> {
        sqlx::query(
            r"INSERT OR IGNORE INTO user_privilege (user_name, privilege_name, update_process) VALUES (?, ?, ?)",
        )
        .bind(user)
        .bind(privilege)
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        // Only the last clone of the transaction actually commits.  Nested
        // service calls share the same transaction and their commits are
        // no-ops.
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}
