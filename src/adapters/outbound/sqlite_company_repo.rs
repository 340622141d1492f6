//! SQLite Company Repository
//!
//! Implements CompanyRepository using SQLite for storage.
//! Blocking rusqlite calls run on the blocking thread pool.

use crate::domain::entities::{Company, CompanyFilter, CompanyPayload};
use crate::domain::ports::{CompanyRepository, RepositoryError};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::Arc;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    code       TEXT NOT NULL,
    country    TEXT NOT NULL,
    website    TEXT NOT NULL,
    phone      TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_companies_name ON companies (name);
CREATE INDEX IF NOT EXISTS idx_companies_code ON companies (code);
CREATE INDEX IF NOT EXISTS idx_companies_country ON companies (country);
CREATE INDEX IF NOT EXISTS idx_companies_website ON companies (website);
CREATE INDEX IF NOT EXISTS idx_companies_phone ON companies (phone);
";

const SELECT_COLUMNS: &str = "SELECT id, name, code, country, website, phone FROM companies";

/// SQLite-backed company repository.
///
/// A single connection is shared behind a mutex; SQLite serializes writers
/// anyway.
pub struct SqliteCompanyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCompanyRepository {
    /// Open (or create) the database file and apply the schema.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(RepositoryError::storage)?
        .map_err(to_repository_error)
    }

    /// Convert a SQLite row to a Company entity.
    fn row_to_company(row: &Row) -> rusqlite::Result<Company> {
        Ok(Company {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            code: row.get(2)?,
            country: row.get(3)?,
            website: row.get(4)?,
            phone: row.get(5)?,
        })
    }
}

fn to_repository_error(err: rusqlite::Error) -> RepositoryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound,
        other => {
            tracing::error!("sqlite error: {:?}", other);
            RepositoryError::storage(other)
        }
    }
}

#[async_trait]
impl CompanyRepository for SqliteCompanyRepository {
    async fn create(&self, payload: CompanyPayload) -> Result<Company, RepositoryError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO companies (name, code, country, website, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    payload.name,
                    payload.code,
                    payload.country,
                    payload.website,
                    payload.phone
                ],
            )?;
            let id = conn.last_insert_rowid() as u64;
            Ok(payload.into_company(id))
        })
        .await
    }

    async fn get(&self, id: u64) -> Result<Company, RepositoryError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id as i64],
                Self::row_to_company,
            )
        })
        .await
    }

    async fn get_all(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let conditions = filter.conditions();

            let mut sql = SELECT_COLUMNS.to_string();
            if !conditions.is_empty() {
                let clauses: Vec<String> = conditions
                    .iter()
                    .enumerate()
                    .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
                    .collect();
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY id");

            let mut stmt = conn.prepare(&sql)?;
            let companies = stmt
                .query_map(
                    params_from_iter(conditions.iter().map(|(_, value)| *value)),
                    Self::row_to_company,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(companies)
        })
        .await
    }

    async fn update(&self, company: &Company) -> Result<(), RepositoryError> {
        let company = company.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE companies
                 SET name = ?1, code = ?2, country = ?3, website = ?4, phone = ?5,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?6",
                params![
                    company.name,
                    company.code,
                    company.country,
                    company.website,
                    company.phone,
                    company.id as i64
                ],
            )?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM companies WHERE id = ?1", params![id as i64])?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(())
        })
        .await
    }
}
