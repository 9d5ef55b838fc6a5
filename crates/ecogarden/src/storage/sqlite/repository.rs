//! SQLite repository implementation.
//!
//! Implements the repository traits from `ecogarden_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use ecogarden_core::advice::{Advice, MonthYear, Period, User};
use ecogarden_core::storage::{
    AdviceRepository, PeriodBatch, RepositoryError, Result, UserRepository,
};

use super::conversions::{format_datetime, row_to_advice, row_to_period, row_to_user};
use super::error::{map_commit_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Loads the periods of one advice, ordered by (year, month).
fn load_periods(conn: &rusqlite::Connection, advice_id: &str) -> rusqlite::Result<Vec<Period>> {
    let mut stmt = conn.prepare_cached(schema::SELECT_PERIODS_BY_ADVICE)?;
    let periods = stmt
        .query_map([advice_id], row_to_period)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(periods)
}

fn insert_period(conn: &rusqlite::Connection, period: &Period) -> rusqlite::Result<()> {
    conn.execute(
        schema::INSERT_PERIOD,
        rusqlite::params![
            period.id.to_string(),
            period.advice_id.to_string(),
            period.month,
            period.year
        ],
    )?;
    Ok(())
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// AdviceRepository implementation
// ============================================================================

#[async_trait]
impl AdviceRepository for SqliteRepository {
    async fn get_advice(&self, id: Uuid) -> Result<Option<Advice>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ADVICE_BY_ID).map_err(wrap_err)?;
                let mut advice = match stmt.query_row([&id_str], row_to_advice) {
                    Ok(advice) => advice,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };
                advice.periods = load_periods(conn, &id_str).map_err(wrap_err)?;
                Ok(Some(advice))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Advice", id.to_string()))
    }

    async fn list_advice_for_period(&self, period: MonthYear) -> Result<Vec<Advice>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ADVICE_BY_PERIOD)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![period.month, period.year], row_to_advice)
                    .map_err(wrap_err)?;

                let mut results = Vec::new();
                for row_result in rows {
                    let mut advice = row_result.map_err(wrap_err)?;
                    advice.periods =
                        load_periods(conn, &advice.id.to_string()).map_err(wrap_err)?;
                    results.push(advice);
                }
                Ok(results)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_advice(&self, advice: &Advice) -> Result<()> {
        let advice = advice.clone();
        let advice_id = advice.id.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_ADVICE,
                    rusqlite::params![
                        advice.id.to_string(),
                        advice.user_id.to_string(),
                        advice.content,
                        format_datetime(&advice.created_at),
                        advice.updated_at.as_ref().map(format_datetime)
                    ],
                )
                .map_err(wrap_err)?;
                for period in &advice.periods {
                    insert_period(&tx, period).map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Advice", advice_id))
    }

    async fn delete_advice(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ADVICE, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Advice", id.to_string()))
    }

    async fn find_period(&self, advice_id: Uuid, period: MonthYear) -> Result<Option<Period>> {
        let advice_id_str = advice_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PERIOD_BY_KEY)
                    .map_err(wrap_err)?;
                match stmt.query_row(
                    rusqlite::params![advice_id_str, period.month, period.year],
                    row_to_period,
                ) {
                    Ok(period) => Ok(Some(period)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn commit_period_batch(&self, batch: &PeriodBatch) -> Result<()> {
        let batch = batch.clone();
        let advice_id = batch.advice_id.to_string();

        self.conn
            .call(move |conn| {
                let id = batch.advice_id.to_string();
                // Dropping the transaction without commit rolls everything back.
                let tx = conn.transaction().map_err(wrap_err)?;

                let touched = match (&batch.content, &batch.updated_at) {
                    (Some(content), at) => tx.execute(
                        schema::UPDATE_ADVICE_CONTENT,
                        rusqlite::params![id, content, at.as_ref().map(format_datetime)],
                    ),
                    (None, Some(at)) => tx.execute(
                        schema::TOUCH_ADVICE,
                        rusqlite::params![id, format_datetime(at)],
                    ),
                    (None, None) => tx
                        .query_row(schema::SELECT_ADVICE_BY_ID, [&id], |_| Ok(1)),
                }
                .map_err(wrap_err)?;
                if touched == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }

                for period_id in &batch.deletes {
                    let rows = tx
                        .execute(schema::DELETE_PERIOD, [period_id.to_string(), id.clone()])
                        .map_err(wrap_err)?;
                    if rows == 0 {
                        return Err(tokio_rusqlite::Error::Other(
                            format!("period {period_id} does not belong to advice {id}").into(),
                        ));
                    }
                }

                for period in &batch.creates {
                    insert_period(&tx, period).map_err(wrap_err)?;
                }

                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_commit_error(e, advice_id))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        let email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        user.id.to_string(),
                        user.email,
                        user.city,
                        user.postal_code,
                        user.role.as_str(),
                        user.password_hash,
                        format_datetime(&user.created_at),
                        user.updated_at.as_ref().map(format_datetime)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", email))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![
                            user.id.to_string(),
                            user.email,
                            user.city,
                            user.postal_code,
                            user.role.as_str(),
                            user.password_hash,
                            user.updated_at.as_ref().map(format_datetime)
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }
}
