//! PostgreSQL-backed store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    Connection, PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use std::time::Duration;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::{CreateUserOutcome, Event, EventWithGroup, Group, NewUser, Password, Store, User};

/// Open the connection pool used by the server and the CLI.
///
/// # Errors
/// Returns an error if the database cannot be reached.
pub async fn connect(dsn: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_span(operation: &'static str, statement: &'static str) -> tracing::Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn group_from_row(row: &PgRow) -> Result<Group, sqlx::Error> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn event_from_row(row: &PgRow) -> Result<EventWithGroup, sqlx::Error> {
    Ok(EventWithGroup {
        event: Event {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            starts_at: row.try_get("starts_at")?,
            group_id: row.try_get("group_id")?,
        },
        group: Group {
            id: row.try_get("group_id")?,
            name: row.try_get("group_name")?,
            description: row.try_get("group_description")?,
            created_at: row.try_get("group_created_at")?,
        },
    })
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgresql"
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("failed to acquire database connection")?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("failed to ping database")
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = "SELECT id, email, name, created_at FROM users WHERE email = $1";
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup user by email")?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .context("failed to decode user row")
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = "SELECT id, email, name, created_at FROM users WHERE id = $1";
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup user by id")?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .context("failed to decode user row")
    }

    async fn find_password(&self, user_id: Uuid) -> Result<Option<Password>> {
        let query = "SELECT user_id, hash FROM passwords WHERE user_id = $1";
        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup password")?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Password {
            user_id: row.try_get("user_id").context("failed to decode password row")?,
            hash: row.try_get("hash").context("failed to decode password row")?,
        }))
    }

    async fn list_events(&self, limit: i64) -> Result<Vec<EventWithGroup>> {
        let query = r"
            SELECT events.id,
                   events.title,
                   events.description,
                   events.starts_at,
                   events.group_id,
                   groups.name AS group_name,
                   groups.description AS group_description,
                   groups.created_at AS group_created_at
            FROM events
            JOIN groups ON groups.id = events.group_id
            ORDER BY events.starts_at ASC
            LIMIT $1
        ";
        let rows = sqlx::query(query)
            .bind(limit)
            .fetch_all(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to list events")?;

        rows.iter()
            .map(event_from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("failed to decode event row")
    }

    async fn list_groups(&self, limit: i64) -> Result<Vec<Group>> {
        let query = r"
            SELECT id, name, description, created_at
            FROM groups
            ORDER BY created_at ASC
            LIMIT $1
        ";
        let rows = sqlx::query(query)
            .bind(limit)
            .fetch_all(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to list groups")?;

        rows.iter()
            .map(group_from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("failed to decode group row")
    }

    async fn create_user(&self, new_user: NewUser) -> Result<CreateUserOutcome> {
        // User and password rows are written together or not at all.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("begin create user transaction")?;

        let query = r"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id
        ";
        let row = sqlx::query(query)
            .bind(&new_user.email)
            .bind(&new_user.name)
            .fetch_one(&mut *tx)
            .instrument(query_span("INSERT", query))
            .await;

        let user_id: Uuid = match row {
            Ok(row) => row.try_get("id").context("failed to decode user id")?,
            Err(err) => {
                if is_unique_violation(&err) {
                    let _ = tx.rollback().await;
                    return Ok(CreateUserOutcome::Conflict);
                }
                return Err(err).context("failed to insert user");
            }
        };

        let query = "INSERT INTO passwords (user_id, hash) VALUES ($1, $2)";
        sqlx::query(query)
            .bind(user_id)
            .bind(&new_user.password_hash)
            .execute(&mut *tx)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to insert password")?;

        tx.commit().await.context("commit create user transaction")?;

        Ok(CreateUserOutcome::Created(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
