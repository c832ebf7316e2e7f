//! Data access for users, passwords, events, and groups.
//!
//! Handlers only see the [`Store`] trait. Production uses [`PgStore`]; tests
//! and local experiments use [`MemoryStore`].

mod memory;
pub mod models;
mod postgres;

pub use memory::MemoryStore;
pub use models::{CreateUserOutcome, Event, EventWithGroup, Group, NewUser, Password, User};
pub use postgres::{PgStore, connect};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound for the events and groups loaded by the root page.
pub const ROOT_LIST_LIMIT: i64 = 24;

pub type SharedStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Short tag used in logs and the health payload.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    /// Look up a user by an already-normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_password(&self, user_id: Uuid) -> Result<Option<Password>>;

    /// Events ordered by start time, each joined with its group.
    async fn list_events(&self, limit: i64) -> Result<Vec<EventWithGroup>>;

    /// Groups ordered by creation time.
    async fn list_groups(&self, limit: i64) -> Result<Vec<Group>>;

    /// Insert a user and its password in one unit; duplicate emails yield `Conflict`.
    async fn create_user(&self, new_user: NewUser) -> Result<CreateUserOutcome>;
}
