//! In-memory store used by tests and local experiments.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CreateUserOutcome, Event, EventWithGroup, Group, NewUser, Password, Store, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    passwords: HashMap<Uuid, Password>,
    groups: Vec<Group>,
    events: Vec<Event>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails like an unreachable database would.
    pub offline: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(anyhow!("database is unavailable"));
        }
        Ok(())
    }

    /// Insert a user without a password record.
    pub async fn insert_user(&self, email: &str, name: Option<&str>) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(ToString::to_string),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.tables.lock().await.users.push(user);
        id
    }

    pub async fn insert_password(&self, user_id: Uuid, hash: String) {
        self.tables
            .lock()
            .await
            .passwords
            .insert(user_id, Password { user_id, hash });
    }

    pub async fn remove_user(&self, user_id: Uuid) {
        let mut tables = self.tables.lock().await;
        tables.users.retain(|user| user.id != user_id);
        tables.passwords.remove(&user_id);
    }

    pub async fn insert_group(&self, name: &str) -> Uuid {
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        let id = group.id;
        self.tables.lock().await.groups.push(group);
        id
    }

    pub async fn insert_event(&self, title: &str, group_id: Uuid, starts_at: DateTime<Utc>) -> Uuid {
        let event = Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            starts_at,
            group_id,
        };
        let id = event.id;
        self.tables.lock().await.events.push(event);
        id
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        self.check_online()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_password(&self, user_id: Uuid) -> Result<Option<Password>> {
        self.check_online()?;
        Ok(self.tables.lock().await.passwords.get(&user_id).cloned())
    }

    async fn list_events(&self, limit: i64) -> Result<Vec<EventWithGroup>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let mut events: Vec<&Event> = tables.events.iter().collect();
        events.sort_by_key(|event| event.starts_at);

        // Inner join: events whose group is gone are skipped.
        Ok(events
            .into_iter()
            .filter_map(|event| {
                let group = tables.groups.iter().find(|group| group.id == event.group_id)?;
                Some(EventWithGroup {
                    event: event.clone(),
                    group: group.clone(),
                })
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn list_groups(&self, limit: i64) -> Result<Vec<Group>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .groups
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<CreateUserOutcome> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|user| user.email == new_user.email) {
            return Ok(CreateUserOutcome::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            created_at: Utc::now(),
        };
        let user_id = user.id;
        tables.users.push(user);
        tables.passwords.insert(
            user_id,
            Password {
                user_id,
                hash: new_user.password_hash,
            },
        );
        Ok(CreateUserOutcome::Created(user_id))
    }
}
