//! Rows read from the relational store.
//!
//! These are the shapes handlers consume; the store owns how they are loaded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered person. `email` is always stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Credential record, one-to-one with [`User`]. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password {
    pub user_id: Uuid,
    /// Argon2id PHC string.
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "groupId")]
    pub group_id: Uuid,
}

/// An event joined with the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventWithGroup {
    #[serde(flatten)]
    pub event: Event,
    pub group: Group,
}

/// Input for creating a user together with its password hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Outcome when attempting to create a new user + password record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created(Uuid),
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_with_group_flattens_event_fields() {
        let at = DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_default();
        let group = Group {
            id: Uuid::nil(),
            name: "Hikers".to_string(),
            description: None,
            created_at: at,
        };
        let value = serde_json::to_value(EventWithGroup {
            event: Event {
                id: Uuid::nil(),
                title: "Ridge walk".to_string(),
                description: None,
                starts_at: at,
                group_id: Uuid::nil(),
            },
            group,
        })
        .unwrap_or_default();

        assert_eq!(value["title"], json!("Ridge walk"));
        assert_eq!(value["group"]["name"], json!("Hikers"));
        assert!(value.get("event").is_none());
    }

    #[test]
    fn create_user_outcome_debug_names() {
        assert_eq!(format!("{:?}", CreateUserOutcome::Conflict), "Conflict");
        assert_eq!(
            format!("{:?}", CreateUserOutcome::Created(Uuid::nil())),
            format!("Created({})", Uuid::nil())
        );
    }
}
