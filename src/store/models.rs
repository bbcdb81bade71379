use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Current snapshot of a proposal. Exactly one row per
/// `(repository, number)`; status history lives in `status_events`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Proposal {
    pub repository: String,
    pub number: i64,
    pub title: String,
    /// Raw author field as ingested; see `authors::normalize_authors`.
    pub author: String,
    pub status: String,
    pub proposal_type: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub requires: Json<Vec<i64>>,
}

/// One status transition. The first event for a proposal has
/// `from_status = NULL`; events per proposal are ordered by `changed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusEvent {
    pub repository: String,
    pub number: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PullRequest {
    pub repository: String,
    pub pr_number: i64,
    pub title: String,
    pub author: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case("open")
    }

    pub fn closed_without_merge(&self) -> bool {
        self.merged_at.is_none() && self.closed_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Editor,
    Reviewer,
    Contributor,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EDITOR" => Some(Self::Editor),
            "REVIEWER" => Some(Self::Reviewer),
            "CONTRIBUTOR" => Some(Self::Contributor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Approved,
    ChangesRequested,
    Commented,
    Reviewed,
    Merged,
    Opened,
    Closed,
}

impl ActivityKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Some(Self::Approved),
            "CHANGES_REQUESTED" => Some(Self::ChangesRequested),
            "COMMENTED" => Some(Self::Commented),
            "REVIEWED" => Some(Self::Reviewed),
            "MERGED" => Some(Self::Merged),
            "OPENED" => Some(Self::Opened),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn is_review(&self) -> bool {
        matches!(self, Self::Approved | Self::ChangesRequested | Self::Reviewed)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Commented)
    }
}

/// Per-actor action on a pull request. Role and event type are kept as the
/// raw ingested strings; unknown values are preserved, not dropped.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityEvent {
    pub actor: String,
    pub role: Option<String>,
    pub event_type: String,
    pub pr_number: i64,
    pub repository: String,
    pub occurred_at: DateTime<Utc>,
    pub external_id: Option<String>,
}

impl ActivityEvent {
    pub fn kind(&self) -> Option<ActivityKind> {
        ActivityKind::parse(&self.event_type)
    }

    pub fn actor_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

/// Externally materialized "who is blocking progress" signal for an open
/// PR. The core only reads this; derivation happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GovernanceState {
    pub repository: String,
    pub pr_number: i64,
    pub state: String,
    pub days_since_last_action: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LabelEvent {
    pub repository: String,
    pub pr_number: i64,
    pub label: String,
    /// "labeled" or "unlabeled".
    pub action: String,
    pub occurred_at: DateTime<Utc>,
}
