//! Fixture builders shared by the integration tests. Everything here
//! constructs in-memory rows; no database is involved.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sqlx::types::Json;

use eips_insight::store::models::{
    ActivityEvent, GovernanceState, LabelEvent, Proposal, PullRequest, StatusEvent,
};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn proposal(repo: &str, number: i64, title: &str, status: &str) -> Proposal {
    Proposal {
        repository: repo.to_string(),
        number,
        title: title.to_string(),
        author: "Alice Example (@alice)".to_string(),
        status: status.to_string(),
        proposal_type: "Standards Track".to_string(),
        category: Some("Core".to_string()),
        created_at: at(2020, 1, 1),
        updated_at: at(2020, 1, 1),
        requires: Json(Vec::new()),
    }
}

pub fn proposal_created(repo: &str, number: i64, created: DateTime<Utc>) -> Proposal {
    Proposal {
        created_at: created,
        updated_at: created,
        ..proposal(repo, number, &format!("Proposal {}", number), "Draft")
    }
}

pub fn open_pr(repo: &str, number: i64, created: DateTime<Utc>) -> PullRequest {
    PullRequest {
        repository: repo.to_string(),
        pr_number: number,
        title: format!("PR {}", number),
        author: "alice".to_string(),
        state: "open".to_string(),
        created_at: created,
        merged_at: None,
        closed_at: None,
    }
}

pub fn merged_pr(
    repo: &str,
    number: i64,
    created: DateTime<Utc>,
    merged: DateTime<Utc>,
) -> PullRequest {
    PullRequest {
        state: "closed".to_string(),
        merged_at: Some(merged),
        closed_at: Some(merged),
        ..open_pr(repo, number, created)
    }
}

pub fn closed_pr(
    repo: &str,
    number: i64,
    created: DateTime<Utc>,
    closed: DateTime<Utc>,
) -> PullRequest {
    PullRequest {
        state: "closed".to_string(),
        closed_at: Some(closed),
        ..open_pr(repo, number, created)
    }
}

pub fn activity(
    actor: &str,
    role: Option<&str>,
    event_type: &str,
    repo: &str,
    pr_number: i64,
    occurred: DateTime<Utc>,
) -> ActivityEvent {
    ActivityEvent {
        actor: actor.to_string(),
        role: role.map(str::to_string),
        event_type: event_type.to_string(),
        pr_number,
        repository: repo.to_string(),
        occurred_at: occurred,
        external_id: None,
    }
}

pub fn status_event(
    repo: &str,
    number: i64,
    from: Option<&str>,
    to: &str,
    changed: DateTime<Utc>,
) -> StatusEvent {
    StatusEvent {
        repository: repo.to_string(),
        number,
        from_status: from.map(str::to_string),
        to_status: to.to_string(),
        changed_at: changed,
    }
}

pub fn governance_state(repo: &str, pr_number: i64, state: &str) -> GovernanceState {
    GovernanceState {
        repository: repo.to_string(),
        pr_number,
        state: state.to_string(),
        days_since_last_action: 0,
    }
}

pub fn label_event(
    repo: &str,
    pr_number: i64,
    label: &str,
    action: &str,
    occurred: DateTime<Utc>,
) -> LabelEvent {
    LabelEvent {
        repository: repo.to_string(),
        pr_number,
        label: label.to_string(),
        action: action.to_string(),
        occurred_at: occurred,
    }
}
