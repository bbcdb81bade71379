use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::filters::Filters;
use crate::store::models::{ActivityEvent, ActivityKind, PullRequest, Role};

/// Composite-score weights. Each signal is strictly positive, so more of
/// any of them never lowers an actor's score.
pub const WEIGHT_PR_MERGED: u64 = 8;
pub const WEIGHT_PR_REVIEWED: u64 = 4;
pub const WEIGHT_PR_OPENED: u64 = 2;
pub const WEIGHT_COMMENT: u64 = 1;

pub const LEADERBOARD_DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub actor: String,
    pub role: Option<Role>,
    pub prs_reviewed: u64,
    pub comments: u64,
    pub prs_opened: u64,
    pub prs_merged: u64,
    pub total_score: u64,
    pub avg_response_hours: Option<f64>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Default)]
struct ActorStats {
    reviewed_prs: HashSet<(String, i64)>,
    comments: u64,
    opened: u64,
    merged: u64,
    role: Option<Role>,
    last_activity: Option<DateTime<Utc>>,
    first_action: HashMap<(String, i64), DateTime<Utc>>,
}

/// Rank actors by composite score. Ties break on most recent activity,
/// then actor name; ranks are contiguous from 1.
pub fn role_leaderboard(
    activity: &[ActivityEvent],
    pull_requests: &[PullRequest],
    filters: &Filters,
    role: Option<Role>,
    limit: Option<usize>,
) -> Vec<LeaderboardEntry> {
    let pr_created: HashMap<(&str, i64), DateTime<Utc>> = pull_requests
        .iter()
        .map(|pr| ((pr.repository.as_str(), pr.pr_number), pr.created_at))
        .collect();

    let mut stats: HashMap<&str, ActorStats> = HashMap::new();
    for ev in activity {
        if !filters.repo.matches(&ev.repository) {
            continue;
        }
        if let Some(wanted) = role {
            if ev.actor_role() != Some(wanted) {
                continue;
            }
        }
        let entry = stats.entry(ev.actor.as_str()).or_default();
        let key = (ev.repository.clone(), ev.pr_number);

        if let Some(kind) = ev.kind() {
            if kind.is_review() {
                entry.reviewed_prs.insert(key.clone());
            } else if kind.is_comment() {
                entry.comments += 1;
            } else if kind == ActivityKind::Opened {
                entry.opened += 1;
            } else if kind == ActivityKind::Merged {
                entry.merged += 1;
            }
        }

        if entry.role.is_none() {
            entry.role = ev.actor_role();
        }
        entry.last_activity = Some(match entry.last_activity {
            Some(t) => t.max(ev.occurred_at),
            None => ev.occurred_at,
        });
        entry
            .first_action
            .entry(key)
            .and_modify(|t| *t = (*t).min(ev.occurred_at))
            .or_insert(ev.occurred_at);
    }

    let mut entries: Vec<LeaderboardEntry> = stats
        .into_iter()
        .filter_map(|(actor, s)| {
            let last_activity = s.last_activity?;
            let prs_reviewed = s.reviewed_prs.len() as u64;
            let total_score = prs_reviewed * WEIGHT_PR_REVIEWED
                + s.comments * WEIGHT_COMMENT
                + s.opened * WEIGHT_PR_OPENED
                + s.merged * WEIGHT_PR_MERGED;

            // Mean hours from PR creation to this actor's first touch,
            // over the PRs we have a creation timestamp for.
            let mut response_hours = Vec::new();
            for ((repo, pr_number), first) in &s.first_action {
                if let Some(created) = pr_created.get(&(repo.as_str(), *pr_number)) {
                    let hours = (*first - *created).num_minutes() as f64 / 60.0;
                    if hours >= 0.0 {
                        response_hours.push(hours);
                    }
                }
            }
            let avg_response_hours = if response_hours.is_empty() {
                None
            } else {
                Some(response_hours.iter().sum::<f64>() / response_hours.len() as f64)
            };

            Some(LeaderboardEntry {
                rank: 0,
                actor: actor.to_string(),
                role: s.role,
                prs_reviewed,
                comments: s.comments,
                prs_opened: s.opened,
                prs_merged: s.merged,
                total_score,
                avg_response_hours,
                last_activity,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then(b.last_activity.cmp(&a.last_activity))
            .then(a.actor.cmp(&b.actor))
    });
    entries.truncate(limit.unwrap_or(LEADERBOARD_DEFAULT_LIMIT));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub actor: String,
    pub role: Option<Role>,
    pub event_type: String,
    pub repository: String,
    pub pr_number: i64,
    pub occurred_at: DateTime<Utc>,
    pub link: String,
}

fn repo_slug(org: &str, repository: &str) -> String {
    if repository.contains('/') {
        repository.to_string()
    } else {
        format!("{}/{}", org, repository)
    }
}

/// Deep link back to the source PR. Review events anchor to the review,
/// comment events to the comment, everything else to the PR root; events
/// without an external id fall back to the root link.
pub fn event_link(org: &str, ev: &ActivityEvent) -> String {
    let base = format!(
        "https://github.com/{}/pull/{}",
        repo_slug(org, &ev.repository),
        ev.pr_number
    );
    match (ev.kind(), ev.external_id.as_deref()) {
        (Some(kind), Some(id)) if kind.is_review() => {
            format!("{}#pullrequestreview-{}", base, id)
        }
        (Some(kind), Some(id)) if kind.is_comment() => {
            format!("{}#issuecomment-{}", base, id)
        }
        _ => base,
    }
}

/// Most recent `limit` activity events, newest first.
pub fn activity_timeline(
    activity: &[ActivityEvent],
    filters: &Filters,
    role: Option<Role>,
    limit: usize,
    github_org: &str,
) -> Vec<TimelineEntry> {
    let mut events: Vec<&ActivityEvent> = activity
        .iter()
        .filter(|ev| filters.repo.matches(&ev.repository))
        .filter(|ev| role.is_none() || ev.actor_role() == role)
        .collect();
    events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    events.truncate(limit);

    events
        .into_iter()
        .map(|ev| TimelineEntry {
            actor: ev.actor.clone(),
            role: ev.actor_role(),
            event_type: ev.event_type.clone(),
            repository: ev.repository.clone(),
            pr_number: ev.pr_number,
            occurred_at: ev.occurred_at,
            link: event_link(github_org, ev),
        })
        .collect()
}
