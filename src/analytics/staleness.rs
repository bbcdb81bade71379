use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::primitives::days_between;
use crate::filters::Filters;
use crate::store::models::{ActivityEvent, GovernanceState, PullRequest};

/// Fixed age buckets for open PRs, always reported in this order.
/// Boundaries are inclusive on the low side of each range label:
/// age ≤ 7 → "0-7", ≤ 30 → "7-30", ≤ 90 → "30-90", else "90+".
pub const BUCKET_LABELS: [&str; 4] = ["0-7", "7-30", "30-90", "90+"];

pub fn bucket_for_age(age_days: i64) -> &'static str {
    if age_days <= 7 {
        BUCKET_LABELS[0]
    } else if age_days <= 30 {
        BUCKET_LABELS[1]
    } else if age_days <= 90 {
        BUCKET_LABELS[2]
    } else {
        BUCKET_LABELS[3]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StalenessBucket {
    pub range: String,
    pub count: u64,
}

pub fn staleness_buckets(
    pull_requests: &[PullRequest],
    filters: &Filters,
    now: DateTime<Utc>,
) -> Vec<StalenessBucket> {
    let mut counts: HashMap<&'static str, u64> = HashMap::new();
    for pr in pull_requests {
        if !pr.is_open() || !filters.repo.matches(&pr.repository) {
            continue;
        }
        let age = days_between(pr.created_at, now);
        *counts.entry(bucket_for_age(age)).or_default() += 1;
    }

    BUCKET_LABELS
        .into_iter()
        .map(|range| StalenessBucket {
            range: range.to_string(),
            count: counts.get(range).copied().unwrap_or(0),
        })
        .collect()
}

pub const HIGH_RISK_DEFAULT_THRESHOLD_DAYS: i64 = 30;
const HIGH_RISK_CAP: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighRiskPr {
    pub repository: String,
    pub pr_number: i64,
    pub title: String,
    pub author: String,
    pub age_days: i64,
    /// None when the PR has no recorded activity at all.
    pub days_since_last_activity: Option<i64>,
    pub governance_state: String,
}

/// Open PRs with a materialized governance state whose last recorded
/// activity is absent or at least `threshold` days old. A PR with no
/// activity history is always at risk, whatever its age. Sorted by age
/// descending, capped at 20.
pub fn high_risk_stale(
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    governance_states: &[GovernanceState],
    filters: &Filters,
    now: DateTime<Utc>,
) -> Vec<HighRiskPr> {
    let threshold = filters
        .day_threshold
        .unwrap_or(HIGH_RISK_DEFAULT_THRESHOLD_DAYS);

    let mut last_activity: HashMap<(&str, i64), DateTime<Utc>> = HashMap::new();
    for ev in activity {
        let key = (ev.repository.as_str(), ev.pr_number);
        last_activity
            .entry(key)
            .and_modify(|t| *t = (*t).max(ev.occurred_at))
            .or_insert(ev.occurred_at);
    }

    let states: HashMap<(&str, i64), &GovernanceState> = governance_states
        .iter()
        .map(|gs| ((gs.repository.as_str(), gs.pr_number), gs))
        .collect();

    let mut at_risk: Vec<HighRiskPr> = pull_requests
        .iter()
        .filter(|pr| pr.is_open() && filters.repo.matches(&pr.repository))
        .filter_map(|pr| {
            let key = (pr.repository.as_str(), pr.pr_number);
            let state = states.get(&key)?;
            let since = last_activity.get(&key).map(|&t| days_between(t, now));
            match since {
                Some(days) if days < threshold => None,
                _ => Some(HighRiskPr {
                    repository: pr.repository.clone(),
                    pr_number: pr.pr_number,
                    title: pr.title.clone(),
                    author: pr.author.clone(),
                    age_days: days_between(pr.created_at, now),
                    days_since_last_activity: since,
                    governance_state: state.state.clone(),
                }),
            }
        })
        .collect();

    at_risk.sort_by(|a, b| b.age_days.cmp(&a.age_days).then(a.pr_number.cmp(&b.pr_number)));
    at_risk.truncate(HIGH_RISK_CAP);
    at_risk
}
