use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::filters::Filters;
use crate::store::models::{GovernanceState, LabelEvent, PullRequest};

/// Human label for a governance state. Unmapped states pass through their
/// raw value rather than being hidden.
pub fn state_label(state: &str) -> String {
    match state {
        "WAITING_ON_EDITOR" => "Waiting on editor".to_string(),
        "WAITING_ON_AUTHOR" => "Waiting on author".to_string(),
        "STALLED" => "Stalled".to_string(),
        "DRAFT" => "Draft".to_string(),
        "NO_STATE" => "No state".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateCount {
    pub state: String,
    pub label: String,
    pub count: u64,
}

/// Open-PR counts per materialized governance state.
pub fn governance_distribution(
    pull_requests: &[PullRequest],
    governance_states: &[GovernanceState],
    filters: &Filters,
) -> Vec<StateCount> {
    let open: HashSet<(&str, i64)> = pull_requests
        .iter()
        .filter(|pr| pr.is_open() && filters.repo.matches(&pr.repository))
        .map(|pr| (pr.repository.as_str(), pr.pr_number))
        .collect();

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for gs in governance_states {
        if open.contains(&(gs.repository.as_str(), gs.pr_number)) {
            *counts.entry(gs.state.as_str()).or_default() += 1;
        }
    }

    let mut rows: Vec<StateCount> = counts
        .into_iter()
        .map(|(state, count)| StateCount {
            state: state.to_string(),
            label: state_label(state),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.state.cmp(&b.state)));
    rows
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// PR counts per currently active label. A label is active on a PR when the
/// most recent labeled/unlabeled event for that `(pr, label)` pair was
/// `labeled`.
pub fn top_labels(
    label_events: &[LabelEvent],
    filters: &Filters,
    limit: usize,
) -> Vec<LabelCount> {
    let mut latest: HashMap<(&str, i64, &str), (DateTime<Utc>, &str)> = HashMap::new();
    for ev in label_events {
        if !filters.repo.matches(&ev.repository) {
            continue;
        }
        let key = (ev.repository.as_str(), ev.pr_number, ev.label.as_str());
        let entry = latest.entry(key).or_insert((ev.occurred_at, ev.action.as_str()));
        if ev.occurred_at >= entry.0 {
            *entry = (ev.occurred_at, ev.action.as_str());
        }
    }

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for ((_, _, label), (_, action)) in &latest {
        if action.eq_ignore_ascii_case("labeled") {
            *counts.entry(*label).or_default() += 1;
        }
    }

    let mut rows: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));
    rows.truncate(limit);
    rows
}
