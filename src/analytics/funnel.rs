use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::primitives::{days_between, percentile_cont};
use crate::filters::Filters;
use crate::store::models::{ActivityEvent, PullRequest};

/// Lifecycle stage of a PR. Every PR lands in exactly one stage:
/// merged wins, then closed, then reviewed, then created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Created,
    Reviewed,
    Merged,
    Closed,
}

impl FunnelStage {
    /// Presentation order, not classification priority.
    pub const ORDER: [FunnelStage; 4] = [
        FunnelStage::Created,
        FunnelStage::Reviewed,
        FunnelStage::Merged,
        FunnelStage::Closed,
    ];

    pub fn classify(pr: &PullRequest, has_review: bool) -> Self {
        if pr.merged_at.is_some() {
            Self::Merged
        } else if pr.closed_at.is_some() {
            Self::Closed
        } else if has_review {
            Self::Reviewed
        } else {
            Self::Created
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelRow {
    pub stage: FunnelStage,
    pub count: u64,
    pub percentage: f64,
}

pub fn lifecycle_funnel(
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    filters: &Filters,
) -> Vec<FunnelRow> {
    let reviewed_prs: HashSet<(&str, i64)> = activity
        .iter()
        .filter(|ev| ev.kind().is_some_and(|k| k.is_review()))
        .map(|ev| (ev.repository.as_str(), ev.pr_number))
        .collect();

    let mut counts: HashMap<FunnelStage, u64> = HashMap::new();
    let mut total = 0u64;
    for pr in pull_requests {
        if !filters.repo.matches(&pr.repository) {
            continue;
        }
        let has_review = reviewed_prs.contains(&(pr.repository.as_str(), pr.pr_number));
        *counts.entry(FunnelStage::classify(pr, has_review)).or_default() += 1;
        total += 1;
    }

    FunnelStage::ORDER
        .into_iter()
        .map(|stage| {
            let count = counts.get(&stage).copied().unwrap_or(0);
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            FunnelRow {
                stage,
                count,
                percentage,
            }
        })
        .collect()
}

/// The four tracked latency metrics, in presentation order.
pub const OUTCOME_METRICS: [&str; 4] = ["first_review", "first_comment", "merge", "close"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeLatency {
    pub metric: String,
    pub p50_days: f64,
    pub p75_days: f64,
    pub p90_days: f64,
    pub sample_count: u64,
}

/// P50/P75/P90 of creation-to-outcome latency in days, per metric.
/// Metrics with no qualifying PRs are omitted from the result.
pub fn time_to_outcome(
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    filters: &Filters,
) -> Vec<OutcomeLatency> {
    // Earliest review / comment instant per PR.
    let mut first_review: HashMap<(&str, i64), chrono::DateTime<chrono::Utc>> = HashMap::new();
    let mut first_comment: HashMap<(&str, i64), chrono::DateTime<chrono::Utc>> = HashMap::new();
    for ev in activity {
        let Some(kind) = ev.kind() else { continue };
        let key = (ev.repository.as_str(), ev.pr_number);
        if kind.is_review() {
            first_review
                .entry(key)
                .and_modify(|t| *t = (*t).min(ev.occurred_at))
                .or_insert(ev.occurred_at);
        } else if kind.is_comment() {
            first_comment
                .entry(key)
                .and_modify(|t| *t = (*t).min(ev.occurred_at))
                .or_insert(ev.occurred_at);
        }
    }

    let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
    for pr in pull_requests {
        if !filters.repo.matches(&pr.repository) {
            continue;
        }
        let key = (pr.repository.as_str(), pr.pr_number);
        if let Some(&t) = first_review.get(&key) {
            samples
                .entry("first_review")
                .or_default()
                .push(days_between(pr.created_at, t) as f64);
        }
        if let Some(&t) = first_comment.get(&key) {
            samples
                .entry("first_comment")
                .or_default()
                .push(days_between(pr.created_at, t) as f64);
        }
        if let Some(t) = pr.merged_at {
            samples
                .entry("merge")
                .or_default()
                .push(days_between(pr.created_at, t) as f64);
        }
        if let Some(t) = pr.closed_at {
            samples
                .entry("close")
                .or_default()
                .push(days_between(pr.created_at, t) as f64);
        }
    }

    OUTCOME_METRICS
        .into_iter()
        .filter_map(|metric| {
            let values = samples.get(metric)?;
            Some(OutcomeLatency {
                metric: metric.to_string(),
                p50_days: percentile_cont(values, 0.50)?,
                p75_days: percentile_cont(values, 0.75)?,
                p90_days: percentile_cont(values, 0.90)?,
                sample_count: values.len() as u64,
            })
        })
        .collect()
}
