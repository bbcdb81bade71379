use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::primitives::trailing_days;
use crate::filters::{Filters, RepoGroup};
use crate::store::models::{ActivityEvent, Proposal, PullRequest, StatusEvent};

/// Trailing window for trending and heatmap, in days.
pub const TRENDING_WINDOW_DAYS: i64 = 7;

/// Score weights. Status changes are the strongest signal; PR touches and
/// discussion activity are additive on top, so the score is monotonic in
/// every recent-activity count.
const WEIGHT_STATUS_CHANGE: u64 = 3;
const WEIGHT_PR_TOUCH: u64 = 2;
const WEIGHT_ACTIVITY_TOUCH: u64 = 1;

fn proposal_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:eip|erc|rip)[-\s]?(\d+)\b").expect("valid proposal ref regex")
    })
}

/// Proposal numbers referenced in a PR title ("EIP-4844", "erc 20", ...).
pub fn referenced_numbers(title: &str) -> Vec<i64> {
    proposal_ref_regex()
        .captures_iter(title)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingProposal {
    pub repository: String,
    pub number: i64,
    pub title: String,
    pub status: String,
    pub score: u64,
    pub status_changes: u64,
    pub pr_touches: u64,
    pub activity_touches: u64,
    pub trending_reason: String,
}

struct Signals {
    status_changes: u64,
    pr_touches: u64,
    activity_touches: u64,
}

impl Signals {
    fn score(&self) -> u64 {
        self.status_changes * WEIGHT_STATUS_CHANGE
            + self.pr_touches * WEIGHT_PR_TOUCH
            + self.activity_touches * WEIGHT_ACTIVITY_TOUCH
    }

    fn reason(&self) -> String {
        if self.status_changes >= self.pr_touches && self.status_changes >= self.activity_touches {
            let noun = if self.status_changes == 1 {
                "status change"
            } else {
                "status changes"
            };
            format!("{} {} this week", self.status_changes, noun)
        } else if self.pr_touches >= self.activity_touches {
            "new PR activity".to_string()
        } else {
            "recent discussion".to_string()
        }
    }
}

fn collect_signals(
    proposals: &[Proposal],
    status_events: &[StatusEvent],
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    filters: &Filters,
    cutoff: DateTime<Utc>,
) -> Vec<(usize, Signals)> {
    // Proposals keyed by (group, number) so PR titles in an EIPs repo
    // resolve against EIP proposals and so on.
    let by_key: HashMap<(RepoGroup, i64), usize> = proposals
        .iter()
        .enumerate()
        .filter(|(_, p)| filters.repo.matches(&p.repository))
        .map(|(i, p)| ((RepoGroup::from_repository(&p.repository), p.number), i))
        .collect();

    fn entry(signals: &mut HashMap<usize, Signals>, idx: usize) -> &mut Signals {
        signals.entry(idx).or_insert(Signals {
            status_changes: 0,
            pr_touches: 0,
            activity_touches: 0,
        })
    }

    let mut signals: HashMap<usize, Signals> = HashMap::new();

    for ev in status_events {
        if ev.changed_at < cutoff {
            continue;
        }
        let key = (RepoGroup::from_repository(&ev.repository), ev.number);
        if let Some(&idx) = by_key.get(&key) {
            entry(&mut signals, idx).status_changes += 1;
        }
    }

    // PRs that reference a proposal number in their title link that
    // proposal to PR lifecycle touches and discussion activity.
    let mut pr_to_proposals: HashMap<(&str, i64), Vec<usize>> = HashMap::new();
    for pr in pull_requests {
        let group = RepoGroup::from_repository(&pr.repository);
        let targets: Vec<usize> = referenced_numbers(&pr.title)
            .into_iter()
            .filter_map(|n| by_key.get(&(group, n)).copied())
            .collect();
        if targets.is_empty() {
            continue;
        }

        let touched = pr.created_at >= cutoff
            || pr.merged_at.is_some_and(|t| t >= cutoff)
            || pr.closed_at.is_some_and(|t| t >= cutoff);
        if touched {
            for &idx in &targets {
                entry(&mut signals, idx).pr_touches += 1;
            }
        }
        pr_to_proposals.insert((pr.repository.as_str(), pr.pr_number), targets);
    }

    for ev in activity {
        if ev.occurred_at < cutoff {
            continue;
        }
        if let Some(targets) = pr_to_proposals.get(&(ev.repository.as_str(), ev.pr_number)) {
            for &idx in targets {
                entry(&mut signals, idx).activity_touches += 1;
            }
        }
    }

    signals.into_iter().collect()
}

/// Top-N proposals by recency-weighted activity score over the trailing
/// 7-day window. Ties break by proposal number ascending.
pub fn trending(
    proposals: &[Proposal],
    status_events: &[StatusEvent],
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    filters: &Filters,
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<TrendingProposal> {
    let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
    let signals = collect_signals(
        proposals,
        status_events,
        pull_requests,
        activity,
        filters,
        cutoff,
    );

    let mut rows: Vec<TrendingProposal> = signals
        .into_iter()
        .filter(|(_, s)| s.score() > 0)
        .map(|(idx, s)| {
            let p = &proposals[idx];
            TrendingProposal {
                repository: p.repository.clone(),
                number: p.number,
                title: p.title.clone(),
                status: p.status.clone(),
                score: s.score(),
                status_changes: s.status_changes,
                pr_touches: s.pr_touches,
                activity_touches: s.activity_touches,
                trending_reason: s.reason(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.number.cmp(&b.number)));
    rows.truncate(top_n);
    rows
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapRow {
    pub repository: String,
    pub number: i64,
    pub title: String,
    pub total: u64,
    /// One entry per day of the window, zero-filled.
    pub daily: Vec<DailyCount>,
}

/// Daily activity series for the top-N trending proposals. Every day of
/// the window appears, with zero for quiet days.
pub fn activity_heatmap(
    proposals: &[Proposal],
    status_events: &[StatusEvent],
    pull_requests: &[PullRequest],
    activity: &[ActivityEvent],
    filters: &Filters,
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<HeatmapRow> {
    let top = trending(
        proposals,
        status_events,
        pull_requests,
        activity,
        filters,
        now,
        top_n,
    );
    let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
    let window = trailing_days(now, TRENDING_WINDOW_DAYS as u64 + 1);

    top.into_iter()
        .map(|t| {
            let group = RepoGroup::from_repository(&t.repository);
            let prs: HashSet<(&str, i64)> = pull_requests
                .iter()
                .filter(|pr| RepoGroup::from_repository(&pr.repository) == group)
                .filter(|pr| referenced_numbers(&pr.title).contains(&t.number))
                .map(|pr| (pr.repository.as_str(), pr.pr_number))
                .collect();

            let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
            for ev in status_events {
                if ev.changed_at >= cutoff
                    && ev.number == t.number
                    && RepoGroup::from_repository(&ev.repository) == group
                {
                    *per_day.entry(ev.changed_at.date_naive()).or_default() += 1;
                }
            }
            for ev in activity {
                if ev.occurred_at >= cutoff
                    && prs.contains(&(ev.repository.as_str(), ev.pr_number))
                {
                    *per_day.entry(ev.occurred_at.date_naive()).or_default() += 1;
                }
            }

            let daily: Vec<DailyCount> = window
                .iter()
                .map(|&date| DailyCount {
                    date,
                    count: per_day.get(&date).copied().unwrap_or(0),
                })
                .collect();
            let total = daily.iter().map(|d| d.count).sum();

            HeatmapRow {
                repository: t.repository,
                number: t.number,
                title: t.title,
                total,
                daily,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_references_parse() {
        assert_eq!(referenced_numbers("Update EIP-4844: blobs"), vec![4844]);
        assert_eq!(referenced_numbers("erc 20 cleanup"), vec![20]);
        assert_eq!(referenced_numbers("Fix typos"), Vec::<i64>::new());
    }
}
