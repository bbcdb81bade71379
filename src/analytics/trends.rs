use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::primitives::{month_range, YearMonth};
use crate::filters::{Filters, RepoGroup};
use crate::store::models::{Proposal, PullRequest};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreationTrendRow {
    pub year: i32,
    pub repo: RepoGroup,
    pub count: u64,
}

/// Proposal creations bucketed by calendar year × repository group,
/// ascending by year. Combinations with no proposals are absent; the
/// consumer fills zeros.
pub fn creation_trends(proposals: &[Proposal], filters: &Filters) -> Vec<CreationTrendRow> {
    let mut counts: BTreeMap<(i32, RepoGroup), u64> = BTreeMap::new();

    for proposal in proposals {
        if !filters.repo.matches(&proposal.repository) {
            continue;
        }
        let year = proposal.created_at.year();
        if !filters.year_in_range(year) {
            continue;
        }
        if !filters.status_matches(&proposal.status)
            || !filters.type_matches(&proposal.proposal_type)
            || !filters.category_matches(proposal.category.as_deref())
        {
            continue;
        }
        let group = RepoGroup::from_repository(&proposal.repository);
        *counts.entry((year, group)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((year, repo), count)| CreationTrendRow { year, repo, count })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyActivityRow {
    /// "YYYY-MM" bucket label.
    pub month: String,
    pub created: u64,
    pub merged: u64,
    pub closed: u64,
    pub open_at_month_end: u64,
}

/// Gap-filled monthly PR series from the earliest relevant PR's month
/// through the current month. Every month in that range gets a row even
/// when nothing happened in it.
pub fn pr_monthly_activity(
    pull_requests: &[PullRequest],
    filters: &Filters,
    now: DateTime<Utc>,
) -> Vec<MonthlyActivityRow> {
    let relevant: Vec<&PullRequest> = pull_requests
        .iter()
        .filter(|pr| filters.repo.matches(&pr.repository))
        .filter(|pr| filters.year_in_range(pr.created_at.year()))
        .collect();

    let Some(first) = relevant.iter().map(|pr| YearMonth::of(pr.created_at)).min() else {
        return Vec::new();
    };
    let current = YearMonth::of(now);

    month_range(first, current)
        .into_iter()
        .map(|month| {
            let end = month.end_exclusive();
            let in_month = |t: DateTime<Utc>| YearMonth::of(t) == month;

            let created = relevant.iter().filter(|pr| in_month(pr.created_at)).count();
            let merged = relevant
                .iter()
                .filter(|pr| pr.merged_at.is_some_and(in_month))
                .count();
            let closed = relevant
                .iter()
                .filter(|pr| pr.merged_at.is_none() && pr.closed_at.is_some_and(in_month))
                .count();

            // The in-progress month has no month-end snapshot yet, so its
            // open count reflects live PR state instead.
            let open = if month == current {
                relevant.iter().filter(|pr| pr.is_open()).count()
            } else {
                relevant
                    .iter()
                    .filter(|pr| {
                        pr.created_at < end
                            && pr.merged_at.map_or(true, |t| t >= end)
                            && pr.closed_at.map_or(true, |t| t >= end)
                    })
                    .count()
            };

            MonthlyActivityRow {
                month: month.label(),
                created: created as u64,
                merged: merged as u64,
                closed: closed as u64,
                open_at_month_end: open as u64,
            }
        })
        .collect()
}
