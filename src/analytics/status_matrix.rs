use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::filters::{Filters, RepoGroup};
use crate::store::models::Proposal;

/// Fixed presentation order for proposal statuses. Rows come back in this
/// order; statuses with no proposals at all are dropped.
pub const STATUS_ORDER: [&str; 7] = [
    "Draft",
    "Review",
    "Last Call",
    "Final",
    "Living",
    "Stagnant",
    "Withdrawn",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusMatrixRow {
    pub status: String,
    pub eips: u64,
    pub ercs: u64,
    pub rips: u64,
    pub unknown: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusMatrix {
    pub rows: Vec<StatusMatrixRow>,
    pub column_totals: StatusMatrixRow,
}

/// Status × repository-group counts with row, column, and grand totals.
pub fn status_matrix(proposals: &[Proposal], filters: &Filters) -> StatusMatrix {
    let mut counts: HashMap<(&str, RepoGroup), u64> = HashMap::new();

    for proposal in proposals {
        if !filters.repo.matches(&proposal.repository) {
            continue;
        }
        if !filters.status_matches(&proposal.status)
            || !filters.type_matches(&proposal.proposal_type)
            || !filters.category_matches(proposal.category.as_deref())
        {
            continue;
        }
        let Some(status) = STATUS_ORDER
            .iter()
            .find(|s| s.eq_ignore_ascii_case(&proposal.status))
        else {
            continue;
        };
        let group = RepoGroup::from_repository(&proposal.repository);
        *counts.entry((status, group)).or_default() += 1;
    }

    let mut rows = Vec::new();
    let mut totals = StatusMatrixRow {
        status: "Total".to_string(),
        eips: 0,
        ercs: 0,
        rips: 0,
        unknown: 0,
        total: 0,
    };

    for status in STATUS_ORDER {
        let cell = |group| counts.get(&(status, group)).copied().unwrap_or(0);
        let row = StatusMatrixRow {
            status: status.to_string(),
            eips: cell(RepoGroup::Eips),
            ercs: cell(RepoGroup::Ercs),
            rips: cell(RepoGroup::Rips),
            unknown: cell(RepoGroup::Unknown),
            total: cell(RepoGroup::Eips)
                + cell(RepoGroup::Ercs)
                + cell(RepoGroup::Rips)
                + cell(RepoGroup::Unknown),
        };
        if row.total == 0 {
            continue;
        }
        totals.eips += row.eips;
        totals.ercs += row.ercs;
        totals.rips += row.rips;
        totals.unknown += row.unknown;
        totals.total += row.total;
        rows.push(row);
    }

    StatusMatrix {
        rows,
        column_totals: totals,
    }
}
