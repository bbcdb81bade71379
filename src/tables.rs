//! Generic sortable, filterable, paginated listings backing the explorer
//! tables. Sort columns are per-entity enums; an unsupported column string
//! coerces to the default instead of erroring, since the UI can carry a
//! stale sort over when switching entity kinds.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::filters::Filters;
use crate::store::models::Proposal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn coerce(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Sort whitelist for standards-track tables (EIPs/ERCs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardSort {
    Number,
    Title,
    Author,
    Status,
    Type,
    Category,
    Created,
}

impl StandardSort {
    /// Coerce-or-default: anything outside the whitelist falls back to
    /// number sort.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "author" => Self::Author,
            "status" => Self::Status,
            "type" => Self::Type,
            "category" => Self::Category,
            "created" => Self::Created,
            _ => Self::Number,
        }
    }
}

/// Sort whitelist for RIP-like tables; narrower than the standards one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RipSort {
    Number,
    Title,
    Author,
    Status,
    Created,
}

impl RipSort {
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "author" => Self::Author,
            "status" => Self::Status,
            "created" => Self::Created,
            _ => Self::Number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardRow {
    pub repository: String,
    pub number: i64,
    pub title: String,
    pub author: String,
    pub status: String,
    pub proposal_type: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RipRow {
    pub repository: String,
    pub number: i64,
    pub title: String,
    pub author: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
}

fn matches_filters(proposal: &Proposal, filters: &Filters, search: Option<&str>) -> bool {
    if !filters.repo.matches(&proposal.repository) {
        return false;
    }
    if !filters.status_matches(&proposal.status)
        || !filters.type_matches(&proposal.proposal_type)
        || !filters.category_matches(proposal.category.as_deref())
    {
        return false;
    }
    if !filters.year_in_range(proposal.created_at.year()) {
        return false;
    }
    if let Some(q) = search {
        let q = q.trim().to_lowercase();
        if !q.is_empty() {
            let matched = proposal.number.to_string().contains(&q)
                || proposal.title.to_lowercase().contains(&q)
                || proposal.author.to_lowercase().contains(&q);
            if !matched {
                return false;
            }
        }
    }
    true
}

fn paginate<T>(mut rows: Vec<T>, page: u64, page_size: u64) -> Page<T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = rows.len() as u64;
    let total_pages = total.div_ceil(page_size);

    // A page * page_size offset that overflows is just a page past the
    // end: empty rows, totals intact.
    let start = (page - 1)
        .checked_mul(page_size)
        .and_then(|s| usize::try_from(s).ok());
    let rows = match start {
        Some(start) if start < rows.len() => {
            rows.drain(..).skip(start).take(page_size as usize).collect()
        }
        _ => Vec::new(),
    };

    Page {
        rows,
        total,
        total_pages,
        page,
    }
}

/// Standards-track listing with the full sort whitelist.
#[allow(clippy::too_many_arguments)]
pub fn list_standards(
    proposals: &[Proposal],
    filters: &Filters,
    search: Option<&str>,
    sort: StandardSort,
    direction: SortDirection,
    page: u64,
    page_size: u64,
) -> Page<StandardRow> {
    let mut rows: Vec<StandardRow> = proposals
        .iter()
        .filter(|p| matches_filters(p, filters, search))
        .map(|p| StandardRow {
            repository: p.repository.clone(),
            number: p.number,
            title: p.title.clone(),
            author: p.author.clone(),
            status: p.status.clone(),
            proposal_type: p.proposal_type.clone(),
            category: p.category.clone(),
            created_at: p.created_at,
        })
        .collect();

    rows.sort_by(|a, b| {
        let ord = match sort {
            StandardSort::Number => a.number.cmp(&b.number),
            StandardSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            StandardSort::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
            StandardSort::Status => a.status.cmp(&b.status),
            StandardSort::Type => a.proposal_type.cmp(&b.proposal_type),
            StandardSort::Category => a.category.cmp(&b.category),
            StandardSort::Created => a.created_at.cmp(&b.created_at),
        };
        direction.apply(ord).then(a.number.cmp(&b.number))
    });

    paginate(rows, page, page_size)
}

/// RIP-like listing with the narrower sort whitelist and column set.
pub fn list_rips(
    proposals: &[Proposal],
    filters: &Filters,
    search: Option<&str>,
    sort: RipSort,
    direction: SortDirection,
    page: u64,
    page_size: u64,
) -> Page<RipRow> {
    let mut rows: Vec<RipRow> = proposals
        .iter()
        .filter(|p| matches_filters(p, filters, search))
        .map(|p| RipRow {
            repository: p.repository.clone(),
            number: p.number,
            title: p.title.clone(),
            author: p.author.clone(),
            status: p.status.clone(),
            created_at: p.created_at,
        })
        .collect();

    rows.sort_by(|a, b| {
        let ord = match sort {
            RipSort::Number => a.number.cmp(&b.number),
            RipSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            RipSort::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
            RipSort::Status => a.status.cmp(&b.status),
            RipSort::Created => a.created_at.cmp(&b.created_at),
        };
        direction.apply(ord).then(a.number.cmp(&b.number))
    });

    paginate(rows, page, page_size)
}
