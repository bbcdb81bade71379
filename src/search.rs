//! Query-time search scoring over proposals, authors, and pull requests.
//!
//! Proposal search is additive: a proposal can match the query several
//! ways at once and collects every matching bonus. Only proposals with a
//! positive score come back, best first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::authors::normalize_authors;
use crate::store::models::{Proposal, PullRequest};

pub const SCORE_EXACT_NUMBER: u64 = 1000;
pub const SCORE_NUMBER_PREFIX: u64 = 600;
pub const SCORE_EXACT_TITLE: u64 = 800;
pub const SCORE_TITLE_SUBSTRING: u64 = 300;
pub const SCORE_AUTHOR_SUBSTRING: u64 = 200;
pub const SCORE_STATUS_SUBSTRING: u64 = 100;
pub const SCORE_CATEGORY_SUBSTRING: u64 = 80;
pub const SCORE_TYPE_SUBSTRING: u64 = 80;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProposalHit {
    pub repository: String,
    pub number: i64,
    pub title: String,
    pub status: String,
    pub score: u64,
}

pub fn score_proposal(proposal: &Proposal, query: &str) -> u64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;

    if query.chars().all(|c| c.is_ascii_digit()) {
        if query.parse::<i64>() == Ok(proposal.number) {
            score += SCORE_EXACT_NUMBER;
        }
        if proposal.number.to_string().starts_with(&query) {
            score += SCORE_NUMBER_PREFIX;
        }
    }

    let title = proposal.title.to_lowercase();
    if title == query {
        score += SCORE_EXACT_TITLE;
    }
    if title.contains(&query) {
        score += SCORE_TITLE_SUBSTRING;
    }
    if proposal.author.to_lowercase().contains(&query) {
        score += SCORE_AUTHOR_SUBSTRING;
    }
    if proposal.status.to_lowercase().contains(&query) {
        score += SCORE_STATUS_SUBSTRING;
    }
    if proposal
        .category
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains(&query))
    {
        score += SCORE_CATEGORY_SUBSTRING;
    }
    if proposal.proposal_type.to_lowercase().contains(&query) {
        score += SCORE_TYPE_SUBSTRING;
    }

    score
}

/// Score every candidate and return the positive-score hits, best first,
/// ties by proposal number. Callers that pre-limit their candidate fetch
/// should fetch at least 2× `limit` so a naive cut cannot drop a
/// higher-scored match.
pub fn search_proposals(proposals: &[Proposal], query: &str, limit: usize) -> Vec<ProposalHit> {
    let mut hits: Vec<ProposalHit> = proposals
        .iter()
        .filter_map(|p| {
            let score = score_proposal(p, query);
            (score > 0).then(|| ProposalHit {
                repository: p.repository.clone(),
                number: p.number,
                title: p.title.clone(),
                status: p.status.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.number.cmp(&b.number)));
    hits.truncate(limit);
    hits
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorHit {
    pub author: String,
    pub proposal_count: u64,
}

/// Aggregate proposal counts per normalized author identity, then filter
/// by case-insensitive substring match on the query.
pub fn search_authors(proposals: &[Proposal], query: &str) -> Vec<AuthorHit> {
    let query = query.trim().to_lowercase();

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for proposal in proposals {
        for identity in normalize_authors(&proposal.author) {
            *counts.entry(identity).or_default() += 1;
        }
    }

    let mut hits: Vec<AuthorHit> = counts
        .into_iter()
        .filter(|(identity, _)| query.is_empty() || identity.to_lowercase().contains(&query))
        .map(|(author, proposal_count)| AuthorHit {
            author,
            proposal_count,
        })
        .collect();

    hits.sort_by(|a, b| b.proposal_count.cmp(&a.proposal_count).then(a.author.cmp(&b.author)));
    hits
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequestHit {
    pub repository: String,
    pub pr_number: i64,
    pub title: String,
    pub state: String,
}

/// True when the query plausibly refers to a pull request. PR search is
/// only attempted for these queries; anything else returns empty.
pub fn looks_like_pr_query(query: &str) -> bool {
    let q = query.trim().to_lowercase();
    !q.is_empty()
        && (q.chars().all(|c| c.is_ascii_digit())
            || q.starts_with('#')
            || q.starts_with("pr")
            || q.starts_with("pull"))
}

pub fn search_pull_requests(
    pull_requests: &[PullRequest],
    query: &str,
    limit: usize,
) -> Vec<PullRequestHit> {
    if !looks_like_pr_query(query) {
        return Vec::new();
    }
    let q = query.trim().to_lowercase();
    let digits: String = q.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut hits: Vec<PullRequestHit> = pull_requests
        .iter()
        .filter(|pr| {
            if let Ok(number) = digits.parse::<i64>() {
                pr.pr_number == number
            } else {
                pr.title.to_lowercase().contains(&q)
            }
        })
        .map(|pr| PullRequestHit {
            repository: pr.repository.clone(),
            pr_number: pr.pr_number,
            title: pr.title.clone(),
            state: pr.state.clone(),
        })
        .collect();

    hits.sort_by(|a, b| a.pr_number.cmp(&b.pr_number));
    hits.truncate(limit);
    hits
}
