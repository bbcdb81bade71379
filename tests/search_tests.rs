mod common;
use common::*;

use eips_insight::search::{
    looks_like_pr_query, score_proposal, search_authors, search_proposals, search_pull_requests,
};

#[test]
fn exact_title_outranks_substring_title() {
    let exact = proposal("eips", 10, "gas", "Draft");
    let partial = proposal("eips", 11, "Gas limit changes", "Draft");

    let hits = search_proposals(&[partial.clone(), exact.clone()], "gas", 10);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].number, 10);
    assert!(hits[0].score > hits[1].score);
    assert!(score_proposal(&exact, "gas") >= score_proposal(&partial, "gas"));
}

#[test]
fn numeric_queries_score_number_matches() {
    let p = proposal("eips", 4844, "Shard blob transactions", "Final");
    // Exact number also counts as a prefix, so both bonuses apply.
    assert!(score_proposal(&p, "4844") >= 1600);
    assert!(score_proposal(&p, "48") >= 600);
    assert_eq!(score_proposal(&p, "9999"), 0);
}

#[test]
fn zero_score_proposals_are_excluded() {
    let p = proposal("eips", 1, "Something else", "Draft");
    let hits = search_proposals(&[p], "nonexistent-term", 10);
    assert!(hits.is_empty());
}

#[test]
fn ties_break_by_number_ascending() {
    let a = proposal("eips", 20, "Token standard", "Final");
    let b = proposal("eips", 10, "Token registry", "Final");

    let hits = search_proposals(&[a, b], "token", 10);
    assert_eq!(hits[0].number, 10);
    assert_eq!(hits[1].number, 20);
    assert_eq!(hits[0].score, hits[1].score);
}

#[test]
fn author_search_aggregates_normalized_identities() {
    let mut p1 = proposal("eips", 1, "One", "Draft");
    p1.author = "Alice Example <alice@example.org>, Bob (@bob)".to_string();
    let mut p2 = proposal("eips", 2, "Two", "Draft");
    p2.author = "Alice Example <alice@other.org>".to_string();

    let hits = search_authors(&[p1, p2], "alice");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author, "Alice Example");
    assert_eq!(hits[0].proposal_count, 2);
}

#[test]
fn pr_search_is_gated_on_pr_like_queries() {
    assert!(looks_like_pr_query("1234"));
    assert!(looks_like_pr_query("#1234"));
    assert!(looks_like_pr_query("pr 1234"));
    assert!(looks_like_pr_query("pull request"));
    assert!(!looks_like_pr_query("gas limit"));

    let prs = vec![open_pr("eips", 77, at(2024, 1, 1))];
    assert!(search_pull_requests(&prs, "gas limit", 10).is_empty());

    let hits = search_pull_requests(&prs, "#77", 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].pr_number, 77);
}
