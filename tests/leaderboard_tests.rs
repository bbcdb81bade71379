mod common;
use common::*;

use chrono::{TimeZone, Utc};
use eips_insight::analytics::leaderboard::{
    activity_timeline, event_link, role_leaderboard, WEIGHT_COMMENT, WEIGHT_PR_MERGED,
    WEIGHT_PR_OPENED, WEIGHT_PR_REVIEWED,
};
use eips_insight::filters::Filters;
use eips_insight::store::models::{ActivityEvent, Role};

fn filters() -> Filters {
    Filters::default().normalize().unwrap()
}

#[test]
fn weights_are_positive_and_monotonic() {
    for weight in [
        WEIGHT_COMMENT,
        WEIGHT_PR_OPENED,
        WEIGHT_PR_REVIEWED,
        WEIGHT_PR_MERGED,
    ] {
        assert!(weight > 0);
    }

    let prs = vec![open_pr("eips", 1, at(2024, 1, 1)), open_pr("eips", 2, at(2024, 1, 1))];
    let base = vec![activity("alice", None, "COMMENTED", "eips", 1, at(2024, 1, 2))];
    let mut more = base.clone();
    more.push(activity("alice", None, "MERGED", "eips", 2, at(2024, 1, 3)));

    let score_of = |events: &[ActivityEvent]| {
        role_leaderboard(events, &prs, &filters(), None, None)[0].total_score
    };
    assert!(score_of(&more) > score_of(&base));
}

#[test]
fn score_ties_break_on_recency_then_name() {
    let prs = vec![open_pr("eips", 1, at(2024, 1, 1))];
    let events = vec![
        activity("zoe", None, "COMMENTED", "eips", 1, at(2024, 1, 10)),
        activity("adam", None, "COMMENTED", "eips", 1, at(2024, 1, 5)),
    ];

    let board = role_leaderboard(&events, &prs, &filters(), None, None);

    // Identical scores; the more recently active actor ranks higher.
    assert_eq!(board[0].total_score, board[1].total_score);
    assert_eq!(board[0].actor, "zoe");
    assert_eq!(board[1].actor, "adam");
    let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
}

#[test]
fn ranks_are_contiguous_from_one() {
    let prs = vec![open_pr("eips", 1, at(2024, 1, 1))];
    let events = vec![
        activity("a", None, "MERGED", "eips", 1, at(2024, 1, 2)),
        activity("b", None, "APPROVED", "eips", 1, at(2024, 1, 2)),
        activity("c", None, "COMMENTED", "eips", 1, at(2024, 1, 2)),
    ];

    let board = role_leaderboard(&events, &prs, &filters(), None, None);
    let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(board[0].total_score > board[1].total_score);
    assert!(board[1].total_score > board[2].total_score);
}

#[test]
fn role_filter_keeps_only_that_role() {
    let prs = vec![open_pr("eips", 1, at(2024, 1, 1))];
    let events = vec![
        activity("ed", Some("EDITOR"), "APPROVED", "eips", 1, at(2024, 1, 2)),
        activity("rev", Some("REVIEWER"), "APPROVED", "eips", 1, at(2024, 1, 2)),
    ];

    let board = role_leaderboard(&events, &prs, &filters(), Some(Role::Editor), None);
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].actor, "ed");
    assert_eq!(board[0].role, Some(Role::Editor));
}

#[test]
fn response_hours_average_first_touch_latency() {
    let prs = vec![open_pr("eips", 1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())];
    let events = vec![
        activity(
            "alice",
            None,
            "COMMENTED",
            "eips",
            1,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        ),
        // A later touch on the same PR does not change first-response time.
        activity(
            "alice",
            None,
            "COMMENTED",
            "eips",
            1,
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        ),
    ];

    let board = role_leaderboard(&events, &prs, &filters(), None, None);
    assert_eq!(board[0].avg_response_hours, Some(24.0));
}

#[test]
fn leaderboard_respects_limit() {
    let prs = vec![open_pr("eips", 1, at(2024, 1, 1))];
    let events: Vec<ActivityEvent> = (0..30)
        .map(|i| {
            activity(
                &format!("actor{:02}", i),
                None,
                "COMMENTED",
                "eips",
                1,
                at(2024, 1, 2),
            )
        })
        .collect();

    assert_eq!(role_leaderboard(&events, &prs, &filters(), None, None).len(), 20);
    assert_eq!(
        role_leaderboard(&events, &prs, &filters(), None, Some(5)).len(),
        5
    );
}

#[test]
fn timeline_is_newest_first_with_typed_links() {
    let mut review = activity("bob", Some("REVIEWER"), "APPROVED", "eips", 7, at(2024, 1, 3));
    review.external_id = Some("900".to_string());
    let mut comment = activity("amy", None, "COMMENTED", "eips", 7, at(2024, 1, 2));
    comment.external_id = Some("800".to_string());
    let opened = activity("amy", None, "OPENED", "eips", 7, at(2024, 1, 1));

    let events = vec![opened, review, comment];
    let timeline = activity_timeline(&events, &filters(), None, 10, "ethereum");

    let actors: Vec<&str> = timeline.iter().map(|e| e.actor.as_str()).collect();
    assert_eq!(actors, vec!["bob", "amy", "amy"]);
    assert!(timeline[0].link.ends_with("#pullrequestreview-900"));
    assert!(timeline[1].link.ends_with("#issuecomment-800"));
    assert_eq!(timeline[2].link, "https://github.com/ethereum/eips/pull/7");
}

#[test]
fn review_event_without_external_id_links_to_pr_root() {
    let review = activity("bob", Some("REVIEWER"), "APPROVED", "eips", 7, at(2024, 1, 3));
    assert_eq!(
        event_link("ethereum", &review),
        "https://github.com/ethereum/eips/pull/7"
    );
}
