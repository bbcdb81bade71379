mod common;
use common::*;

use eips_insight::export::CsvDocument;
use eips_insight::filters::Filters;
use eips_insight::store::models::Proposal;
use eips_insight::tables::{
    list_rips, list_standards, RipSort, SortDirection, StandardSort,
};

fn filters() -> Filters {
    Filters::default().normalize().unwrap()
}

fn fixture(count: i64) -> Vec<Proposal> {
    (1..=count)
        .map(|n| {
            let status = if n % 2 == 0 { "Final" } else { "Draft" };
            proposal("eips", n, &format!("Proposal {}", n), status)
        })
        .collect()
}

#[test]
fn page_sizes_sum_to_total() {
    let proposals = fixture(23);
    let page_size = 7;
    let first = list_standards(
        &proposals,
        &filters(),
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        page_size,
    );

    assert_eq!(first.total, 23);
    assert_eq!(first.total_pages, 4);

    let mut seen = 0;
    for page in 1..=first.total_pages {
        let p = list_standards(
            &proposals,
            &filters(),
            None,
            StandardSort::Number,
            SortDirection::Asc,
            page,
            page_size,
        );
        seen += p.rows.len() as u64;
    }
    assert_eq!(seen, first.total);
}

#[test]
fn unknown_sort_column_coerces_to_number() {
    assert_eq!(StandardSort::coerce("not-a-column"), StandardSort::Number);
    assert_eq!(StandardSort::coerce(""), StandardSort::Number);
    assert_eq!(StandardSort::coerce("title"), StandardSort::Title);

    // The RIP whitelist is narrower: "category" is valid for standards
    // but falls back for RIP-like rows.
    assert_eq!(RipSort::coerce("category"), RipSort::Number);
    assert_eq!(RipSort::coerce("status"), RipSort::Status);
}

#[test]
fn status_filter_is_or_within_field() {
    let proposals = fixture(10);
    let f = Filters {
        statuses: vec!["Draft".to_string(), "Final".to_string()],
        ..Filters::default()
    }
    .normalize()
    .unwrap();

    let page = list_standards(
        &proposals,
        &f,
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(page.total, 10);

    let only_draft = Filters {
        statuses: vec!["Draft".to_string()],
        ..Filters::default()
    }
    .normalize()
    .unwrap();
    let page = list_standards(
        &proposals,
        &only_draft,
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(page.total, 5);
}

#[test]
fn year_range_bounds_are_inclusive_and_optional() {
    let proposals = vec![
        proposal_created("eips", 1, at(2018, 3, 1)),
        proposal_created("eips", 2, at(2020, 3, 1)),
        proposal_created("eips", 3, at(2022, 3, 1)),
    ];

    let f = Filters {
        year_from: Some(2018),
        year_to: Some(2020),
        ..Filters::default()
    }
    .normalize()
    .unwrap();
    let page = list_standards(
        &proposals,
        &f,
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(page.total, 2);

    let open_ended = Filters {
        year_from: Some(2020),
        ..Filters::default()
    }
    .normalize()
    .unwrap();
    let page = list_standards(
        &proposals,
        &open_ended,
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(page.total, 2);
}

#[test]
fn free_text_search_matches_number_title_author() {
    let mut proposals = fixture(5);
    proposals[2].title = "Unique needle title".to_string();

    let by_title = list_standards(
        &proposals,
        &filters(),
        Some("needle"),
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(by_title.total, 1);
    assert_eq!(by_title.rows[0].number, 3);

    let by_number = list_standards(
        &proposals,
        &filters(),
        Some("4"),
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(by_number.total, 1);

    let by_author = list_standards(
        &proposals,
        &filters(),
        Some("@alice"),
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    assert_eq!(by_author.total, 5);
}

#[test]
fn descending_sort_reverses_order() {
    let proposals = fixture(5);
    let page = list_standards(
        &proposals,
        &filters(),
        None,
        StandardSort::Number,
        SortDirection::Desc,
        1,
        100,
    );
    let numbers: Vec<i64> = page.rows.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![5, 4, 3, 2, 1]);
}

#[test]
fn out_of_range_page_is_empty_but_keeps_totals() {
    let proposals = fixture(5);
    let page = list_standards(
        &proposals,
        &filters(),
        None,
        StandardSort::Number,
        SortDirection::Asc,
        99,
        2,
    );
    assert!(page.rows.is_empty());
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn huge_page_params_do_not_overflow() {
    let proposals = fixture(5);
    let page = list_standards(
        &proposals,
        &filters(),
        None,
        StandardSort::Number,
        SortDirection::Asc,
        u64::MAX,
        u64::MAX,
    );
    assert!(page.rows.is_empty());
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, u64::MAX);
}

#[test]
fn export_headers_stay_stable_across_calls() {
    let proposals = fixture(3);
    let page = list_standards(
        &proposals,
        &filters(),
        None,
        StandardSort::Number,
        SortDirection::Asc,
        1,
        100,
    );

    let a = CsvDocument::for_standards(&page.rows);
    let b = CsvDocument::for_standards(&[]);
    assert_eq!(a.headers, b.headers);
    assert_eq!(a.rows.len(), 3);

    let rip_page = list_rips(
        &proposals,
        &filters(),
        None,
        RipSort::Number,
        SortDirection::Asc,
        1,
        100,
    );
    let doc = CsvDocument::for_rips(&rip_page.rows);
    assert_eq!(doc.headers.len(), 6);
}
