use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use super::{parse_filters, parse_number, parse_repo, AppState, Params};
use crate::error::InsightError;
use crate::export::CsvDocument;
use crate::filters::Filters;
use crate::store::models::Proposal;
use crate::tables::{
    list_rips, list_standards, Page, RipRow, RipSort, SortDirection, StandardRow, StandardSort,
};

const DEFAULT_PAGE_SIZE: u64 = 25;

struct TableParams {
    filters: Filters,
    search: Option<String>,
    sort: String,
    direction: SortDirection,
    page: u64,
    page_size: u64,
}

fn parse_table_params(params: &Params) -> Result<TableParams, InsightError> {
    Ok(TableParams {
        filters: parse_filters(params)?,
        search: params.get("search").cloned(),
        sort: params.get("sort").cloned().unwrap_or_default(),
        direction: SortDirection::coerce(params.get("direction").map(String::as_str).unwrap_or("")),
        page: parse_number(params, "page")?.unwrap_or(1),
        page_size: parse_number(params, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE),
    })
}

pub async fn standards(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Page<StandardRow>>, InsightError> {
    let p = parse_table_params(&params)?;
    let proposals = state.store.proposals(p.filters.repo).await?;
    Ok(Json(list_standards(
        &proposals,
        &p.filters,
        p.search.as_deref(),
        StandardSort::coerce(&p.sort),
        p.direction,
        p.page,
        p.page_size,
    )))
}

pub async fn rips(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Page<RipRow>>, InsightError> {
    let p = parse_table_params(&params)?;
    let proposals = state.store.proposals(p.filters.repo).await?;
    Ok(Json(list_rips(
        &proposals,
        &p.filters,
        p.search.as_deref(),
        RipSort::coerce(&p.sort),
        p.direction,
        p.page,
        p.page_size,
    )))
}

fn csv_response(document: CsvDocument, filename: &str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        document.render(),
    )
}

/// Export uses the same filtered row-set as the table, unpaginated, so
/// the CSV matches what the explorer shows.
pub async fn standards_export(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, InsightError> {
    let p = parse_table_params(&params)?;
    let proposals = state.store.proposals(p.filters.repo).await?;
    let page = list_standards(
        &proposals,
        &p.filters,
        p.search.as_deref(),
        StandardSort::coerce(&p.sort),
        p.direction,
        1,
        u64::MAX,
    );
    Ok(csv_response(
        CsvDocument::for_standards(&page.rows),
        "standards.csv",
    ))
}

pub async fn rips_export(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, InsightError> {
    let p = parse_table_params(&params)?;
    let proposals = state.store.proposals(p.filters.repo).await?;
    let page = list_rips(
        &proposals,
        &p.filters,
        p.search.as_deref(),
        RipSort::coerce(&p.sort),
        p.direction,
        1,
        u64::MAX,
    );
    Ok(csv_response(CsvDocument::for_rips(&page.rows), "rips.csv"))
}

pub async fn proposal(
    State(state): State<AppState>,
    Path(number): Path<i64>,
    Query(params): Query<Params>,
) -> Result<Json<Proposal>, InsightError> {
    let repo = parse_repo(&params)?;
    let proposal = state.store.proposal(repo, number).await?;
    Ok(Json(proposal))
}
