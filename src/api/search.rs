use axum::extract::{Query, State};
use axum::Json;
use serde_json::json;

use super::{parse_limit, parse_repo, AppState, Params};
use crate::error::InsightError;
use crate::search as scorer;

const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Combined search over proposals, authors, and pull requests. PR search
/// only runs when the query resembles a PR reference.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<serde_json::Value>, InsightError> {
    let query = params
        .get("q")
        .map(String::as_str)
        .unwrap_or("")
        .to_string();
    let repo = parse_repo(&params)?;
    let limit = parse_limit(&params, DEFAULT_SEARCH_LIMIT)?;

    let proposals = state.store.proposals(repo).await?;
    let proposal_hits = scorer::search_proposals(&proposals, &query, limit);
    let author_hits = scorer::search_authors(&proposals, &query);

    let pr_hits = if scorer::looks_like_pr_query(&query) {
        let pull_requests = state.store.pull_requests(repo).await?;
        scorer::search_pull_requests(&pull_requests, &query, limit)
    } else {
        Vec::new()
    };

    Ok(Json(json!({
        "proposals": proposal_hits,
        "authors": author_hits,
        "pull_requests": pr_hits,
    })))
}
