//! Typed procedure surface. Each handler parses and normalizes its query
//! parameters, fetches rows through the store, runs the pure aggregator,
//! and returns JSON. No aggregation logic lives here.

pub mod analytics;
pub mod search;
pub mod tables;

use axum::routing::get;
use axum::Router;
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::error::InsightError;
use crate::filters::{Filters, RepoFilter};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status-matrix", get(analytics::status_matrix))
        .route("/api/categories", get(analytics::category_breakdown))
        .route("/api/creation-trends", get(analytics::creation_trends))
        .route("/api/pr-monthly-activity", get(analytics::pr_monthly_activity))
        .route("/api/pr-funnel", get(analytics::lifecycle_funnel))
        .route("/api/time-to-outcome", get(analytics::time_to_outcome))
        .route("/api/staleness", get(analytics::staleness_buckets))
        .route("/api/high-risk", get(analytics::high_risk_stale))
        .route(
            "/api/governance-distribution",
            get(analytics::governance_distribution),
        )
        .route("/api/top-labels", get(analytics::top_labels))
        .route("/api/leaderboard", get(analytics::leaderboard))
        .route("/api/timeline", get(analytics::timeline))
        .route("/api/trending", get(analytics::trending))
        .route("/api/heatmap", get(analytics::heatmap))
        .route("/api/dashboard", get(analytics::dashboard))
        .route("/api/search", get(search::search))
        .route("/api/standards", get(tables::standards))
        .route("/api/standards/export", get(tables::standards_export))
        .route("/api/rips", get(tables::rips))
        .route("/api/rips/export", get(tables::rips_export))
        .route("/api/proposals/:number", get(tables::proposal))
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "eips-insight",
        "timestamp": chrono::Utc::now()
    }))
}

/// Raw query-string parameters. Multi-value fields arrive as
/// comma-separated lists; absent means unrestricted.
pub type Params = HashMap<String, String>;

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub fn parse_repo(params: &Params) -> Result<RepoFilter, InsightError> {
    match params.get("repo") {
        Some(raw) => RepoFilter::parse(raw),
        None => Ok(RepoFilter::All),
    }
}

pub fn parse_number<T: std::str::FromStr>(
    params: &Params,
    key: &str,
) -> Result<Option<T>, InsightError> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            InsightError::InvalidFilter(format!("'{}' is not a number for {}", raw, key))
        }),
    }
}

pub fn parse_limit(params: &Params, default: usize) -> Result<usize, InsightError> {
    Ok(parse_number(params, "limit")?.unwrap_or(default))
}

pub fn parse_filters(params: &Params) -> Result<Filters, InsightError> {
    Filters {
        repo: parse_repo(params)?,
        statuses: split_list(params.get("status").map(String::as_str)),
        types: split_list(params.get("type").map(String::as_str)),
        categories: split_list(params.get("category").map(String::as_str)),
        year_from: parse_number(params, "year_from")?,
        year_to: parse_number(params, "year_to")?,
        day_threshold: parse_number(params, "day_threshold")?,
    }
    .normalize()
}
