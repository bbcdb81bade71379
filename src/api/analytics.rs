use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::{parse_filters, parse_limit, AppState, Params};
use crate::analytics;
use crate::error::InsightError;
use crate::store::models::Role;

const DEFAULT_TIMELINE_LIMIT: usize = 50;
const DEFAULT_TOP_LABELS_LIMIT: usize = 10;
const DEFAULT_TRENDING_LIMIT: usize = 10;

pub async fn status_matrix(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<analytics::status_matrix::StatusMatrix>, InsightError> {
    let filters = parse_filters(&params)?;
    let proposals = state.store.proposals(filters.repo).await?;
    Ok(Json(analytics::status_matrix::status_matrix(
        &proposals, &filters,
    )))
}

pub async fn category_breakdown(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::categories::CategoryCount>>, InsightError> {
    let filters = parse_filters(&params)?;
    let proposals = state.store.proposals(filters.repo).await?;
    Ok(Json(analytics::categories::category_breakdown(
        &proposals, &filters,
    )))
}

pub async fn creation_trends(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::trends::CreationTrendRow>>, InsightError> {
    let filters = parse_filters(&params)?;
    let proposals = state.store.proposals(filters.repo).await?;
    Ok(Json(analytics::trends::creation_trends(&proposals, &filters)))
}

pub async fn pr_monthly_activity(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::trends::MonthlyActivityRow>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    Ok(Json(analytics::trends::pr_monthly_activity(
        &pull_requests,
        &filters,
        Utc::now(),
    )))
}

pub async fn lifecycle_funnel(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::funnel::FunnelRow>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let activity = state.store.activity_events(filters.repo).await?;
    Ok(Json(analytics::funnel::lifecycle_funnel(
        &pull_requests,
        &activity,
        &filters,
    )))
}

pub async fn time_to_outcome(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::funnel::OutcomeLatency>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let activity = state.store.activity_events(filters.repo).await?;
    Ok(Json(analytics::funnel::time_to_outcome(
        &pull_requests,
        &activity,
        &filters,
    )))
}

pub async fn staleness_buckets(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::staleness::StalenessBucket>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    Ok(Json(analytics::staleness::staleness_buckets(
        &pull_requests,
        &filters,
        Utc::now(),
    )))
}

pub async fn high_risk_stale(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::staleness::HighRiskPr>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let activity = state.store.activity_events(filters.repo).await?;
    let states = state.store.governance_states(filters.repo).await?;
    Ok(Json(analytics::staleness::high_risk_stale(
        &pull_requests,
        &activity,
        &states,
        &filters,
        Utc::now(),
    )))
}

pub async fn governance_distribution(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::governance::StateCount>>, InsightError> {
    let filters = parse_filters(&params)?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let states = state.store.governance_states(filters.repo).await?;
    Ok(Json(analytics::governance::governance_distribution(
        &pull_requests,
        &states,
        &filters,
    )))
}

pub async fn top_labels(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::governance::LabelCount>>, InsightError> {
    let limit = parse_limit(&params, DEFAULT_TOP_LABELS_LIMIT)?;
    let filters = parse_filters(&params)?;
    let label_events = state.store.label_events(filters.repo).await?;
    Ok(Json(analytics::governance::top_labels(
        &label_events,
        &filters,
        limit,
    )))
}

fn parse_role(params: &Params) -> Result<Option<Role>, InsightError> {
    match params.get("role") {
        None => Ok(None),
        Some(raw) => Role::parse(raw)
            .map(Some)
            .ok_or_else(|| InsightError::InvalidFilter(format!("unknown role '{}'", raw))),
    }
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::leaderboard::LeaderboardEntry>>, InsightError> {
    let role = parse_role(&params)?;
    let limit = super::parse_number::<usize>(&params, "limit")?;
    let filters = parse_filters(&params)?;
    let activity = state.store.activity_events(filters.repo).await?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    Ok(Json(analytics::leaderboard::role_leaderboard(
        &activity,
        &pull_requests,
        &filters,
        role,
        limit,
    )))
}

pub async fn timeline(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::leaderboard::TimelineEntry>>, InsightError> {
    let role = parse_role(&params)?;
    let limit = parse_limit(&params, DEFAULT_TIMELINE_LIMIT)?;
    let filters = parse_filters(&params)?;
    let activity = state.store.activity_events(filters.repo).await?;
    Ok(Json(analytics::leaderboard::activity_timeline(
        &activity,
        &filters,
        role,
        limit,
        &state.config.github_org,
    )))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::trending::TrendingProposal>>, InsightError> {
    let limit = parse_limit(&params, DEFAULT_TRENDING_LIMIT)?;
    let filters = parse_filters(&params)?;
    let proposals = state.store.proposals(filters.repo).await?;
    let status_events = state.store.status_events(filters.repo).await?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let activity = state.store.activity_events(filters.repo).await?;
    Ok(Json(analytics::trending::trending(
        &proposals,
        &status_events,
        &pull_requests,
        &activity,
        &filters,
        Utc::now(),
        limit,
    )))
}

pub async fn heatmap(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<analytics::trending::HeatmapRow>>, InsightError> {
    let limit = parse_limit(&params, DEFAULT_TRENDING_LIMIT)?;
    let filters = parse_filters(&params)?;
    let proposals = state.store.proposals(filters.repo).await?;
    let status_events = state.store.status_events(filters.repo).await?;
    let pull_requests = state.store.pull_requests(filters.repo).await?;
    let activity = state.store.activity_events(filters.repo).await?;
    Ok(Json(analytics::trending::activity_heatmap(
        &proposals,
        &status_events,
        &pull_requests,
        &activity,
        &filters,
        Utc::now(),
        limit,
    )))
}

/// One call backing the dashboard page: several independent aggregators
/// fanned out concurrently. A failure in any of them fails the whole
/// response; the caller decides how to render partial-failure states.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<serde_json::Value>, InsightError> {
    let filters = parse_filters(&params)?;
    info!("Dashboard fan-out for repo {:?}", filters.repo);

    let (proposals, status_events, pull_requests, activity) = tokio::try_join!(
        state.store.proposals(filters.repo),
        state.store.status_events(filters.repo),
        state.store.pull_requests(filters.repo),
        state.store.activity_events(filters.repo),
    )?;

    let now = Utc::now();
    Ok(Json(json!({
        "status_matrix": analytics::status_matrix::status_matrix(&proposals, &filters),
        "categories": analytics::categories::category_breakdown(&proposals, &filters),
        "funnel": analytics::funnel::lifecycle_funnel(&pull_requests, &activity, &filters),
        "staleness": analytics::staleness::staleness_buckets(&pull_requests, &filters, now),
        "trending": analytics::trending::trending(
            &proposals,
            &status_events,
            &pull_requests,
            &activity,
            &filters,
            now,
            DEFAULT_TRENDING_LIMIT,
        ),
    })))
}
