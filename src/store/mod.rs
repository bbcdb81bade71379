pub mod models;

use sqlx::PgPool;
use tracing::info;

use crate::error::InsightError;
use crate::filters::RepoFilter;
use models::{ActivityEvent, GovernanceState, LabelEvent, Proposal, PullRequest, StatusEvent};

/// Read-only accessor over the event-sourced governance tables. The
/// ingestion pipeline owns all writes; this layer only fetches rows for
/// the aggregators to reduce in memory.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

/// Postgres regex matching the repository tail for a given selector, or
/// `None` for unrestricted. Mirrors `RepoGroup::from_repository`.
fn repo_pattern(repo: RepoFilter) -> Option<&'static str> {
    match repo {
        RepoFilter::All => None,
        RepoFilter::Eips => Some("(^|/)eips?$"),
        RepoFilter::Ercs => Some("(^|/)ercs?$"),
        RepoFilter::Rips => Some("(^|/)rips?$"),
    }
}

impl Store {
    pub async fn connect(database_url: &str) -> Result<Self, InsightError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Store { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), InsightError> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(&self.pool)
            .await?;
        info!("Database migrations completed");
        Ok(())
    }

    pub async fn proposals(&self, repo: RepoFilter) -> Result<Vec<Proposal>, InsightError> {
        let rows = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT repository, number, title, author, status, proposal_type,
                   category, created_at, updated_at, requires
            FROM proposals
            WHERE ($1::text IS NULL OR repository ~* $1)
            ORDER BY number ASC
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn proposal(
        &self,
        repo: RepoFilter,
        number: i64,
    ) -> Result<Proposal, InsightError> {
        let row = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT repository, number, title, author, status, proposal_type,
                   category, created_at, updated_at, requires
            FROM proposals
            WHERE ($1::text IS NULL OR repository ~* $1) AND number = $2
            ORDER BY repository ASC
            LIMIT 1
            "#,
        )
        .bind(repo_pattern(repo))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| InsightError::NotFound(format!("proposal {} not found", number)))
    }

    pub async fn status_events(&self, repo: RepoFilter) -> Result<Vec<StatusEvent>, InsightError> {
        let rows = sqlx::query_as::<_, StatusEvent>(
            r#"
            SELECT repository, number, from_status, to_status, changed_at
            FROM status_events
            WHERE ($1::text IS NULL OR repository ~* $1)
            ORDER BY changed_at ASC
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn pull_requests(&self, repo: RepoFilter) -> Result<Vec<PullRequest>, InsightError> {
        let rows = sqlx::query_as::<_, PullRequest>(
            r#"
            SELECT repository, pr_number, title, author, state,
                   created_at, merged_at, closed_at
            FROM pull_requests
            WHERE ($1::text IS NULL OR repository ~* $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn activity_events(
        &self,
        repo: RepoFilter,
    ) -> Result<Vec<ActivityEvent>, InsightError> {
        let rows = sqlx::query_as::<_, ActivityEvent>(
            r#"
            SELECT actor, role, event_type, pr_number, repository,
                   occurred_at, external_id
            FROM activity_events
            WHERE ($1::text IS NULL OR repository ~* $1)
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn governance_states(
        &self,
        repo: RepoFilter,
    ) -> Result<Vec<GovernanceState>, InsightError> {
        let rows = sqlx::query_as::<_, GovernanceState>(
            r#"
            SELECT repository, pr_number, state, days_since_last_action
            FROM governance_states
            WHERE ($1::text IS NULL OR repository ~* $1)
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn label_events(&self, repo: RepoFilter) -> Result<Vec<LabelEvent>, InsightError> {
        let rows = sqlx::query_as::<_, LabelEvent>(
            r#"
            SELECT repository, pr_number, label, action, occurred_at
            FROM label_events
            WHERE ($1::text IS NULL OR repository ~* $1)
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(repo_pattern(repo))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
