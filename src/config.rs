use serde::{Deserialize, Serialize};
use std::env;

use crate::error::InsightError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub github_org: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, InsightError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/eips_insight".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| InsightError::Config(format!("invalid SERVER_PORT: {}", e)))?;

        let github_org = env::var("GITHUB_ORG").unwrap_or_else(|_| "ethereum".to_string());

        Ok(AppConfig {
            database_url,
            server_host,
            server_port,
            github_org,
        })
    }
}
