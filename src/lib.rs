pub mod analytics;
pub mod api;
pub mod authors;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod search;
pub mod store;
pub mod tables;

pub use error::InsightError;
