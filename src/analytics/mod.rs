//! Metric aggregators. Each is a pure function over rows fetched by the
//! store plus a canonical [`crate::filters::Filters`]; nothing in here
//! touches the database, so every aggregator is testable on fixtures.

pub mod categories;
pub mod funnel;
pub mod governance;
pub mod leaderboard;
pub mod primitives;
pub mod staleness;
pub mod status_matrix;
pub mod trending;
pub mod trends;
