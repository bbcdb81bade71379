use crate::error::InsightError;
use serde::{Deserialize, Serialize};

/// Caller-supplied repository selector. Unlike [`RepoGroup`], which
/// normalizes whatever strings the ingestion pipeline recorded, an
/// unrecognized selector here is a caller mistake and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoFilter {
    Eips,
    Ercs,
    Rips,
    All,
}

impl RepoFilter {
    pub fn parse(raw: &str) -> Result<Self, InsightError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eips" => Ok(Self::Eips),
            "ercs" => Ok(Self::Ercs),
            "rips" => Ok(Self::Rips),
            "all" | "" => Ok(Self::All),
            other => Err(InsightError::InvalidFilter(format!(
                "unknown repository key '{}', expected eips|ercs|rips|all",
                other
            ))),
        }
    }

    pub fn matches(&self, repository: &str) -> bool {
        match self {
            Self::All => true,
            Self::Eips => RepoGroup::from_repository(repository) == RepoGroup::Eips,
            Self::Ercs => RepoGroup::from_repository(repository) == RepoGroup::Ercs,
            Self::Rips => RepoGroup::from_repository(repository) == RepoGroup::Rips,
        }
    }
}

impl Default for RepoFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Data-side repository grouping. Repository strings in the event log are
/// messy ("ethereum/EIPs", "eips", "ERCs", ...); anything we cannot place
/// lands in `Unknown` rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoGroup {
    Eips,
    Ercs,
    Rips,
    Unknown,
}

impl RepoGroup {
    pub fn from_repository(repository: &str) -> Self {
        let lower = repository.to_ascii_lowercase();
        let tail = lower.rsplit('/').next().unwrap_or(&lower);
        match tail {
            "eips" | "eip" => Self::Eips,
            "ercs" | "erc" => Self::Ercs,
            "rips" | "rip" => Self::Rips,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eips => "eips",
            Self::Ercs => "ercs",
            Self::Rips => "rips",
            Self::Unknown => "unknown",
        }
    }
}

/// Canonical filter set handed to every aggregator. Absent or empty values
/// always mean "no restriction", never "match nothing"; that defaulting
/// happens once here so call sites do not re-implement it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub repo: RepoFilter,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub day_threshold: Option<i64>,
}

impl Filters {
    pub fn normalize(mut self) -> Result<Self, InsightError> {
        self.statuses.retain(|s| !s.trim().is_empty());
        self.types.retain(|s| !s.trim().is_empty());
        self.categories.retain(|s| !s.trim().is_empty());

        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                return Err(InsightError::InvalidFilter(format!(
                    "year range {}..{} has from > to",
                    from, to
                )));
            }
        }

        Ok(self)
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        if let Some(from) = self.year_from {
            if year < from {
                return false;
            }
        }
        if let Some(to) = self.year_to {
            if year > to {
                return false;
            }
        }
        true
    }

    fn list_matches(list: &[String], value: &str) -> bool {
        list.is_empty() || list.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    pub fn status_matches(&self, status: &str) -> bool {
        Self::list_matches(&self.statuses, status)
    }

    pub fn type_matches(&self, proposal_type: &str) -> bool {
        Self::list_matches(&self.types, proposal_type)
    }

    pub fn category_matches(&self, category: Option<&str>) -> bool {
        self.categories.is_empty()
            || category.is_some_and(|c| Self::list_matches(&self.categories, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_filter_rejects_unknown_keys() {
        assert!(RepoFilter::parse("eips").is_ok());
        assert!(RepoFilter::parse("ALL").is_ok());
        assert!(matches!(
            RepoFilter::parse("bips"),
            Err(InsightError::InvalidFilter(_))
        ));
    }

    #[test]
    fn repo_group_normalizes_messy_strings() {
        assert_eq!(RepoGroup::from_repository("ethereum/EIPs"), RepoGroup::Eips);
        assert_eq!(RepoGroup::from_repository("ERCs"), RepoGroup::Ercs);
        assert_eq!(RepoGroup::from_repository("rip"), RepoGroup::Rips);
        assert_eq!(
            RepoGroup::from_repository("something-else"),
            RepoGroup::Unknown
        );
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let filters = Filters {
            year_from: Some(2024),
            year_to: Some(2020),
            ..Filters::default()
        };
        assert!(matches!(
            filters.normalize(),
            Err(InsightError::InvalidFilter(_))
        ));
    }

    #[test]
    fn empty_lists_are_unrestricted() {
        let filters = Filters::default().normalize().unwrap();
        assert!(filters.status_matches("Draft"));
        assert!(filters.category_matches(None));
        assert!(filters.year_in_range(1999));
    }
}
