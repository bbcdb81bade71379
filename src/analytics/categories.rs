use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filters::Filters;
use crate::store::models::Proposal;

/// Normalize a raw category string into the fixed vocabulary the charts
/// group by. Known acronyms keep their casing, known categories are
/// title-cased, anything unrecognized but non-empty is title-cased, and
/// empty or missing becomes "Other". Never errors.
pub fn normalize_category(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return "Other".to_string();
    }
    match raw.to_ascii_lowercase().as_str() {
        "erc" | "ercs" => "ERC".to_string(),
        "eip" | "eips" => "EIP".to_string(),
        "rip" | "rips" => "RIP".to_string(),
        "core" => "Core".to_string(),
        "networking" => "Networking".to_string(),
        "interface" => "Interface".to_string(),
        "meta" => "Meta".to_string(),
        "informational" => "Informational".to_string(),
        other => title_case(other),
    }
}

fn title_case(lower: &str) -> String {
    let mut out = String::with_capacity(lower.len());
    let mut at_word_start = true;
    for c in lower.chars() {
        if c.is_whitespace() || c == '-' {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Proposal counts per normalized category. Raw spellings that collapse to
/// the same key ("erc", "ERCs") have their counts summed.
pub fn category_breakdown(proposals: &[Proposal], filters: &Filters) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for proposal in proposals {
        if !filters.repo.matches(&proposal.repository) {
            continue;
        }
        if !filters.status_matches(&proposal.status)
            || !filters.type_matches(&proposal.proposal_type)
        {
            continue;
        }
        let key = normalize_category(proposal.category.as_deref());
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_spellings_collapse() {
        assert_eq!(normalize_category(Some("ERC")), "ERC");
        assert_eq!(normalize_category(Some("erc")), "ERC");
        assert_eq!(normalize_category(Some("ERCs")), "ERC");
        assert_eq!(normalize_category(Some("core")), "Core");
    }

    #[test]
    fn empty_and_missing_become_other() {
        assert_eq!(normalize_category(None), "Other");
        assert_eq!(normalize_category(Some("  ")), "Other");
    }

    #[test]
    fn unrecognized_is_title_cased() {
        assert_eq!(normalize_category(Some("wallet tooling")), "Wallet Tooling");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["ERC", "erc", "ERCs", "wallet tooling", ""] {
            let once = normalize_category(Some(raw));
            let twice = normalize_category(Some(&once));
            assert_eq!(once, twice);
        }
    }
}
