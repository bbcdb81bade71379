//! Normalization of raw proposal author strings.
//!
//! Author fields arrive as free text from proposal front matter: several
//! authors joined by commas or semicolons, each possibly in
//! `Name <email>` or `Name (@handle)` form. Everything downstream
//! (leaderboards, search, per-author counts) works on the discrete
//! identities this module produces.

/// Split a raw author field into discrete identities.
///
/// Per part, the GitHub handle wins if present (kept with its leading `@`),
/// else the name before a `<email>`, else the trimmed part itself.
pub fn normalize_authors(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .filter_map(normalize_author_part)
        .collect()
}

fn normalize_author_part(part: &str) -> Option<String> {
    let part = part.trim();
    if part.is_empty() {
        return None;
    }

    if let Some(open) = part.find("(@") {
        if let Some(close) = part[open..].find(')') {
            let handle = part[open + 1..open + close].trim();
            if handle.len() > 1 {
                return Some(handle.to_string());
            }
        }
    }

    if let Some(angle) = part.find('<') {
        let name = part[..angle].trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
        // "<email>" with no name: fall through to the raw value minus brackets
        let email = part.trim_matches(|c| c == '<' || c == '>').trim();
        if !email.is_empty() {
            return Some(email.to_string());
        }
        return None;
    }

    Some(part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_wins_over_name() {
        assert_eq!(
            normalize_authors("Vitalik Buterin (@vbuterin)"),
            vec!["@vbuterin"]
        );
    }

    #[test]
    fn name_before_email() {
        assert_eq!(
            normalize_authors("Alice Example <alice@example.org>"),
            vec!["Alice Example"]
        );
    }

    #[test]
    fn mixed_separators_and_forms() {
        let raw = "Alice <a@x.org>, Bob (@bob); Carol";
        assert_eq!(normalize_authors(raw), vec!["Alice", "@bob", "Carol"]);
    }

    #[test]
    fn empty_parts_dropped() {
        assert_eq!(normalize_authors(" , ;"), Vec::<String>::new());
        assert_eq!(normalize_authors(""), Vec::<String>::new());
    }

    #[test]
    fn bare_email_keeps_address() {
        assert_eq!(normalize_authors("<a@x.org>"), vec!["a@x.org"]);
    }
}
