//! Header normalization.

use std::collections::BTreeSet;

/// Trim a header cell, strip a stray BOM and collapse inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Name blank headers `Unnamed: {idx}` and suffix repeated names with `.1`, `.2`, ...
pub(crate) fn disambiguate_headers(raw: &[String]) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, value) in raw.iter().enumerate() {
        let base = if value.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            value.clone()
        };
        let mut name = base.clone();
        let mut counter = 1usize;
        while seen.contains(&name) {
            name = format!("{base}.{counter}");
            counter += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("  company   name "), "company name");
        assert_eq!(normalize_header("\u{feff}id"), "id");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn blank_headers_are_named_by_position() {
        let headers = disambiguate_headers(&owned(&["", "id", ""]));
        assert_eq!(headers, owned(&["Unnamed: 0", "id", "Unnamed: 2"]));
    }

    #[test]
    fn repeated_headers_get_suffixes() {
        let headers = disambiguate_headers(&owned(&["a", "a", "b", "a"]));
        assert_eq!(headers, owned(&["a", "a.1", "b", "a.2"]));
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let headers = disambiguate_headers(&owned(&["a", "a.1", "a"]));
        assert_eq!(headers, owned(&["a", "a.1", "a.2"]));
    }
}
