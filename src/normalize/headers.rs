use std::collections::BTreeMap;

use regex::Regex;

/// Picks the header that best matches one logical field.
///
/// Tiers run strictly in order (exact, whole-word, substring); within a tier
/// synonyms are tried in priority order and headers in column order, and the
/// first hit wins. Headers are never consumed, so two fields may share one.
pub fn resolve_header<'h>(headers: &'h [String], synonyms: &[String]) -> Option<&'h str> {
    let synonyms = synonyms
        .iter()
        .map(|synonym| synonym.trim().to_lowercase())
        .filter(|synonym| !synonym.is_empty())
        .collect::<Vec<String>>();
    let lowered = headers
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect::<Vec<String>>();

    for synonym in &synonyms {
        if let Some(index) = lowered.iter().position(|header| header == synonym) {
            return Some(headers[index].as_str());
        }
    }

    for synonym in &synonyms {
        let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(synonym))) else {
            continue;
        };
        if let Some(index) = headers.iter().position(|header| pattern.is_match(header)) {
            return Some(headers[index].as_str());
        }
    }

    for synonym in &synonyms {
        if let Some(index) = lowered.iter().position(|header| header.contains(synonym.as_str())) {
            return Some(headers[index].as_str());
        }
    }

    None
}

/// Logical field to chosen header, computed once per header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolution<F: Ord> {
    resolved: BTreeMap<F, String>,
    unresolved: Vec<F>,
}

impl<F: Ord + Copy> FieldResolution<F> {
    pub fn resolve<'s>(
        headers: &[String],
        fields: &[F],
        synonyms_for: impl Fn(F) -> &'s [String],
    ) -> Self {
        let mut resolved = BTreeMap::new();
        let mut unresolved = Vec::new();

        for field in fields {
            match resolve_header(headers, synonyms_for(*field)) {
                Some(header) => {
                    resolved.insert(*field, header.to_string());
                }
                None => unresolved.push(*field),
            }
        }

        Self {
            resolved,
            unresolved,
        }
    }

    pub fn header(&self, field: F) -> Option<&str> {
        self.resolved.get(&field).map(String::as_str)
    }

    pub fn resolved(&self) -> impl Iterator<Item = (F, &str)> {
        self.resolved
            .iter()
            .map(|(field, header)| (*field, header.as_str()))
    }

    pub fn unresolved(&self) -> &[F] {
        &self.unresolved
    }
}
