//! Candidate screening for generator output.
//!
//! The generator returns untyped JSON candidates. Each one is validated
//! against the per-category requirements; candidates with unrecoverable
//! problems are dropped, while repairable issues (placeholder or relative
//! URLs) are fixed in place with a deterministic fallback. Only candidates
//! that survive screening are deserialized into typed [`Card`]s.

use crate::cards::Card;
use crate::types::Category;
use serde_json::Value;
use url::Url;

const MAX_TAGLINE_LENGTH: usize = 100;
const MIN_EXPLAINER_LENGTH: usize = 50;

/// Outcome of validating one candidate. Errors drop the candidate; warnings
/// are logged and the candidate is kept.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn non_empty_string(candidate: &Value, field: &str) -> bool {
    candidate
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn non_empty_array(candidate: &Value, field: &str) -> bool {
    candidate
        .get(field)
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty())
}

fn valid_ticker(ticker: &str) -> bool {
    (1..=5).contains(&ticker.len()) && ticker.bytes().all(|b| b.is_ascii_uppercase())
}

/// Whether a URL string is a well-formed absolute http(s) URL.
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Deterministic fallback for a broken link: a search URL for the given query.
pub fn fallback_search_url(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://www.google.com/search?q={encoded}")
}

/// Validate one raw candidate against the requirements for `category`.
pub fn validate_candidate(candidate: &Value, category: Category) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in ["title", "tagline", "simpleExplainer"] {
        if !non_empty_string(candidate, field) {
            report.errors.push(format!("missing {field}"));
        }
    }
    for field in ["goodReasons", "concerns"] {
        if !non_empty_array(candidate, field) {
            report.errors.push(format!("missing {field}"));
        }
    }

    match category {
        Category::Stock => {
            match candidate.get("ticker").and_then(Value::as_str) {
                None | Some("") => report.errors.push("missing ticker".to_string()),
                Some(ticker) if !valid_ticker(ticker) => {
                    report.errors.push(format!("invalid ticker format: {ticker}"));
                }
                Some(_) => {}
            }
            if !non_empty_string(candidate, "price") {
                report.warnings.push("missing price".to_string());
            }
        }
        Category::Idea => {
            if !non_empty_string(candidate, "investmentRange") {
                report.warnings.push("missing investment range".to_string());
            }
            if !non_empty_string(candidate, "category") {
                report.warnings.push("missing category label".to_string());
            }
        }
    }

    if let Some(tagline) = candidate.get("tagline").and_then(Value::as_str)
        && tagline.len() > MAX_TAGLINE_LENGTH
    {
        report
            .warnings
            .push(format!("tagline too long (>{MAX_TAGLINE_LENGTH} chars)"));
    }
    if let Some(explainer) = candidate.get("simpleExplainer").and_then(Value::as_str)
        && explainer.len() < MIN_EXPLAINER_LENGTH
    {
        report
            .warnings
            .push(format!("explainer too short (<{MIN_EXPLAINER_LENGTH} chars)"));
    }

    for (field, idx, url) in link_urls(candidate) {
        if !is_valid_url(url) {
            report
                .warnings
                .push(format!("invalid {field} URL at index {idx}"));
        }
    }

    report
}

fn link_urls(candidate: &Value) -> Vec<(&'static str, usize, &str)> {
    let mut urls = Vec::new();
    for field in ["sources", "getStarted"] {
        if let Some(entries) = candidate.get(field).and_then(Value::as_array) {
            for (idx, entry) in entries.iter().enumerate() {
                let url = entry.get("url").and_then(Value::as_str).unwrap_or("");
                urls.push((field, idx, url));
            }
        }
    }
    urls
}

/// Replace broken link URLs in place with the deterministic fallback.
///
/// Sources fall back to a search for the card itself (title, then ticker);
/// get-started tools fall back to a search for the tool name.
pub fn repair_urls(candidate: &mut Value) {
    let card_query = candidate
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| candidate.get("ticker").and_then(Value::as_str))
        .unwrap_or("investment")
        .to_string();

    if let Some(sources) = candidate.get_mut("sources").and_then(Value::as_array_mut) {
        for source in sources {
            repair_entry_url(source, &card_query);
        }
    }
    if let Some(tools) = candidate.get_mut("getStarted").and_then(Value::as_array_mut) {
        for tool in tools {
            let query = tool
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or("investment platform")
                .to_string();
            repair_entry_url(tool, &query);
        }
    }
}

fn repair_entry_url(entry: &mut Value, query: &str) {
    let broken = entry
        .get("url")
        .and_then(Value::as_str)
        .is_none_or(|url| !is_valid_url(url));
    if broken
        && let Some(obj) = entry.as_object_mut()
    {
        tracing::warn!(query, "repairing broken card link");
        obj.insert("url".to_string(), Value::String(fallback_search_url(query)));
    }
}

/// Screen a raw batch: drop invalid candidates, repair the survivors' links,
/// and deserialize them into typed cards. The returned vector may be empty.
pub fn screen_batch(raw: Vec<Value>, category: Category) -> Vec<Card> {
    let total = raw.len();
    let mut cards = Vec::with_capacity(total);

    for (idx, mut candidate) in raw.into_iter().enumerate() {
        let report = validate_candidate(&candidate, category);
        if !report.is_valid() {
            tracing::warn!(index = idx, errors = ?report.errors, "dropping invalid card candidate");
            continue;
        }
        if !report.warnings.is_empty() {
            tracing::debug!(index = idx, warnings = ?report.warnings, "card candidate warnings");
        }

        repair_urls(&mut candidate);

        // The tag is authoritative: the request decides the category, not the
        // generator's echo of it.
        if let Some(obj) = candidate.as_object_mut() {
            obj.insert(
                "type".to_string(),
                Value::String(category.as_str().to_string()),
            );
        }

        match serde_json::from_value::<Card>(candidate) {
            Ok(card) => cards.push(card),
            Err(err) => {
                tracing::warn!(index = idx, %err, "dropping card candidate that failed to deserialize");
            }
        }
    }

    tracing::debug!(valid = cards.len(), total, "screened generated batch");
    cards
}
