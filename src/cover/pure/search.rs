//! Remote search helpers: term derivation, result choice, image response parsing

use crate::cover::types::SearchAlias;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// One entry of an autocomplete response
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The most specific alias whose conditions all hold for `normalized`
pub fn applicable_alias<'a>(normalized: &str, aliases: &'a [SearchAlias]) -> Option<&'a SearchAlias> {
    aliases
        .iter()
        .filter(|a| a.applies_to(normalized))
        .fold(None, |best: Option<&SearchAlias>, a| match best {
            Some(b) if b.when_name_contains.len() >= a.when_name_contains.len() => Some(b),
            _ => Some(a),
        })
}

/// Search term sent to the autocomplete endpoint
///
/// An alias term wins; otherwise the first word of the name.
pub fn search_term(normalized: &str, alias: Option<&SearchAlias>) -> String {
    alias.and_then(|a| a.search_term.clone()).unwrap_or_else(|| {
        normalized
            .split_whitespace()
            .next()
            .unwrap_or(normalized)
            .to_string()
    })
}

fn title_has_all(title: &str, needles: &[String]) -> bool {
    !needles.is_empty() && needles.iter().all(|n| title.contains(&n.to_lowercase()))
}

/// Pick a search result: first hit, unless the alias carries title rules
pub fn pick_result(hits: &[SearchHit], alias: Option<&SearchAlias>) -> Option<u64> {
    let Some(alias) = alias.filter(|a| a.has_title_rules()) else {
        return hits.first().map(|h| h.id);
    };

    let titled: Vec<(String, u64)> = hits.iter().map(|h| (h.name.to_lowercase(), h.id)).collect();
    titled
        .iter()
        .find(|(title, _)| title_has_all(title, &alias.preferred_title))
        .or_else(|| {
            titled
                .iter()
                .find(|(title, _)| title_has_all(title, &alias.fallback_title))
        })
        .map(|(_, id)| *id)
}

fn score_of(item: &Value) -> f64 {
    item.get("score").and_then(Value::as_f64).unwrap_or(0.0)
}

/// URL of the best image in a grids/heroes response
///
/// With `require_success` the document must carry `"success": true`.
/// `data` may be a single image object or a list; lists are ranked by
/// `score`, highest first, keeping response order among equal scores.
pub fn best_image_url(response: &Value, require_success: bool) -> Option<String> {
    if require_success && response.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }

    match response.get("data")? {
        Value::Object(single) => single.get("url")?.as_str().map(str::to_string),
        Value::Array(items) => {
            let mut ranked: Vec<&Value> = items.iter().collect();
            ranked.sort_by(|a, b| {
                score_of(b)
                    .partial_cmp(&score_of(a))
                    .unwrap_or(Ordering::Equal)
            });
            ranked
                .first()
                .and_then(|top| top.get("url"))
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
        }
        _ => None,
    }
}

/// Autocomplete `data` array, tolerant of missing or malformed entries
pub fn parse_hits(response: &Value) -> Vec<SearchHit> {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
