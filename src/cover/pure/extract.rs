//! Harvest URL candidates from a matched node
//!
//! Three passes run over every node and their results are merged:
//! 1. direct cover-key fields of the node itself
//! 2. typed image objects under the node's own image-container keys
//! 3. any other URL-shaped string anywhere in the node
//!
//! Passes never filter each other; the rank fields decide later.

use super::walker::nodes;
use crate::cover::types::{CoverRules, UrlCandidate};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(https?|file)://[^\s"'<>]+$"#).expect("url pattern is valid")
});

pub fn looks_like_url(s: &str) -> bool {
    URL_SHAPE.is_match(s.trim())
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(&k.to_lowercase()))
}

fn count_hits(haystack: &str, keywords: &[String]) -> u32 {
    keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count() as u32
}

/// Path portion of a URL: query string and fragment stripped
fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

pub fn has_image_extension(url: &str, rules: &CoverRules) -> bool {
    let path = url_path(url).to_lowercase();
    rules
        .image_extensions
        .iter()
        .any(|ext| path.ends_with(&ext.to_lowercase()))
}

/// Score a URL; rejected URLs (placeholder art) yield `None`
pub fn score_url(
    url: &str,
    epic_type_rank: u8,
    cover_key_hit: bool,
    rules: &CoverRules,
) -> Option<UrlCandidate> {
    let url = url.trim();
    let lower = url.to_lowercase();
    if contains_any(&lower, &rules.reject_keywords) {
        return None;
    }

    Some(UrlCandidate {
        url: url.to_string(),
        epic_type_rank,
        cover_key_hit: cover_key_hit as u8,
        has_image_extension: has_image_extension(url, rules) as u8,
        prefer_score: count_hits(&lower, &rules.prefer_keywords),
        deprioritize_score: -(count_hits(&lower, &rules.deprioritize_keywords) as i32),
    })
}

/// Rank of a typed image object from its `type` field
pub fn type_rank(image_type: &str, rules: &CoverRules) -> u8 {
    if rules.preferred_types.iter().any(|t| t == image_type) {
        return 2;
    }
    let lower = image_type.to_lowercase();
    if contains_any(&lower, &rules.orientation_hints) {
        1
    } else {
        0
    }
}

/// `(url, type)` from an image object carrying both fields
fn typed_image<'a>(obj: &'a Map<String, Value>, rules: &CoverRules) -> Option<(&'a str, &'a str)> {
    let image_type = obj.get("type")?.as_str()?;
    let url = rules
        .image_url_keys
        .iter()
        .filter_map(|k| obj.get(k).and_then(Value::as_str))
        .find(|u| looks_like_url(u))?;
    Some((url, image_type))
}

fn cover_key_pass(node: &Value, rules: &CoverRules, out: &mut Vec<(String, u8, bool)>) {
    let Some(map) = node.as_object() else {
        return;
    };
    for key in &rules.cover_keys {
        if let Some(url) = map.get(key).and_then(Value::as_str)
            && looks_like_url(url)
        {
            out.push((url.to_string(), 0, true));
        }
    }
}

/// Image containers nested deeper may belong to another game's record, so
/// only the node's own keys are read, as for cover keys
fn typed_image_pass(node: &Value, rules: &CoverRules, out: &mut Vec<(String, u8, bool)>) {
    let Some(map) = node.as_object() else {
        return;
    };
    for key in &rules.image_container_keys {
        let members: Vec<&Value> = match map.get(key) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Object(entries)) => entries.values().collect(),
            _ => continue,
        };
        for (url, image_type) in members
            .into_iter()
            .filter_map(Value::as_object)
            .filter_map(|obj| typed_image(obj, rules))
        {
            out.push((url.to_string(), type_rank(image_type, rules), false));
        }
    }
}

fn loose_url_pass(node: &Value, out: &mut Vec<(String, u8, bool)>) {
    for s in nodes(node).filter_map(Value::as_str) {
        if looks_like_url(s) {
            out.push((s.to_string(), 0, false));
        }
    }
}

/// All candidates found in `node`, in pass order
pub fn extract_candidates(node: &Value, rules: &CoverRules) -> Vec<UrlCandidate> {
    let mut raw = Vec::new();
    cover_key_pass(node, rules, &mut raw);
    typed_image_pass(node, rules, &mut raw);

    // The loose pass only contributes URLs the targeted passes missed
    let seen: HashSet<String> = raw.iter().map(|(u, _, _)| u.trim().to_string()).collect();
    let mut loose = Vec::new();
    loose_url_pass(node, &mut loose);
    raw.extend(
        loose
            .into_iter()
            .filter(|(u, _, _)| !seen.contains(u.trim())),
    );

    raw.into_iter()
        .filter_map(|(url, rank, cover_hit)| score_url(&url, rank, cover_hit, rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_shape() {
        assert!(looks_like_url("https://cdn.example.com/a.png"));
        assert!(looks_like_url("HTTP://x/y"));
        assert!(looks_like_url("file:///home/me/cover.jpg"));
        assert!(!looks_like_url("not a url"));
        assert!(!looks_like_url("https://has space/x.png"));
        assert!(!looks_like_url("/absolute/path.png"));
    }

    #[test]
    fn test_extension_ignores_query() {
        let rules = CoverRules::default();
        assert!(has_image_extension("https://x/a.JPG?w=600", &rules));
        assert!(has_image_extension("https://x/a.webp#frag", &rules));
        assert!(!has_image_extension("https://x/a?f=.png", &rules));
    }

    #[test]
    fn test_scores() {
        let rules = CoverRules::default();
        let c = score_url("https://x/cover_tall_logo.png", 0, true, &rules).unwrap();
        assert_eq!(c.cover_key_hit, 1);
        assert_eq!(c.has_image_extension, 1);
        assert_eq!(c.prefer_score, 2);
        assert_eq!(c.deprioritize_score, -1);
    }

    #[test]
    fn test_placeholder_and_default_rejected() {
        let rules = CoverRules::default();
        assert!(score_url("https://x/placeholder.png", 2, true, &rules).is_none());
        assert!(score_url("https://x/Default-Cover.jpg", 0, false, &rules).is_none());
    }

    #[test]
    fn test_type_rank() {
        let rules = CoverRules::default();
        assert_eq!(type_rank("DieselGameBoxTall", &rules), 2);
        assert_eq!(type_rank("SomethingVertical", &rules), 1);
        assert_eq!(type_rank("Logo", &rules), 0);
    }

    #[test]
    fn test_cover_key_is_marked() {
        let rules = CoverRules::default();
        let node = json!({"appName": "123", "art_cover": "https://x/cover.jpg"});
        let found = extract_candidates(&node, &rules);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://x/cover.jpg");
        assert_eq!(found[0].cover_key_hit, 1);
    }

    #[test]
    fn test_typed_images_array_and_map() {
        let rules = CoverRules::default();
        let node = json!({
            "keyImages": [
                {"type": "DieselGameBoxTall", "url": "https://x/a.png"},
                {"type": "Logo", "url": "https://x/b.png"}
            ],
            "media": {"one": {"type": "VerticalArt", "src": "https://x/c.png"}}
        });
        let found = extract_candidates(&node, &rules);
        let rank_of = |u: &str| found.iter().find(|c| c.url == u).map(|c| c.epic_type_rank);
        assert_eq!(rank_of("https://x/a.png"), Some(2));
        assert_eq!(rank_of("https://x/b.png"), Some(0));
        assert_eq!(rank_of("https://x/c.png"), Some(1));
        // no duplicates from the loose pass
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_nested_typed_images_are_loose_only() {
        let rules = CoverRules::default();
        let node = json!({
            "library": [
                {"app_name": "other", "keyImages": [{"type": "DieselGameBoxTall", "url": "https://x/o.png"}]}
            ]
        });
        let found = extract_candidates(&node, &rules);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://x/o.png");
        assert_eq!(found[0].epic_type_rank, 0);
    }

    #[test]
    fn test_image_object_without_type_is_loose_only() {
        let rules = CoverRules::default();
        let node = json!({"images": [{"url": "https://x/untyped.png"}]});
        let found = extract_candidates(&node, &rules);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].epic_type_rank, 0);
        assert_eq!(found[0].cover_key_hit, 0);
    }

    #[test]
    fn test_cover_keys_are_direct_only() {
        let rules = CoverRules::default();
        let node = json!({"child": {"art_cover": "https://x/nested.jpg"}});
        let found = extract_candidates(&node, &rules);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cover_key_hit, 0);
    }
}
