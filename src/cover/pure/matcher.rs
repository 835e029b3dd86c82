//! Classify JSON nodes relative to a target identifier
//!
//! Identifiers are compared as exact strings, no normalization.

use super::walker::nodes;
use crate::cover::types::{CoverRules, MatchPool};
use serde_json::Value;
use std::borrow::Cow;

/// String form of a non-container value (`None` for objects and arrays)
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null => Some(Cow::Borrowed("null")),
        Value::Object(_) | Value::Array(_) => None,
    }
}

/// A mapping with an identifier key whose value equals `gid`
pub fn is_exact_match(node: &Value, gid: &str, rules: &CoverRules) -> bool {
    let Some(map) = node.as_object() else {
        return false;
    };

    rules.id_keys.iter().any(|key| {
        map.get(key)
            .and_then(scalar_text)
            .is_some_and(|text| text == gid)
    })
}

/// `gid` appears somewhere inside the node
pub fn is_fuzzy_match(node: &Value, gid: &str) -> bool {
    nodes(node).any(|leaf| match leaf {
        Value::String(s) => s.contains(gid),
        Value::Object(_) | Value::Array(_) => false,
        other => scalar_text(other).is_some_and(|text| text == gid),
    })
}

/// Pool for a container node; scalars and non-matching nodes get `None`
pub fn classify(node: &Value, gid: &str, rules: &CoverRules) -> Option<MatchPool> {
    if !node.is_object() && !node.is_array() {
        return None;
    }
    if is_exact_match(node, gid, rules) {
        Some(MatchPool::Exact)
    } else if is_fuzzy_match(node, gid) {
        Some(MatchPool::Fuzzy)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_on_string_id() {
        let rules = CoverRules::default();
        let node = json!({"appName": "Fortnite", "title": "x"});
        assert!(is_exact_match(&node, "Fortnite", &rules));
        assert!(!is_exact_match(&node, "fortnite", &rules));
    }

    #[test]
    fn test_exact_on_numeric_id() {
        let rules = CoverRules::default();
        let node = json!({"appid": 1245620});
        assert!(is_exact_match(&node, "1245620", &rules));
    }

    #[test]
    fn test_exact_ignores_non_id_keys() {
        let rules = CoverRules::default();
        let node = json!({"title": "123"});
        assert!(!is_exact_match(&node, "123", &rules));
        assert_eq!(classify(&node, "123", &rules), Some(MatchPool::Fuzzy));
    }

    #[test]
    fn test_fuzzy_substring_and_scalar_equality() {
        assert!(is_fuzzy_match(&json!({"path": "/games/abc123/x"}), "abc123"));
        assert!(is_fuzzy_match(&json!([1, [2, 42]]), "42"));
        assert!(!is_fuzzy_match(&json!([1, [2, 420]]), "42"));
        assert!(!is_fuzzy_match(&json!({"other": "nothing"}), "42"));
    }

    #[test]
    fn test_scalars_are_never_classified() {
        let rules = CoverRules::default();
        assert_eq!(classify(&json!("abc"), "abc", &rules), None);
        assert_eq!(classify(&json!(7), "7", &rules), None);
    }

    #[test]
    fn test_exact_takes_precedence() {
        let rules = CoverRules::default();
        let node = json!({"app_name": "g1", "description": "g1 is great"});
        assert_eq!(classify(&node, "g1", &rules), Some(MatchPool::Exact));
    }
}
