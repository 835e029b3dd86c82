//! Depth-first, pre-order traversal of a JSON value
//!
//! Each call to [`walk`] starts a fresh traversal with its own stack, so the
//! same document can be walked any number of times, including from inside
//! another walk.

use crate::cover::types::{JsonPath, PathSegment};
use serde_json::Value;

pub struct Walk<'a> {
    stack: Vec<(JsonPath, &'a Value)>,
}

/// Walk `value` and every descendant, parents before children
pub fn walk(value: &Value) -> Walk<'_> {
    walk_from(value, Vec::new())
}

/// Walk with paths prefixed by `start`
pub fn walk_from(value: &Value, start: JsonPath) -> Walk<'_> {
    Walk {
        stack: vec![(start, value)],
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (JsonPath, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;

        // Children are pushed in reverse so the first child is visited next
        match node {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    let mut child_path = path.clone();
                    child_path.push(PathSegment::Key(key.clone()));
                    self.stack.push((child_path, child));
                }
            }
            Value::Array(items) => {
                for (idx, child) in items.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(PathSegment::Index(idx));
                    self.stack.push((child_path, child));
                }
            }
            _ => {}
        }

        Some((path, node))
    }
}

/// Iterate nodes only, skipping path bookkeeping
pub fn nodes(value: &Value) -> impl Iterator<Item = &Value> {
    let mut stack = vec![value];
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        match node {
            Value::Object(map) => stack.extend(map.values().rev()),
            Value::Array(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
        Some(node)
    })
}
