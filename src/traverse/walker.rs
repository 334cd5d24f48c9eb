//! Stack-based document walker

use super::types::{Leaf, Trail, TrailToken};
use crate::types::JsonValue;

/// Lazy depth-first walk yielding scalar leaves in document order
///
/// Objects are visited in declared key order, arrays in index order.
/// Empty objects and arrays produce nothing. An explicit stack is used
/// so deeply nested documents cannot exhaust the call stack.
#[derive(Debug, Clone)]
pub struct Traverser<'a> {
    stack: Vec<(Trail, Option<&'a str>, &'a JsonValue)>,
}

impl<'a> Traverser<'a> {
    /// Walk `data` starting from the root sentinel trail
    pub fn new(data: &'a JsonValue) -> Self {
        Self::with_trail(data, Trail::root())
    }

    /// Walk `data` starting from an explicit trail
    pub fn with_trail(data: &'a JsonValue, trail: Trail) -> Self {
        Self {
            stack: vec![(trail, None, data)],
        }
    }
}

impl<'a> Iterator for Traverser<'a> {
    type Item = Leaf<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((trail, key, value)) = self.stack.pop() {
            match value {
                JsonValue::Object(map) => {
                    // Pushed in reverse so the first key is popped first
                    for (k, v) in map.iter().rev() {
                        self.stack.push((
                            trail.child(TrailToken::key(k.as_str())),
                            Some(k.as_str()),
                            v,
                        ));
                    }
                }
                JsonValue::Array(items) => {
                    for (i, v) in items.iter().enumerate().rev() {
                        self.stack.push((trail.child(TrailToken::index(i)), None, v));
                    }
                }
                _ => return Some(Leaf { trail, key, value }),
            }
        }
        None
    }
}

/// Traverse a document's data tree (convenience function)
pub fn traverse(data: &JsonValue) -> Traverser<'_> {
    Traverser::new(data)
}
