//! Trail types
//!
//! A trail is the ordered list of object keys and array positions that
//! lead from the document root to a value.

use crate::types::JsonValue;
use std::fmt;

/// Marker used as the first token of a trail built from a document root
pub const ROOT_SENTINEL: &str = "$";

/// One step of a trail
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrailToken {
    /// An object field name
    Key(String),
    /// An array position
    Index(usize),
}

impl TrailToken {
    /// Create a key token
    pub fn key(name: impl Into<String>) -> Self {
        TrailToken::Key(name.into())
    }

    /// Create an index token
    pub fn index(position: usize) -> Self {
        TrailToken::Index(position)
    }

    /// Field name, if this is a key token
    pub fn as_key(&self) -> Option<&str> {
        match self {
            TrailToken::Key(k) => Some(k),
            TrailToken::Index(_) => None,
        }
    }

    /// Check if this is an index token
    pub fn is_index(&self) -> bool {
        matches!(self, TrailToken::Index(_))
    }
}

impl fmt::Display for TrailToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailToken::Key(k) => f.write_str(k),
            TrailToken::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Ordered path from a document root to a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trail {
    tokens: Vec<TrailToken>,
}

impl Trail {
    /// Create an empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trail holding only the root sentinel
    pub fn root() -> Self {
        Self {
            tokens: vec![TrailToken::key(ROOT_SENTINEL)],
        }
    }

    /// Create a trail from explicit tokens
    pub fn from_tokens(tokens: Vec<TrailToken>) -> Self {
        Self { tokens }
    }

    /// All tokens, root sentinel included
    pub fn tokens(&self) -> &[TrailToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Deepest token
    pub fn last(&self) -> Option<&TrailToken> {
        self.tokens.last()
    }

    /// Check if the first token is the root sentinel
    pub fn has_root_sentinel(&self) -> bool {
        matches!(self.tokens.first(), Some(TrailToken::Key(k)) if k == ROOT_SENTINEL)
    }

    /// Tokens with a leading root sentinel stripped
    pub fn without_root(&self) -> &[TrailToken] {
        if self.has_root_sentinel() {
            &self.tokens[1..]
        } else {
            &self.tokens
        }
    }

    /// Append a token in place
    pub fn push(&mut self, token: TrailToken) {
        self.tokens.push(token);
    }

    /// New trail extended by one token
    #[must_use]
    pub fn child(&self, token: TrailToken) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token);
        Self { tokens }
    }
}

impl From<Vec<TrailToken>> for Trail {
    fn from(tokens: Vec<TrailToken>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                TrailToken::Key(k) if i == 0 => f.write_str(k)?,
                TrailToken::Key(k) => write!(f, ".{k}")?,
                TrailToken::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

/// A scalar value reached by traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<'a> {
    /// Trail from the root to this value, including the value's own token
    pub trail: Trail,
    /// Field name owning the value (`None` for array elements and a scalar root)
    pub key: Option<&'a str>,
    /// The scalar itself
    pub value: &'a JsonValue,
}
