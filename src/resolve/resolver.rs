//! Schema path resolver
//!
//! Object nesting without arrays is namespacing and may be flattened into
//! compound column names. An array boundary always starts a new table,
//! since array elements multiply rows.

use super::types::{Resolved, VALUE_FIELD};
use crate::error::{Error, Result};
use crate::mapping::TosserMap;
use crate::schema::SchemaTable;
use crate::traverse::{Trail, TrailToken};

/// Derives `(table, column, dependencies)` from a trail under a policy
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    policy: &'a TosserMap,
}

/// Accumulated name parts for one trail, collected deep to shallow
#[derive(Debug, Default)]
struct Walk {
    table_parts: Vec<String>,
    column_parts: Vec<String>,
    /// Number of table parts (counted from the deep end) at each boundary
    boundaries: Vec<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(policy: &'a TosserMap) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TosserMap {
        self.policy
    }

    /// Resolve a leaf's trail into its table, column and table chain
    pub fn resolve(&self, trail: &Trail) -> Result<Resolved> {
        let tokens = trail.without_root();

        let (last, rest) = tokens
            .split_last()
            .ok_or_else(|| Error::unsupported(trail.to_string(), "document root is a scalar"))?;

        if rest.is_empty() {
            return match last {
                TrailToken::Key(field) => Ok(Resolved {
                    table: SchemaTable::new(&self.policy.root_table),
                    column: field.clone(),
                    dependencies: Vec::new(),
                }),
                TrailToken::Index(_) => Err(root_array(trail)),
            };
        }

        // The value token names the column unless it is an array element
        let (field, walked) = match last {
            TrailToken::Key(field) => (field.as_str(), rest),
            TrailToken::Index(_) => (VALUE_FIELD, tokens),
        };

        let walk = self.walk(trail, walked)?;
        Ok(self.assemble(walk, field))
    }

    fn walk(&self, trail: &Trail, tokens: &[TrailToken]) -> Result<Walk> {
        let mut walk = Walk::default();
        let mut following_array = false;
        let mut i = tokens.len();

        while i > 0 {
            i -= 1;
            match &tokens[i] {
                TrailToken::Key(key) => {
                    if !self.policy.flatten_objects {
                        walk.table_parts.push(key.clone());
                        walk.boundaries.push(walk.table_parts.len());
                    } else if following_array {
                        walk.table_parts.push(key.clone());
                    } else {
                        walk.column_parts.push(key.clone());
                    }
                }
                TrailToken::Index(_) => {
                    // Nested arrays collapse into one boundary
                    while i > 0 && tokens[i - 1].is_index() {
                        i -= 1;
                    }
                    if i == 0 {
                        return Err(root_array(trail));
                    }
                    i -= 1;
                    let key = tokens[i]
                        .as_key()
                        .ok_or_else(|| root_array(trail))?
                        .to_string();
                    walk.table_parts.push(key);
                    walk.boundaries.push(walk.table_parts.len());
                    following_array = true;

                    if !self.policy.climb_arrays {
                        break;
                    }
                }
            }
        }

        Ok(walk)
    }

    fn assemble(&self, walk: Walk, field: &str) -> Resolved {
        let policy = self.policy;
        let root = SchemaTable::new(&policy.root_table);

        let mut column_parts = walk.column_parts;
        column_parts.reverse();
        column_parts.push(field.to_string());
        let column = policy.join(&column_parts);

        if walk.table_parts.is_empty() {
            return Resolved {
                table: root,
                column,
                dependencies: Vec::new(),
            };
        }

        // Parts are collected deep to shallow; the deepest boundary is the
        // target itself, every shallower one is a dependency
        let mut parts = walk.table_parts;
        parts.reverse();
        let total = parts.len();

        let mut names: Vec<String> = Vec::with_capacity(walk.boundaries.len() + 1);
        names.push(self.table_name(&parts));
        for boundary in &walk.boundaries {
            let shallow_len = total - boundary + 1;
            if shallow_len < total {
                names.push(self.table_name(&parts[..shallow_len]));
            }
        }
        names.push(policy.root_table.clone());

        // Aliasing may fold neighbouring names together
        names.dedup();

        let mut chain: Vec<SchemaTable> = names
            .windows(2)
            .map(|pair| SchemaTable::with_parent(&pair[0], &pair[1]))
            .collect();
        chain.push(root);

        let table = chain.remove(0);
        if table.name == policy.root_table {
            return Resolved {
                table: SchemaTable::new(&policy.root_table),
                column,
                dependencies: Vec::new(),
            };
        }

        Resolved {
            table,
            column,
            dependencies: chain,
        }
    }

    /// Name of a non-root table from its parts
    fn table_name(&self, parts: &[String]) -> String {
        let policy = self.policy;
        let derived = if policy.prefix_root {
            let mut prefixed = Vec::with_capacity(parts.len() + 1);
            prefixed.push(policy.root_table.as_str());
            prefixed.extend(parts.iter().map(String::as_str));
            policy.join(&prefixed)
        } else {
            policy.join(parts)
        };
        policy.alias_table(&derived).to_string()
    }
}

fn root_array(trail: &Trail) -> Error {
    Error::unsupported(trail.to_string(), "root-level arrays are not supported")
}
