//! The query algebra.
//!
//! A [`Query`] is an immutable predicate tree. It knows fields and terms but
//! nothing about any concrete index, so the same tree can be evaluated against
//! many indexes, compared structurally, or serialized.
//!
//! Boolean semantics are set semantics over the index's document universe:
//!
//! ```text
//! And([])   = every document     (identity of intersection)
//! Or([])    = no document        (identity of union)
//! Not(q)    = universe \ q
//! ```
//!
//! # Module Structure
//!
//! - `wildcard`: Validated glob patterns
//! - `builder`: [`FilterBuilder`](builder::FilterBuilder) and the field-scoped constructors

pub mod builder;
pub mod wildcard;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::field::Field;

use wildcard::WildcardPattern;

/// One node of a predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Documents holding exactly `value` in `field`.
    Term { field: Field, value: String },
    /// Documents holding a term of `field` that starts with `value`.
    Prefix { field: Field, value: String },
    /// Documents holding a term of `field` matching `pattern` in full.
    Wildcard {
        field: Field,
        pattern: WildcardPattern,
    },
    /// Intersection of the children.
    And(Vec<Query>),
    /// Union of the children.
    Or(Vec<Query>),
    /// Complement of the child.
    Not(Box<Query>),
}

impl Query {
    pub fn term(field: Field, value: impl Into<String>) -> Self {
        Query::Term {
            field,
            value: value.into(),
        }
    }

    pub fn prefix(field: Field, value: impl Into<String>) -> Self {
        Query::Prefix {
            field,
            value: value.into(),
        }
    }

    pub fn wildcard(field: Field, pattern: WildcardPattern) -> Self {
        Query::Wildcard { field, pattern }
    }

    /// Conjunction of `children`. Nested conjunctions are flattened.
    pub fn and<I: IntoIterator<Item = Query>>(children: I) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Query::And(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        Query::And(flat)
    }

    /// Disjunction of `children`. Nested disjunctions are flattened.
    pub fn or<I: IntoIterator<Item = Query>>(children: I) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Query::Or(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        Query::Or(flat)
    }

    pub fn not(child: Query) -> Self {
        Query::Not(Box::new(child))
    }

    /// A query matching every document.
    pub fn match_all() -> Self {
        Query::And(Vec::new())
    }

    /// A query matching no document.
    pub fn match_none() -> Self {
        Query::Or(Vec::new())
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Query::And(children) if children.is_empty())
    }

    pub fn is_match_none(&self) -> bool {
        matches!(self, Query::Or(children) if children.is_empty())
    }

    /// Depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Query::Term { .. } | Query::Prefix { .. } | Query::Wildcard { .. } => 1,
            Query::And(children) | Query::Or(children) => {
                1 + children.iter().map(Query::depth).max().unwrap_or(0)
            }
            Query::Not(child) => 1 + child.depth(),
        }
    }

    /// Fields referenced anywhere in the tree, sorted and deduplicated.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields.sort();
        fields.dedup();
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a Field>) {
        match self {
            Query::Term { field, .. }
            | Query::Prefix { field, .. }
            | Query::Wildcard { field, .. } => out.push(field),
            Query::And(children) | Query::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            Query::Not(child) => child.collect_fields(out),
        }
    }
}

impl AsRef<Query> for Query {
    fn as_ref(&self) -> &Query {
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term { field, value } => write!(f, "{field}:{}", quote(value)),
            Query::Prefix { field, value } => write!(f, "{field}:{}*", quote(value)),
            Query::Wildcard { field, pattern } => {
                write!(f, "{field}:~{}", quote(pattern.as_str()))
            }
            Query::And(children) if children.is_empty() => f.write_str("ALL"),
            Query::Or(children) if children.is_empty() => f.write_str("NONE"),
            Query::And(children) => write_group(f, children, " AND "),
            Query::Or(children) => write_group(f, children, " OR "),
            Query::Not(child) => write!(f, "NOT {child}"),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Query], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(op)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

/// Quote values that would otherwise be ambiguous in the rendered form.
fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | ':'));
    if plain {
        value.to_string()
    } else {
        format!("{value:?}")
    }
}
