//! Field-scoped filter constructors.
//!
//! Each predicate family has one constructor returning a [`FilterBuilder`].
//! Field names are fixed by the constructors; there is no way to ask for an
//! arbitrary field string.
//!
//! # Example
//!
//! ```
//! use cmdex::filter;
//!
//! let servers = filter::of_type("http").and(&filter::all_tags(["api", "server"]));
//! let not_deprecated = filter::metadata("deprecated", true).not();
//! let query = servers.and(&not_deprecated).build();
//!
//! assert_eq!(
//!     query.to_string(),
//!     "(type:http AND tags:api AND tags:server AND NOT metadata.deprecated:true)"
//! );
//! ```
//!
//! # Empty argument lists
//!
//! | Constructor | Empty input | Matches |
//! |-------------|-------------|---------|
//! | `of_types`, `tags`, `any_tags` | `Or([])` | nothing |
//! | `all_tags`, `metadata_match` | `And([])` | everything |

use crate::data::MetadataValue;
use crate::error::Result;
use crate::index::field::Field;
use crate::query::Query;
use crate::query::wildcard::WildcardPattern;

/// An immutable filter wrapping a [`Query`].
///
/// Combinators borrow their operands and return a new builder, so a
/// sub-filter can be reused across any number of composed filters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBuilder {
    query: Query,
}

impl FilterBuilder {
    pub fn new(query: Query) -> Self {
        FilterBuilder { query }
    }

    /// A filter matching every document.
    pub fn all() -> Self {
        Self::new(Query::match_all())
    }

    /// A filter matching no document.
    pub fn none() -> Self {
        Self::new(Query::match_none())
    }

    /// Both this filter and `other` must match.
    pub fn and(&self, other: &FilterBuilder) -> FilterBuilder {
        Self::new(Query::and([self.query.clone(), other.query.clone()]))
    }

    /// This filter or `other` must match.
    pub fn or(&self, other: &FilterBuilder) -> FilterBuilder {
        Self::new(Query::or([self.query.clone(), other.query.clone()]))
    }

    /// This filter must not match.
    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> FilterBuilder {
        Self::new(Query::not(self.query.clone()))
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Finish building and take the query.
    pub fn build(self) -> Query {
        self.query
    }
}

impl From<Query> for FilterBuilder {
    fn from(query: Query) -> Self {
        FilterBuilder::new(query)
    }
}

impl From<FilterBuilder> for Query {
    fn from(builder: FilterBuilder) -> Self {
        builder.query
    }
}

impl AsRef<Query> for FilterBuilder {
    fn as_ref(&self) -> &Query {
        &self.query
    }
}

impl std::fmt::Display for FilterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.query.fmt(f)
    }
}

// ============================================================================
// Type
// ============================================================================

/// Descriptors whose type equals `value`.
pub fn of_type(value: impl Into<String>) -> FilterBuilder {
    FilterBuilder::new(Query::term(Field::Type, value))
}

/// Descriptors whose type is any of `values`.
pub fn of_types<I, S>(values: I) -> FilterBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    any_of(Field::Type, values)
}

// ============================================================================
// Tags
// ============================================================================

/// Descriptors carrying `value` as a tag.
pub fn tag(value: impl Into<String>) -> FilterBuilder {
    FilterBuilder::new(Query::term(Field::Tags, value))
}

/// Descriptors carrying any of the tags. Same as [`any_tags`].
pub fn tags<I, S>(values: I) -> FilterBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    any_tags(values)
}

/// Descriptors carrying any of the tags.
pub fn any_tags<I, S>(values: I) -> FilterBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    any_of(Field::Tags, values)
}

/// Descriptors carrying every one of the tags.
pub fn all_tags<I, S>(values: I) -> FilterBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FilterBuilder::new(Query::and(
        values.into_iter().map(|v| Query::term(Field::Tags, v)),
    ))
}

// ============================================================================
// Path and name
// ============================================================================

/// Descriptors whose joined path equals `value` exactly.
pub fn path(value: impl Into<String>) -> FilterBuilder {
    FilterBuilder::new(Query::term(Field::FullPath, value))
}

/// Descriptors whose joined path starts with `value`.
pub fn path_prefix(value: impl Into<String>) -> FilterBuilder {
    FilterBuilder::new(Query::prefix(Field::FullPath, value))
}

/// Descriptors whose joined path matches a glob.
///
/// A pattern without `*` or `?` behaves as [`path_prefix`]. Every other
/// character is literal, so `path_glob(&format!("{p}*"))` matches at least
/// what `path(p)` matches for any path `p`. Returns an error only if the
/// pattern is too large to compile.
pub fn path_glob(pattern: &str) -> Result<FilterBuilder> {
    let pattern = WildcardPattern::new(pattern)?;
    let query = match pattern.as_literal() {
        Some(literal) => Query::prefix(Field::FullPath, literal),
        None => Query::wildcard(Field::FullPath, pattern),
    };
    Ok(FilterBuilder::new(query))
}

/// Descriptors whose leaf name equals `value`.
pub fn name(value: impl Into<String>) -> FilterBuilder {
    FilterBuilder::new(Query::term(Field::Name, value))
}

/// Descriptors whose leaf name matches a glob.
///
/// Returns an error only if the pattern is too large to compile.
pub fn name_pattern(pattern: &str) -> Result<FilterBuilder> {
    let pattern = WildcardPattern::new(pattern)?;
    Ok(FilterBuilder::new(Query::wildcard(Field::Name, pattern)))
}

// ============================================================================
// Metadata
// ============================================================================

/// Descriptors whose metadata `key` has the same canonical form as `value`.
pub fn metadata(key: impl Into<String>, value: impl Into<MetadataValue>) -> FilterBuilder {
    FilterBuilder::new(metadata_term(key.into(), value.into()))
}

/// Descriptors matching every key/value pair.
///
/// Children are ordered by key so that equal mappings build equal queries.
pub fn metadata_match<I, K, V>(pairs: I) -> FilterBuilder
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<MetadataValue>,
{
    let mut pairs: Vec<(String, MetadataValue)> = pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    FilterBuilder::new(Query::and(
        pairs.into_iter().map(|(k, v)| metadata_term(k, v)),
    ))
}

fn metadata_term(key: String, value: MetadataValue) -> Query {
    Query::term(Field::Metadata(key), value.to_string())
}

fn any_of<I, S>(field: Field, values: I) -> FilterBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FilterBuilder::new(Query::or(
        values.into_iter().map(|v| Query::term(field.clone(), v)),
    ))
}
