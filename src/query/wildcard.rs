//! Glob-style wildcard patterns.
//!
//! Supports the following wildcards:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//!
//! Every other character, including `\` and regex metacharacters, is literal.
//! There is no escape syntax, character class or brace expansion. Since `*`
//! and `?` also match themselves, any literal string followed by `*` matches
//! every term starting with that string. Patterns are compiled when they are
//! built; a [`WildcardPattern`] that exists always compiles.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{CmdexError, Result};

/// A validated, compiled wildcard pattern anchored at both ends of the term.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WildcardPattern {
    /// The pattern as written by the caller.
    source: String,
    /// Compiled matcher.
    regex: Arc<Regex>,
    /// Literal text before the first wildcard.
    literal_prefix: String,
    /// Whether the pattern contains `*` or `?`.
    has_wildcards: bool,
}

impl WildcardPattern {
    /// Parse and compile a pattern.
    ///
    /// Returns an error if the compiled matcher would exceed the size limit.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let source = pattern.into();
        let compiled = compile_pattern(&source);
        let regex = RegexBuilder::new(&compiled.regex)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| CmdexError::invalid_pattern(source.as_str(), e.to_string()))?;

        Ok(WildcardPattern {
            source,
            regex: Arc::new(regex),
            literal_prefix: compiled.literal_prefix,
            has_wildcards: compiled.has_wildcards,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Literal text every matching term must start with.
    pub fn literal_prefix(&self) -> &str {
        &self.literal_prefix
    }

    pub fn has_wildcards(&self) -> bool {
        self.has_wildcards
    }

    /// The literal the pattern denotes, if it has no wildcards.
    pub fn as_literal(&self) -> Option<&str> {
        (!self.has_wildcards).then_some(self.literal_prefix.as_str())
    }

    /// Check if a whole term matches the pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for WildcardPattern {}

impl fmt::Debug for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WildcardPattern").field(&self.source).finish()
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for WildcardPattern {
    type Error = CmdexError;

    fn try_from(value: String) -> Result<Self> {
        WildcardPattern::new(value)
    }
}

impl TryFrom<&str> for WildcardPattern {
    type Error = CmdexError;

    fn try_from(value: &str) -> Result<Self> {
        WildcardPattern::new(value)
    }
}

impl From<WildcardPattern> for String {
    fn from(pattern: WildcardPattern) -> Self {
        pattern.source
    }
}

/// Upper bound on the compiled size of one pattern's matcher.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

struct CompiledPattern {
    regex: String,
    literal_prefix: String,
    has_wildcards: bool,
}

/// Translate a wildcard pattern into an anchored regex.
fn compile_pattern(pattern: &str) -> CompiledPattern {
    // (?s) lets `?` and `*` match newlines too.
    let mut regex_pattern = String::from("(?s)^");
    let mut literal_prefix = String::new();
    let mut has_wildcards = false;
    let mut last_was_star = false;

    for c in pattern.chars() {
        match c {
            '*' => {
                if !last_was_star {
                    regex_pattern.push_str(".*");
                }
                has_wildcards = true;
            }
            '?' => {
                regex_pattern.push('.');
                has_wildcards = true;
            }
            c => {
                push_literal(&mut regex_pattern, c);
                if !has_wildcards {
                    literal_prefix.push(c);
                }
            }
        }
        last_was_star = c == '*';
    }

    regex_pattern.push('$');

    CompiledPattern {
        regex: regex_pattern,
        literal_prefix,
        has_wildcards,
    }
}

fn push_literal(regex_pattern: &mut String, c: char) {
    let mut buf = [0u8; 4];
    regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}
