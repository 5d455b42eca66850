//! Per-field term dictionaries.
//!
//! Each field keeps its distinct terms in an FST map from term to posting
//! ordinal, next to a dense vector of posting sets. The FST gives exact
//! lookup, ordered prefix ranges and a sorted stream for wildcard scans
//! without a separate prefix structure.

use std::collections::BTreeMap;

use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use crate::error::Result;
use crate::index::posting::DocSet;
use crate::query::wildcard::WildcardPattern;
use crate::search::context::SearchContext;

/// How many dictionary terms are scanned between two context checks.
const CHECK_INTERVAL: usize = 256;

/// Immutable term dictionary of one field.
pub struct TermDictionary {
    /// Term -> index into `postings`.
    fst: Map<Vec<u8>>,
    postings: Vec<DocSet>,
}

impl TermDictionary {
    /// Build a dictionary from terms already grouped with their posting sets.
    ///
    /// The map's ordering is the byte ordering the FST requires.
    pub fn build(terms: BTreeMap<String, DocSet>) -> Result<Self> {
        let mut builder = MapBuilder::memory();
        let mut postings = Vec::with_capacity(terms.len());

        for (ordinal, (term, docs)) in terms.into_iter().enumerate() {
            builder.insert(term.as_bytes(), ordinal as u64)?;
            postings.push(docs);
        }

        Ok(TermDictionary {
            fst: builder.into_map(),
            postings,
        })
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Total number of (term, document) pairs.
    pub fn posting_count(&self) -> u64 {
        self.postings.iter().map(DocSet::len).sum()
    }

    /// Exact term lookup.
    pub fn get(&self, term: &str) -> Option<&DocSet> {
        self.fst
            .get(term.as_bytes())
            .and_then(|ordinal| self.postings.get(ordinal as usize))
    }

    /// Union of the postings of every term starting with `prefix`.
    pub fn prefix(&self, prefix: &str, ctx: &SearchContext) -> Result<DocSet> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.fst.search(matcher).into_stream();

        let mut result = DocSet::new();
        let mut scanned = 0usize;
        while let Some((_, ordinal)) = stream.next() {
            scanned += 1;
            if scanned % CHECK_INTERVAL == 0 {
                ctx.check()?;
            }
            result.union_with(&self.postings[ordinal as usize]);
        }
        Ok(result)
    }

    /// Union of the postings of every term matching `pattern` in full.
    ///
    /// Only terms sharing the pattern's literal prefix are visited.
    pub fn wildcard(&self, pattern: &WildcardPattern, ctx: &SearchContext) -> Result<DocSet> {
        let matcher = Str::new(pattern.literal_prefix()).starts_with();
        let mut stream = self.fst.search(matcher).into_stream();

        let mut result = DocSet::new();
        let mut scanned = 0usize;
        while let Some((term, ordinal)) = stream.next() {
            scanned += 1;
            if scanned % CHECK_INTERVAL == 0 {
                ctx.check()?;
            }
            // Terms are inserted from `String`s, so they are always valid UTF-8.
            if let Ok(term) = std::str::from_utf8(term)
                && pattern.matches(term)
            {
                result.union_with(&self.postings[ordinal as usize]);
            }
        }
        Ok(result)
    }

    /// All terms in ascending byte order.
    pub fn terms(&self) -> Vec<String> {
        let mut stream = self.fst.stream();
        let mut terms = Vec::with_capacity(self.len());
        while let Some((term, _)) = stream.next() {
            terms.push(String::from_utf8_lossy(term).into_owned());
        }
        terms
    }
}

impl std::fmt::Debug for TermDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermDictionary")
            .field("terms", &self.len())
            .field("postings", &self.posting_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::error::CmdexError;
    use crate::search::context::CancellationToken;

    fn dictionary() -> TermDictionary {
        let mut terms = BTreeMap::new();
        terms.insert("tools http serve".to_string(), [0].into_iter().collect());
        terms.insert("tools http proxy".to_string(), [1].into_iter().collect());
        terms.insert("tools grpc serve".to_string(), [2].into_iter().collect());
        terms.insert("deploy".to_string(), [0, 3].into_iter().collect());
        TermDictionary::build(terms).unwrap()
    }

    fn ids(set: &DocSet) -> Vec<u32> {
        set.iter().collect()
    }

    #[test]
    fn test_exact_lookup() {
        let dict = dictionary();
        assert_eq!(ids(dict.get("deploy").unwrap()), vec![0, 3]);
        assert!(dict.get("deplo").is_none());
        assert!(dict.get("").is_none());
    }

    #[test]
    fn test_prefix() {
        let dict = dictionary();
        let ctx = SearchContext::background();
        assert_eq!(ids(&dict.prefix("tools http", &ctx).unwrap()), vec![0, 1]);
        assert_eq!(ids(&dict.prefix("tools", &ctx).unwrap()), vec![0, 1, 2]);
        assert_eq!(ids(&dict.prefix("", &ctx).unwrap()), vec![0, 1, 2, 3]);
        assert!(dict.prefix("zzz", &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_wildcard() {
        let dict = dictionary();
        let ctx = SearchContext::background();

        let pattern = WildcardPattern::new("tools * serve").unwrap();
        assert_eq!(ids(&dict.wildcard(&pattern, &ctx).unwrap()), vec![0, 2]);

        let pattern = WildcardPattern::new("*o?y").unwrap();
        assert_eq!(ids(&dict.wildcard(&pattern, &ctx).unwrap()), vec![1]);

        let pattern = WildcardPattern::new("deploy").unwrap();
        assert_eq!(ids(&dict.wildcard(&pattern, &ctx).unwrap()), vec![0, 3]);
    }

    #[test]
    fn test_terms_are_sorted() {
        let dict = dictionary();
        assert_eq!(
            dict.terms(),
            vec![
                "deploy",
                "tools grpc serve",
                "tools http proxy",
                "tools http serve"
            ]
        );
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.posting_count(), 5);
    }

    fn numbered(count: usize) -> TermDictionary {
        let terms = (0..count)
            .map(|i| (format!("cmd-{i:04}"), [i as u32].into_iter().collect()))
            .collect();
        TermDictionary::build(terms).unwrap()
    }

    #[test]
    fn test_long_scans_check_context() {
        let dict = numbered(CHECK_INTERVAL + 44);
        let expired = SearchContext::background().with_deadline(Instant::now());

        let err = dict.prefix("cmd-", &expired).unwrap_err();
        assert!(matches!(err, CmdexError::DeadlineExceeded));

        let pattern = WildcardPattern::new("cmd-*").unwrap();
        let err = dict.wildcard(&pattern, &expired).unwrap_err();
        assert!(matches!(err, CmdexError::DeadlineExceeded));

        let token = CancellationToken::new();
        token.cancel();
        let cancelled = SearchContext::background().with_cancellation(token);
        assert!(matches!(
            dict.prefix("", &cancelled),
            Err(CmdexError::Cancelled)
        ));
    }

    #[test]
    fn test_short_scans_finish_between_checks() {
        let dict = numbered(CHECK_INTERVAL - 1);
        let expired = SearchContext::background().with_deadline(Instant::now());

        let docs = dict.prefix("cmd-", &expired).unwrap();
        assert_eq!(docs.len(), (CHECK_INTERVAL - 1) as u64);
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = TermDictionary::build(BTreeMap::new()).unwrap();
        let ctx = SearchContext::background();
        assert!(dict.is_empty());
        assert!(dict.get("x").is_none());
        assert!(dict.prefix("", &ctx).unwrap().is_empty());
    }
}
