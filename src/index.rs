//! The in-memory inverted index.
//!
//! An [`Index`] is built once from a snapshot of descriptors and is read-only
//! afterwards. It maps every (field, term) pair to the set of documents
//! holding that term, and keeps one [`TermDictionary`] per field for prefix
//! and wildcard expansion.
//!
//! # Module Structure
//!
//! - `field`: The closed set of indexed fields
//! - `posting`: Document id sets
//! - `terms`: FST-backed per-field term dictionaries

pub mod field;
pub mod posting;
pub mod terms;

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::{debug, trace};

use crate::config::IndexConfig;
use crate::data::Descriptor;
use crate::document::{Document, DocumentMapper};
use crate::error::{CmdexError, Result};
use crate::query::Query;
use crate::search::context::SearchContext;
use crate::search::executor::QueryExecutor;

use field::Field;
use posting::{DocId, DocSet};
use terms::TermDictionary;

/// Build an index over `descriptors` with the default configuration.
///
/// Never fails for an empty slice; the result simply holds zero documents.
pub fn new_index(descriptors: &[Descriptor]) -> Result<Index> {
    Index::build(descriptors)
}

/// Statistics of one indexed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStats {
    pub field: Field,
    pub terms: usize,
    pub postings: u64,
}

/// Statistics of a whole index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub doc_count: usize,
    /// Per-field statistics, ordered by field.
    pub fields: Vec<FieldStats>,
}

impl IndexStats {
    /// Distinct terms across all fields.
    pub fn total_terms(&self) -> usize {
        self.fields.iter().map(|f| f.terms).sum()
    }
}

/// An immutable inverted index over one descriptor snapshot.
///
/// `Index` is `Send + Sync`; any number of threads may search it at once
/// without synchronization.
pub struct Index {
    fields: AHashMap<Field, TermDictionary>,
    /// Every document id of the snapshot.
    universe: DocSet,
    doc_count: usize,
    config: IndexConfig,
}

impl Index {
    /// Build an index with the default configuration.
    pub fn build(descriptors: &[Descriptor]) -> Result<Self> {
        Self::build_with_config(descriptors, &IndexConfig::default())
    }

    /// Build an index, mapping each descriptor with the given configuration.
    ///
    /// Document ids are positions in `descriptors`.
    pub fn build_with_config(descriptors: &[Descriptor], config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        check_capacity(descriptors.len())?;

        let mapper = DocumentMapper::new(config);
        let documents = descriptors
            .iter()
            .enumerate()
            .map(|(position, descriptor)| mapper.map(position as DocId, descriptor));

        Self::from_documents(documents, config)
    }

    /// Build an index from already mapped documents.
    ///
    /// Ids must be `0, 1, 2, ...` in iteration order so that they stay valid
    /// positions into the descriptor snapshot. A duplicate or out-of-order id
    /// is an invariant violation and fails the whole build.
    pub fn from_documents<I>(documents: I, config: &IndexConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        config.validate()?;

        let mut grouped: AHashMap<Field, BTreeMap<String, DocSet>> = AHashMap::new();
        let mut doc_count = 0usize;

        for document in documents {
            check_capacity(doc_count + 1)?;
            if document.id as usize != doc_count {
                return Err(CmdexError::index(format!(
                    "document id {} at position {doc_count}: ids must be dense and unique",
                    document.id
                )));
            }

            for (field, term) in document.terms() {
                grouped
                    .entry(field)
                    .or_default()
                    .entry(term.to_string())
                    .or_default()
                    .insert(document.id);
            }
            doc_count += 1;
        }

        let mut fields = AHashMap::with_capacity(grouped.len());
        for (field, terms) in grouped {
            let dictionary = TermDictionary::build(terms)?;
            trace!(
                "field {field}: {} terms, {} postings",
                dictionary.len(),
                dictionary.posting_count()
            );
            fields.insert(field, dictionary);
        }

        let index = Index {
            fields,
            universe: DocSet::from_range(0..doc_count as DocId),
            doc_count,
            config: config.clone(),
        };

        debug!(
            "built index: {} documents, {} fields, {} terms",
            index.doc_count,
            index.fields.len(),
            index.fields.values().map(TermDictionary::len).sum::<usize>()
        );

        Ok(index)
    }

    /// Number of documents in the snapshot.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    /// The configuration the index was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Every document id, i.e. the universe `Not` complements against.
    pub fn all_docs(&self) -> &DocSet {
        &self.universe
    }

    /// The term dictionary of a field, if any document has a term in it.
    pub fn field(&self, field: &Field) -> Option<&TermDictionary> {
        self.fields.get(field)
    }

    /// Sorted terms of a field. Unknown fields have no terms.
    pub fn terms(&self, field: &Field) -> Vec<String> {
        self.field(field).map(TermDictionary::terms).unwrap_or_default()
    }

    /// Sorted metadata keys seen across the snapshot.
    pub fn metadata_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .fields
            .keys()
            .filter_map(Field::metadata_key)
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn stats(&self) -> IndexStats {
        let mut fields: Vec<FieldStats> = self
            .fields
            .iter()
            .map(|(field, dictionary)| FieldStats {
                field: field.clone(),
                terms: dictionary.len(),
                postings: dictionary.posting_count(),
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        IndexStats {
            doc_count: self.doc_count,
            fields,
        }
    }

    /// Evaluate `query` and return the matching document ids.
    pub fn search_ids(&self, ctx: &SearchContext, query: &Query) -> Result<DocSet> {
        QueryExecutor::new(self, ctx).execute(query)
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("doc_count", &self.doc_count)
            .field("fields", &self.fields.len())
            .field("config", &self.config)
            .finish()
    }
}

fn check_capacity(doc_count: usize) -> Result<()> {
    if doc_count > DocId::MAX as usize {
        return Err(CmdexError::index(format!(
            "{doc_count} documents exceed the document id space"
        )));
    }
    Ok(())
}
