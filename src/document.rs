//! Flattening descriptors into indexable documents.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::IndexConfig;
use crate::data::Descriptor;
use crate::index::field::Field;
use crate::index::posting::DocId;

/// The field-named projection of one [`Descriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Position of the source descriptor in the snapshot.
    pub id: DocId,
    pub name: String,
    pub full_path: String,
    pub kind: String,
    pub tags: BTreeSet<String>,
    /// Metadata key -> canonical string form of the value.
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Every (field, term) pair this document contributes to the index.
    pub fn terms(&self) -> impl Iterator<Item = (Field, &str)> {
        let single = [
            (Field::Name, self.name.as_str()),
            (Field::FullPath, self.full_path.as_str()),
            (Field::Type, self.kind.as_str()),
        ];
        let tags = self.tags.iter().map(|tag| (Field::Tags, tag.as_str()));
        let metadata = self
            .metadata
            .iter()
            .map(|(key, value)| (Field::metadata(key.as_str()), value.as_str()));

        single.into_iter().chain(tags).chain(metadata)
    }
}

/// Converts descriptors into [`Document`]s.
///
/// Mapping is a pure function of the descriptor and the mapper's settings.
#[derive(Debug, Clone)]
pub struct DocumentMapper {
    path_separator: String,
    index_metadata: bool,
}

impl DocumentMapper {
    pub fn new(config: &IndexConfig) -> Self {
        DocumentMapper {
            path_separator: config.path_separator.clone(),
            index_metadata: config.index_metadata,
        }
    }

    pub fn path_separator(&self) -> &str {
        &self.path_separator
    }

    /// Join parents and leaf name with the configured separator.
    pub fn join_path(&self, descriptor: &Descriptor) -> String {
        descriptor
            .segments()
            .collect::<Vec<_>>()
            .join(&self.path_separator)
    }

    /// Map one descriptor to the document with the given id.
    pub fn map(&self, id: DocId, descriptor: &Descriptor) -> Document {
        let metadata = if self.index_metadata {
            descriptor
                .metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect()
        } else {
            BTreeMap::new()
        };

        Document {
            id,
            name: descriptor.name.clone(),
            full_path: self.join_path(descriptor),
            kind: descriptor.kind.clone(),
            tags: descriptor.tags.clone(),
            metadata,
        }
    }
}

impl Default for DocumentMapper {
    fn default() -> Self {
        Self::new(&IndexConfig::default())
    }
}
