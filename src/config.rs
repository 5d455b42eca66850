use serde::{Deserialize, Serialize};

use crate::error::{CmdexError, Result};

/// Default separator joining parent segments and the leaf name.
pub const DEFAULT_PATH_SEPARATOR: &str = " ";

/// Configuration for building an [`Index`](crate::index::Index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Separator used to join a descriptor's path into `full_path`.
    ///
    /// Path, prefix and glob filters are compared against the joined string,
    /// so they must be written with this same separator.
    #[serde(default = "default_path_separator")]
    pub path_separator: String,

    /// Whether `metadata.<key>` fields are built at all.
    #[serde(default = "default_index_metadata")]
    pub index_metadata: bool,
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}

fn default_index_metadata() -> bool {
    true
}

impl IndexConfig {
    pub fn new() -> Self {
        Self {
            path_separator: default_path_separator(),
            index_metadata: default_index_metadata(),
        }
    }

    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Check the configuration for values the index cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.path_separator.is_empty() {
            return Err(CmdexError::invalid_argument(
                "path separator must not be empty",
            ));
        }
        Ok(())
    }

    /// Join path segments exactly the way the document mapper does.
    pub fn join_path<I, S>(&self, parents: I, name: &str) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for parent in parents {
            joined.push_str(parent.as_ref());
            joined.push_str(&self.path_separator);
        }
        joined.push_str(name);
        joined
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct IndexConfigBuilder {
    path_separator: Option<String>,
    index_metadata: Option<bool>,
}

impl IndexConfigBuilder {
    pub fn path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = Some(separator.into());
        self
    }

    pub fn index_metadata(mut self, enabled: bool) -> Self {
        self.index_metadata = Some(enabled);
        self
    }

    pub fn build(self) -> Result<IndexConfig> {
        let config = IndexConfig {
            path_separator: self.path_separator.unwrap_or_else(default_path_separator),
            index_metadata: self.index_metadata.unwrap_or_else(default_index_metadata),
        };
        config.validate()?;
        Ok(config)
    }
}
