//! The closed set of indexed fields.
//!
//! Every query names its field through [`Field`], never through a raw string,
//! so a typo cannot silently turn into a field that matches nothing. The
//! metadata family is open-ended in keys but closed in shape: `metadata.<key>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CmdexError, Result};

/// Prefix of the synthetic per-key metadata fields.
pub const METADATA_FIELD_PREFIX: &str = "metadata.";

/// An indexed field of a [`Document`](crate::document::Document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    /// Leaf name.
    Name,
    /// Parents and leaf name joined with the configured separator.
    FullPath,
    /// Type label.
    Type,
    /// Multi-valued tag set.
    Tags,
    /// One synthetic field per metadata key.
    Metadata(String),
}

impl Field {
    /// Create the synthetic field for a metadata key.
    pub fn metadata(key: impl Into<String>) -> Self {
        Field::Metadata(key.into())
    }

    /// The metadata key, if this is a metadata field.
    pub fn metadata_key(&self) -> Option<&str> {
        match self {
            Field::Metadata(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, Field::Metadata(_))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("name"),
            Field::FullPath => f.write_str("full_path"),
            Field::Type => f.write_str("type"),
            Field::Tags => f.write_str("tags"),
            Field::Metadata(key) => write!(f, "{METADATA_FIELD_PREFIX}{key}"),
        }
    }
}

impl FromStr for Field {
    type Err = CmdexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Field::Name),
            "full_path" => Ok(Field::FullPath),
            "type" => Ok(Field::Type),
            "tags" => Ok(Field::Tags),
            other => match other.strip_prefix(METADATA_FIELD_PREFIX) {
                Some(key) => Ok(Field::Metadata(key.to_string())),
                None => Err(CmdexError::invalid_argument(format!(
                    "unknown field '{other}'"
                ))),
            },
        }
    }
}

impl TryFrom<String> for Field {
    type Error = CmdexError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.to_string()
    }
}
