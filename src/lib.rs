//! # Cmdex
//!
//! A structured filter index over command descriptors.
//!
//! ## Features
//!
//! - Exact, prefix and glob matching on names and joined command paths
//! - Type, tag and metadata filters
//! - Composable boolean filters with set semantics
//! - Results returned as references into the caller's own snapshot
//! - Cooperative cancellation and deadlines
//!
//! ## Example
//!
//! ```
//! use cmdex::{Catalog, Descriptor, filter};
//!
//! let descriptors = vec![
//!     Descriptor::new("serve").with_parents(["tools"]).with_type("http").with_tag("api"),
//!     Descriptor::new("lint").with_parents(["tools"]).with_type("cli"),
//! ];
//! let catalog = Catalog::new(&descriptors)?;
//!
//! let query = filter::path_prefix("tools").and(&filter::of_type("cli").not());
//! let hits = catalog.search(&query)?;
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "serve");
//! # Ok::<(), cmdex::CmdexError>(())
//! ```

// Core modules
pub mod catalog;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod search;

/// Field-scoped filter constructors.
pub use query::builder as filter;

// Re-exports for the public API
pub use catalog::Catalog;
pub use config::{IndexConfig, IndexConfigBuilder};
pub use data::{Descriptor, MetadataValue};
pub use document::{Document, DocumentMapper};
pub use error::{CmdexError, Result};
pub use index::field::Field;
pub use index::posting::{DocId, DocSet};
pub use index::{FieldStats, Index, IndexStats, new_index};
pub use query::Query;
pub use query::builder::FilterBuilder;
pub use query::wildcard::WildcardPattern;
pub use search::context::{CancellationToken, SearchContext};
pub use search::executor::QueryExecutor;
pub use search::search;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
