//! Search execution.
//!
//! # Module Structure
//!
//! - `context`: Cancellation token and deadline polled during evaluation
//! - `executor`: Structural evaluation of a [`Query`] into a [`DocSet`](crate::index::posting::DocSet)

pub mod context;
pub mod executor;

use log::trace;

use crate::data::Descriptor;
use crate::error::{CmdexError, Result};
use crate::index::Index;
use crate::query::Query;

use context::SearchContext;

/// Evaluate `filter` and map the hits back to `originals`.
///
/// `originals` must be the snapshot `index` was built from, in the same
/// order. A slice of a different length is rejected with
/// [`CmdexError::SnapshotMismatch`]; a same-length slice in a different order
/// cannot be detected and yields descriptors at the matching positions. Use
/// [`Catalog`](crate::catalog::Catalog) to have the pairing enforced for you.
///
/// The returned references point into `originals`, in snapshot order, each
/// descriptor at most once. No match is an empty vector, not an error.
pub fn search<'a>(
    ctx: &SearchContext,
    index: &Index,
    filter: &Query,
    originals: &'a [Descriptor],
) -> Result<Vec<&'a Descriptor>> {
    if originals.len() != index.doc_count() {
        return Err(CmdexError::snapshot_mismatch(
            index.doc_count(),
            originals.len(),
        ));
    }

    let hits = index.search_ids(ctx, filter)?;
    trace!("query {filter} matched {} documents", hits.len());

    Ok(hits
        .iter()
        .filter_map(|id| originals.get(id as usize))
        .collect())
}
