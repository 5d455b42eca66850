//! A descriptor snapshot paired with its index.

use crate::config::IndexConfig;
use crate::data::Descriptor;
use crate::error::Result;
use crate::index::Index;
use crate::query::Query;
use crate::search::context::SearchContext;
use crate::search::search;

/// Borrows a descriptor snapshot and owns the index built from it.
///
/// Because the snapshot stays borrowed for the catalog's lifetime, it cannot
/// be mutated while the index exists, and searches need no separate
/// "originals" argument. When the caller's collection changes, build a new
/// catalog.
///
/// # Example
///
/// ```
/// use cmdex::{Catalog, Descriptor, filter};
///
/// let descriptors = vec![
///     Descriptor::new("http-server").with_type("http").with_tags(["api", "server"]),
///     Descriptor::new("cli-tool").with_type("cli").with_tag("tool"),
/// ];
/// let catalog = Catalog::new(&descriptors)?;
///
/// let hits = catalog.search(&filter::tag("api"))?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "http-server");
/// # Ok::<(), cmdex::CmdexError>(())
/// ```
#[derive(Debug)]
pub struct Catalog<'a> {
    descriptors: &'a [Descriptor],
    index: Index,
}

impl<'a> Catalog<'a> {
    /// Index `descriptors` with the default configuration.
    pub fn new(descriptors: &'a [Descriptor]) -> Result<Self> {
        Self::with_config(descriptors, &IndexConfig::default())
    }

    pub fn with_config(descriptors: &'a [Descriptor], config: &IndexConfig) -> Result<Self> {
        let index = Index::build_with_config(descriptors, config)?;
        Ok(Catalog { descriptors, index })
    }

    /// Descriptors matching `filter`, in snapshot order.
    pub fn search(&self, filter: impl AsRef<Query>) -> Result<Vec<&'a Descriptor>> {
        self.search_with(&SearchContext::background(), filter)
    }

    /// Like [`search`](Self::search), aborting when `ctx` says so.
    pub fn search_with(
        &self,
        ctx: &SearchContext,
        filter: impl AsRef<Query>,
    ) -> Result<Vec<&'a Descriptor>> {
        search(ctx, &self.index, filter.as_ref(), self.descriptors)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn descriptors(&self) -> &'a [Descriptor] {
        self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CmdexError;
    use crate::query::builder as filter;
    use crate::search::context::CancellationToken;

    #[test]
    fn test_catalog_search() -> Result<()> {
        let descriptors = vec![
            Descriptor::new("a").with_type("x"),
            Descriptor::new("b").with_type("y"),
            Descriptor::new("c").with_type("x"),
        ];
        let catalog = Catalog::new(&descriptors)?;
        assert_eq!(catalog.len(), 3);

        let hits = catalog.search(filter::of_type("x"))?;
        let names: Vec<&str> = hits.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(std::ptr::eq(hits[1], &descriptors[2]));

        let query = filter::of_type("y").build();
        assert_eq!(catalog.search(&query)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_catalog_with_config() -> Result<()> {
        let descriptors = vec![Descriptor::new("serve").with_parents(["tools", "http"])];
        let config = IndexConfig::builder().path_separator("/").build()?;
        let catalog = Catalog::with_config(&descriptors, &config)?;

        assert_eq!(catalog.search(filter::path("tools/http/serve"))?.len(), 1);
        assert!(catalog.search(filter::path("tools http serve"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_catalog_search_with_cancelled_context() -> Result<()> {
        let descriptors = vec![Descriptor::new("a")];
        let catalog = Catalog::new(&descriptors)?;
        let token = CancellationToken::new();
        let ctx = SearchContext::background().with_cancellation(token.clone());

        assert_eq!(catalog.search_with(&ctx, filter::name("a"))?.len(), 1);
        token.cancel();
        assert!(matches!(
            catalog.search_with(&ctx, filter::name("a")),
            Err(CmdexError::Cancelled)
        ));
        Ok(())
    }

    #[test]
    fn test_empty_catalog() -> Result<()> {
        let catalog = Catalog::new(&[])?;
        assert!(catalog.is_empty());
        assert!(catalog.search(Query::match_all())?.is_empty());
        Ok(())
    }
}
