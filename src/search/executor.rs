//! Query evaluation against an [`Index`].

use crate::error::Result;
use crate::index::Index;
use crate::index::posting::DocSet;
use crate::query::Query;
use crate::search::context::SearchContext;

/// Evaluates query trees into document id sets.
///
/// Evaluation is a structural recursion over the tree. It only reads the
/// index, so executors on different threads never contend.
pub struct QueryExecutor<'a> {
    index: &'a Index,
    ctx: &'a SearchContext,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a Index, ctx: &'a SearchContext) -> Self {
        QueryExecutor { index, ctx }
    }

    /// Evaluate `query`. Unknown fields and terms evaluate to the empty set.
    pub fn execute(&self, query: &Query) -> Result<DocSet> {
        self.ctx.check()?;

        match query {
            Query::Term { field, value } => Ok(self
                .index
                .field(field)
                .and_then(|dictionary| dictionary.get(value))
                .cloned()
                .unwrap_or_default()),
            Query::Prefix { field, value } => match self.index.field(field) {
                Some(dictionary) => dictionary.prefix(value, self.ctx),
                None => Ok(DocSet::new()),
            },
            Query::Wildcard { field, pattern } => match self.index.field(field) {
                Some(dictionary) => dictionary.wildcard(pattern, self.ctx),
                None => Ok(DocSet::new()),
            },
            Query::And(children) => self.execute_and(children),
            Query::Or(children) => self.execute_or(children),
            Query::Not(child) => Ok(self.execute(child)?.complement(self.index.all_docs())),
        }
    }

    /// Intersect positive children, then subtract negated ones.
    ///
    /// With no positive child the universe is the starting set, which also
    /// makes `And([])` match every document.
    fn execute_and(&self, children: &[Query]) -> Result<DocSet> {
        let (negative, positive): (Vec<&Query>, Vec<&Query>) =
            children.iter().partition(|child| matches!(child, Query::Not(_)));

        let mut result: Option<DocSet> = None;
        for child in positive {
            let docs = self.execute(child)?;
            match result.as_mut() {
                Some(acc) => acc.intersect_with(&docs),
                None => result = Some(docs),
            }
            if result.as_ref().is_some_and(DocSet::is_empty) {
                return Ok(DocSet::new());
            }
        }

        let mut result = result.unwrap_or_else(|| self.index.all_docs().clone());
        for child in negative {
            if let Query::Not(inner) = child {
                self.ctx.check()?;
                result.difference_with(&self.execute(inner)?);
            }
            if result.is_empty() {
                break;
            }
        }
        Ok(result)
    }

    fn execute_or(&self, children: &[Query]) -> Result<DocSet> {
        let mut result = DocSet::new();
        for child in children {
            result.union_with(&self.execute(child)?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Descriptor;
    use crate::index::field::Field;
    use crate::query::wildcard::WildcardPattern;
    use crate::search::context::CancellationToken;
    use crate::error::CmdexError;

    fn index() -> Index {
        Index::build(&[
            Descriptor::new("serve")
                .with_parents(["tools", "http"])
                .with_type("http")
                .with_tags(["api", "server"]),
            Descriptor::new("serve")
                .with_parents(["tools", "grpc"])
                .with_type("grpc")
                .with_tags(["api", "server"]),
            Descriptor::new("lint").with_parents(["tools"]).with_type("cli"),
            Descriptor::new("deploy").with_type("cli").with_tag("ops"),
        ])
        .unwrap()
    }

    fn run(index: &Index, query: &Query) -> Vec<u32> {
        let ctx = SearchContext::background();
        QueryExecutor::new(index, &ctx)
            .execute(query)
            .unwrap()
            .iter()
            .collect()
    }

    #[test]
    fn test_term() {
        let index = index();
        assert_eq!(run(&index, &Query::term(Field::Type, "cli")), vec![2, 3]);
        assert_eq!(run(&index, &Query::term(Field::Name, "serve")), vec![0, 1]);
        assert!(run(&index, &Query::term(Field::Type, "htt")).is_empty());
        assert!(run(&index, &Query::term(Field::metadata("nope"), "x")).is_empty());
    }

    #[test]
    fn test_prefix_and_wildcard() {
        let index = index();
        assert_eq!(
            run(&index, &Query::prefix(Field::FullPath, "tools ")),
            vec![0, 1, 2]
        );
        let pattern = WildcardPattern::new("tools * serve").unwrap();
        assert_eq!(
            run(&index, &Query::wildcard(Field::FullPath, pattern)),
            vec![0, 1]
        );
        let pattern = WildcardPattern::new("?e*").unwrap();
        assert_eq!(run(&index, &Query::wildcard(Field::Name, pattern)), vec![0, 1, 3]);
    }

    #[test]
    fn test_boolean_nodes() {
        let index = index();
        let http = Query::term(Field::Type, "http");
        let api = Query::term(Field::Tags, "api");

        assert_eq!(run(&index, &Query::and([http.clone(), api.clone()])), vec![0]);
        assert_eq!(run(&index, &Query::or([http.clone(), api.clone()])), vec![0, 1]);
        assert_eq!(run(&index, &Query::not(api.clone())), vec![2, 3]);
        assert_eq!(
            run(&index, &Query::and([api.clone(), Query::not(http.clone())])),
            vec![1]
        );
    }

    #[test]
    fn test_empty_boolean_nodes() {
        let index = index();
        assert_eq!(run(&index, &Query::match_all()), vec![0, 1, 2, 3]);
        assert!(run(&index, &Query::match_none()).is_empty());
        assert_eq!(run(&index, &Query::not(Query::match_none())), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_and_of_only_negations() {
        let index = index();
        let q = Query::and([
            Query::not(Query::term(Field::Type, "cli")),
            Query::not(Query::term(Field::Type, "grpc")),
        ]);
        assert_eq!(run(&index, &q), vec![0]);
    }

    #[test]
    fn test_double_negation() {
        let index = index();
        let q = Query::term(Field::Tags, "server");
        assert_eq!(run(&index, &Query::not(Query::not(q.clone()))), run(&index, &q));
    }

    #[test]
    fn test_cancelled_context_aborts() {
        let index = index();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = SearchContext::background().with_cancellation(token);

        let err = QueryExecutor::new(&index, &ctx)
            .execute(&Query::match_all())
            .unwrap_err();
        assert!(matches!(err, CmdexError::Cancelled));
    }
}
