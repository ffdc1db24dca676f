//! Class query composition.

use apic_core::ShardId;

use crate::filters::{QueryFilters, join_pairs};

/// A class query against one service shard.
///
/// Filters are extra query parameters; the shard parameter is always
/// appended last. [`url`](Self::url) owns the `?`/`&` delimiters, so the
/// filter set can never produce a malformed URL.
///
/// # Examples
///
/// ```
/// use apic_client::{ClassQuery, QueryFilters};
/// use apic_core::ShardId;
///
/// let query = ClassQuery::new("policymgr", "pconsRefDn", ShardId::new(3));
/// assert_eq!(query.url(), "/api/policymgr/class/pconsRefDn.json?shard=3");
///
/// let query = query.with_filters(QueryFilters::default().with_rsp_prop_include("naming-only"));
/// assert_eq!(
///     query.url(),
///     "/api/policymgr/class/pconsRefDn.json?rsp-prop-include=naming-only&shard=3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassQuery {
    service: String,
    class: String,
    shard: ShardId,
    filters: QueryFilters,
}

impl ClassQuery {
    /// Creates an unfiltered class query.
    #[must_use]
    pub fn new(service: impl Into<String>, class: impl Into<String>, shard: ShardId) -> Self {
        Self {
            service: service.into(),
            class: class.into(),
            shard,
            filters: QueryFilters::default(),
        }
    }

    /// Replaces the query's filters.
    #[must_use]
    pub fn with_filters(mut self, filters: QueryFilters) -> Self {
        self.filters = filters;
        self
    }

    /// The queried class.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The queried shard.
    #[must_use]
    pub const fn shard(&self) -> ShardId {
        self.shard
    }

    /// The path portion, `/api/<service>/class/<class>.json`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/api/{}/class/{}.json", self.service, self.class)
    }

    /// The full relative URL including filters and shard.
    #[must_use]
    pub fn url(&self) -> String {
        let shard = self.shard.to_string();
        let mut pairs = self.filters.to_pairs();
        pairs.push(("shard", shard.as_str()));
        format!("{}?{}", self.path(), join_pairs(&pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_two_filters() {
        let query = ClassQuery::new("topomgr", "actionTopomgrSubj", ShardId::new(12)).with_filters(
            QueryFilters::default()
                .with_query_target("self")
                .with_rsp_subtree("no"),
        );
        assert_eq!(
            query.url(),
            "/api/topomgr/class/actionTopomgrSubj.json?query-target=self&rsp-subtree=no&shard=12"
        );
    }

    #[test]
    fn test_accessors() {
        let query = ClassQuery::new("vmmmgr", "pconsRefDn", ShardId::SINGLETON);
        assert_eq!(query.class(), "pconsRefDn");
        assert_eq!(query.shard(), ShardId::SINGLETON);
        assert_eq!(query.path(), "/api/vmmmgr/class/pconsRefDn.json");
    }
}
