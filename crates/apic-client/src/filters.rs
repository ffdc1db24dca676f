//! Class query filter options.
//!
//! [`QueryFilters`] enumerates the seven query options the controller
//! accepts on class queries. Each option is independent and optional; only
//! the ones that were set are rendered, always in the same order.

use smallvec::SmallVec;

/// Optional filters applied to a class query.
///
/// | field                  | query key              | typical values                              |
/// |------------------------|------------------------|---------------------------------------------|
/// | `query_target`         | `query-target`         | `self`, `children`, `subtree`               |
/// | `target_subtree_class` | `target-subtree-class` | MO class name                               |
/// | `query_target_filter`  | `query-target-filter`  | filter expression, e.g. `eq(x.name,"a")`    |
/// | `rsp_subtree`          | `rsp-subtree`          | `no`, `children`, `full`                    |
/// | `rsp_subtree_include`  | `rsp-subtree-include`  | `faults`, `health`, `count`, ...            |
/// | `rsp_subtree_class`    | `rsp-subtree-class`    | MO class name                               |
/// | `rsp_prop_include`     | `rsp-prop-include`     | `all`, `naming-only`, `config-only`, ...    |
///
/// Presence, not content, controls rendering: `Some(String::new())` still
/// renders `key=`.
///
/// # Examples
///
/// ```
/// use apic_client::QueryFilters;
///
/// assert_eq!(QueryFilters::default().fragment(), "");
///
/// let filters = QueryFilters::default()
///     .with_query_target("subtree")
///     .with_rsp_prop_include("naming-only");
/// assert_eq!(filters.fragment(), "?query-target=subtree&rsp-prop-include=naming-only");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilters {
    /// `query-target`
    pub query_target: Option<String>,
    /// `target-subtree-class`
    pub target_subtree_class: Option<String>,
    /// `query-target-filter`
    pub query_target_filter: Option<String>,
    /// `rsp-subtree`
    pub rsp_subtree: Option<String>,
    /// `rsp-subtree-include`
    pub rsp_subtree_include: Option<String>,
    /// `rsp-subtree-class`
    pub rsp_subtree_class: Option<String>,
    /// `rsp-prop-include`
    pub rsp_prop_include: Option<String>,
}

impl QueryFilters {
    /// Sets `query-target`.
    #[must_use]
    pub fn with_query_target(mut self, value: impl Into<String>) -> Self {
        self.query_target = Some(value.into());
        self
    }

    /// Sets `target-subtree-class`.
    #[must_use]
    pub fn with_target_subtree_class(mut self, value: impl Into<String>) -> Self {
        self.target_subtree_class = Some(value.into());
        self
    }

    /// Sets `query-target-filter`.
    #[must_use]
    pub fn with_query_target_filter(mut self, value: impl Into<String>) -> Self {
        self.query_target_filter = Some(value.into());
        self
    }

    /// Sets `rsp-subtree`.
    #[must_use]
    pub fn with_rsp_subtree(mut self, value: impl Into<String>) -> Self {
        self.rsp_subtree = Some(value.into());
        self
    }

    /// Sets `rsp-subtree-include`.
    #[must_use]
    pub fn with_rsp_subtree_include(mut self, value: impl Into<String>) -> Self {
        self.rsp_subtree_include = Some(value.into());
        self
    }

    /// Sets `rsp-subtree-class`.
    #[must_use]
    pub fn with_rsp_subtree_class(mut self, value: impl Into<String>) -> Self {
        self.rsp_subtree_class = Some(value.into());
        self
    }

    /// Sets `rsp-prop-include`.
    #[must_use]
    pub fn with_rsp_prop_include(mut self, value: impl Into<String>) -> Self {
        self.rsp_prop_include = Some(value.into());
        self
    }

    /// Returns the supplied options as `(key, value)` pairs in render order.
    #[must_use]
    pub fn to_pairs(&self) -> SmallVec<[(&'static str, &str); 7]> {
        [
            ("query-target", &self.query_target),
            ("target-subtree-class", &self.target_subtree_class),
            ("query-target-filter", &self.query_target_filter),
            ("rsp-subtree", &self.rsp_subtree),
            ("rsp-subtree-include", &self.rsp_subtree_include),
            ("rsp-subtree-class", &self.rsp_subtree_class),
            ("rsp-prop-include", &self.rsp_prop_include),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    /// Returns `true` if no option is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Renders the options as a query fragment.
    ///
    /// Empty string when nothing is set, otherwise `?k1=v1&k2=v2...`.
    #[must_use]
    pub fn fragment(&self) -> String {
        let pairs = self.to_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        format!("?{}", join_pairs(&pairs))
    }
}

/// Joins `(key, value)` pairs as `k1=v1&k2=v2`.
pub(crate) fn join_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_options_renders_empty() {
        let filters = QueryFilters::default();
        assert!(filters.is_empty());
        assert_eq!(filters.fragment(), "");
    }

    #[test]
    fn test_single_option() {
        let filters = QueryFilters::default().with_rsp_subtree("full");
        assert_eq!(filters.fragment(), "?rsp-subtree=full");
    }

    #[test]
    fn test_two_options_follow_fixed_order() {
        // Set in reverse order; rendering order is fixed.
        let filters = QueryFilters::default()
            .with_rsp_subtree_class("faultInst")
            .with_query_target_filter(r#"eq(fvBD.name,"bd1")"#);
        assert_eq!(
            filters.fragment(),
            r#"?query-target-filter=eq(fvBD.name,"bd1")&rsp-subtree-class=faultInst"#
        );
    }

    #[test]
    fn test_all_options_order() {
        let filters = QueryFilters::default()
            .with_rsp_prop_include("a7")
            .with_rsp_subtree_class("a6")
            .with_rsp_subtree_include("a5")
            .with_rsp_subtree("a4")
            .with_query_target_filter("a3")
            .with_target_subtree_class("a2")
            .with_query_target("a1");
        let keys: Vec<&str> = filters.to_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "query-target",
                "target-subtree-class",
                "query-target-filter",
                "rsp-subtree",
                "rsp-subtree-include",
                "rsp-subtree-class",
                "rsp-prop-include",
            ]
        );
    }

    #[test]
    fn test_presence_not_content_controls_inclusion() {
        let filters = QueryFilters::default().with_query_target("");
        assert!(!filters.is_empty());
        assert_eq!(filters.fragment(), "?query-target=");
    }
}
