//! One page of a class query response.

use serde::{Deserialize, Deserializer};

use super::mo::ManagedObject;

/// A single page returned by a paginated class query.
///
/// `totalCount` is the number of matching objects across *all* pages. The
/// controller encodes it as a string; a bare JSON number is accepted as well.
///
/// # Examples
///
/// ```
/// use apic_core::PageResponse;
///
/// let page: PageResponse =
///     serde_json::from_str(r#"{"imdata": [], "totalCount": "0"}"#).unwrap();
/// assert_eq!(page.total_count, 0);
/// assert!(page.imdata.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageResponse {
    /// Objects on this page, in server order.
    pub imdata: Vec<ManagedObject>,
    /// Total matching objects across all pages.
    #[serde(rename = "totalCount", deserialize_with = "deserialize_total_count")]
    pub total_count: u64,
}

impl PageResponse {
    /// JSON key holding the page's objects.
    pub const IMDATA_KEY: &'static str = "imdata";
    /// JSON key holding the total object count.
    pub const TOTAL_COUNT_KEY: &'static str = "totalCount";
}

fn deserialize_total_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        Text(String),
        Number(u64),
    }

    match Encoded::deserialize(deserializer)? {
        Encoded::Number(n) => Ok(n),
        Encoded::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("totalCount is not an integer: {s:?}"))),
    }
}
