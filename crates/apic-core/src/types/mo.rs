//! Managed object representation.
//!
//! The controller encodes every managed object (MO) as a single-key JSON map
//! from the class name to the object body:
//!
//! ```json
//! {"actionPolicymgrSubj": {"attributes": {"dn": "...", "oDn": "..."}}}
//! ```
//!
//! [`ManagedObject`] lifts the class name out of the key and keeps the
//! attributes as an ordered string map. Serialization writes the same shape
//! back, so findings can be dumped exactly as the controller returned them.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One managed object instance from the controller's object model.
///
/// # Examples
///
/// ```
/// use apic_core::ManagedObject;
///
/// let mo: ManagedObject = serde_json::from_str(
///     r#"{"actionPolicymgrSubj": {"attributes": {"oDn": "pcons/refcont/x"}}}"#,
/// )
/// .unwrap();
///
/// assert_eq!(mo.class, "actionPolicymgrSubj");
/// assert_eq!(mo.o_dn(), Some("pcons/refcont/x"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedObject {
    /// The MO class name (the single key of the JSON wrapper).
    pub class: String,
    /// Attribute name to value. The controller renders every value as a string.
    pub attributes: BTreeMap<String, String>,
    /// Child objects, present only when a subtree was requested.
    pub children: Vec<ManagedObject>,
}

impl ManagedObject {
    /// Creates an object of the given class with no attributes.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the value of the named attribute, if present.
    #[inline]
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The object's own distinguished name.
    #[inline]
    #[must_use]
    pub fn dn(&self) -> Option<&str> {
        self.attr("dn")
    }

    /// The distinguished name of the object this one refers to.
    #[inline]
    #[must_use]
    pub fn o_dn(&self) -> Option<&str> {
        self.attr("oDn")
    }

    /// The class of the object this one refers to.
    #[inline]
    #[must_use]
    pub fn o_cl(&self) -> Option<&str> {
        self.attr("oCl")
    }

    /// Returns `true` if this object is an instance of `class`.
    #[inline]
    #[must_use]
    pub fn is_class(&self, class: &str) -> bool {
        self.class == class
    }
}

#[derive(Deserialize)]
struct MoBody {
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<ManagedObject>,
}

#[derive(Serialize)]
struct MoBodyRef<'a> {
    attributes: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [ManagedObject],
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Signature fixed by serde
fn no_children(children: &&[ManagedObject]) -> bool {
    children.is_empty()
}

impl Serialize for ManagedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.class,
            &MoBodyRef {
                attributes: &self.attributes,
                children: &self.children,
            },
        )?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ManagedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoVisitor;

        impl<'de> Visitor<'de> for MoVisitor {
            type Value = ManagedObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with exactly one class name key")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let Some((class, body)) = map.next_entry::<String, MoBody>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(format!(
                        "managed object `{class}` has more than one class key"
                    )));
                }
                Ok(ManagedObject {
                    class,
                    attributes: body.attributes,
                    children: body.children,
                })
            }
        }

        deserializer.deserialize_map(MoVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_children() {
        let json = r#"{
            "fvTenant": {
                "attributes": {"dn": "uni/tn-common", "name": "common"},
                "children": [{"fvCtx": {"attributes": {"name": "default"}}}]
            }
        }"#;
        let mo: ManagedObject = serde_json::from_str(json).unwrap();
        assert_eq!(mo.class, "fvTenant");
        assert_eq!(mo.dn(), Some("uni/tn-common"));
        assert_eq!(mo.children.len(), 1);
        assert!(mo.children[0].is_class("fvCtx"));
        assert_eq!(mo.children[0].attr("name"), Some("default"));
    }

    #[test]
    fn test_deserialize_missing_attributes_defaults_empty() {
        let mo: ManagedObject = serde_json::from_str(r#"{"pconsRefDn": {}}"#).unwrap();
        assert_eq!(mo.class, "pconsRefDn");
        assert!(mo.attributes.is_empty());
        assert!(mo.o_cl().is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty_map() {
        assert!(serde_json::from_str::<ManagedObject>("{}").is_err());
    }

    #[test]
    fn test_deserialize_rejects_two_classes() {
        let json = r#"{"a": {"attributes": {}}, "b": {"attributes": {}}}"#;
        let err = serde_json::from_str::<ManagedObject>(json).unwrap_err();
        assert!(err.to_string().contains("more than one class key"));
    }

    #[test]
    fn test_serialize_keeps_controller_shape() {
        let mo = ManagedObject::new("actionTopomgrSubj")
            .with_attr("oDn", "pcons/refcont/x")
            .with_attr("oCl", "pconsRefDn");
        let json = serde_json::to_string(&mo).unwrap();
        assert_eq!(
            json,
            r#"{"actionTopomgrSubj":{"attributes":{"oCl":"pconsRefDn","oDn":"pcons/refcont/x"}}}"#
        );
    }

    #[test]
    fn test_accessors() {
        let mo = ManagedObject::new("pconsRefDn")
            .with_attr("dn", "pcons/refcont-1/refdn")
            .with_attr("oCl", "pconsRefDn");
        assert_eq!(mo.dn(), Some("pcons/refcont-1/refdn"));
        assert_eq!(mo.o_cl(), Some("pconsRefDn"));
        assert_eq!(mo.o_dn(), None);
        assert!(mo.is_class("pconsRefDn"));
        assert!(!mo.is_class("actionBootmgrSubj"));
    }
}
