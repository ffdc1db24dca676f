//! Transceiver rows built from `ethpmFcot` objects.

use std::sync::LazyLock;

use apic_core::ManagedObject;
use regex::Regex;
use tracing::debug;

/// Class holding one object per transceiver slot.
pub const TRANSCEIVER_CLASS: &str = "ethpmFcot";

/// `actualType` of an empty or unreadable slot.
pub const UNKNOWN_TYPE: &str = "unknown";

static PORT_DN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)pod-(?P<pod>[^/]+)/node-(?P<node>[^/]+)/sys/phys-\[(?P<port>[^\]]+)\]").ok()
});

/// Fabric position of a transceiver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortLocation {
    /// Pod id, e.g. `1`.
    pub pod: String,
    /// Node id, e.g. `101`.
    pub node: String,
    /// Interface, e.g. `eth1/49`.
    pub port: String,
}

/// Extracts pod, node and interface from a transceiver dn.
///
/// # Examples
///
/// ```
/// use apic_inventory::parse_port_location;
///
/// let loc = parse_port_location("topology/pod-1/node-101/sys/phys-[eth1/49]/phys/fcot").unwrap();
/// assert_eq!((loc.pod.as_str(), loc.node.as_str(), loc.port.as_str()), ("1", "101", "eth1/49"));
/// assert!(parse_port_location("uni/tn-common").is_none());
/// ```
#[must_use]
pub fn parse_port_location(dn: &str) -> Option<PortLocation> {
    let caps = PORT_DN.as_ref()?.captures(dn)?;
    Some(PortLocation {
        pod: caps["pod"].to_owned(),
        node: caps["node"].to_owned(),
        port: caps["port"].to_owned(),
    })
}

/// One exported transceiver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransceiverRow {
    /// Object dn.
    pub dn: String,
    /// Reported optic type.
    pub actual_type: String,
    /// Cisco product id.
    pub gui_cisco_pid: String,
    /// Cisco part number.
    pub gui_cisco_pn: String,
    /// Vendor name.
    pub gui_name: String,
    /// Vendor part number.
    pub gui_pn: String,
}

impl TransceiverRow {
    /// Reads a row from an `ethpmFcot` object. Missing attributes become `""`.
    #[must_use]
    pub fn from_mo(mo: &ManagedObject) -> Self {
        let field = |name: &str| mo.attr(name).unwrap_or_default().to_owned();
        Self {
            dn: field("dn"),
            actual_type: field("actualType"),
            gui_cisco_pid: field("guiCiscoPID"),
            gui_cisco_pn: field("guiCiscoPN"),
            gui_name: field("guiName"),
            gui_pn: field("guiPN"),
        }
    }

    /// Returns `true` for empty or unreadable slots.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.actual_type == UNKNOWN_TYPE
    }

    /// Location parsed from the dn, or empty fields if it does not parse.
    #[must_use]
    pub fn location(&self) -> PortLocation {
        parse_port_location(&self.dn).unwrap_or_default()
    }
}

/// Builds rows for every known transceiver, in input order.
#[must_use]
pub fn collect_rows(objects: &[ManagedObject]) -> Vec<TransceiverRow> {
    let rows: Vec<TransceiverRow> = objects
        .iter()
        .filter(|mo| mo.is_class(TRANSCEIVER_CLASS))
        .map(TransceiverRow::from_mo)
        .filter(|row| !row.is_unknown())
        .collect();
    debug!(objects = objects.len(), rows = rows.len(), "Collected transceiver rows");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fcot(dn: &str, actual_type: &str) -> ManagedObject {
        ManagedObject::new(TRANSCEIVER_CLASS)
            .with_attr("dn", dn)
            .with_attr("actualType", actual_type)
            .with_attr("guiCiscoPID", "QSFP-100G-SR4-S")
            .with_attr("guiCiscoPN", "10-3142-03")
            .with_attr("guiName", "CISCO-AVAGO")
            .with_attr("guiPN", "AFBR-89CDDZ-CS1")
    }

    #[test]
    fn test_from_mo_reads_all_fields() {
        let row = TransceiverRow::from_mo(&fcot(
            "topology/pod-1/node-101/sys/phys-[eth1/49]/phys/fcot",
            "QSFP-100G-SR4",
        ));
        assert_eq!(row.actual_type, "QSFP-100G-SR4");
        assert_eq!(row.gui_cisco_pid, "QSFP-100G-SR4-S");
        assert_eq!(row.gui_cisco_pn, "10-3142-03");
        assert_eq!(row.gui_name, "CISCO-AVAGO");
        assert_eq!(row.gui_pn, "AFBR-89CDDZ-CS1");
    }

    #[test]
    fn test_from_mo_missing_attributes_are_empty() {
        let row = TransceiverRow::from_mo(&ManagedObject::new(TRANSCEIVER_CLASS).with_attr("dn", "x"));
        assert_eq!(row.dn, "x");
        assert_eq!(row.actual_type, "");
        assert_eq!(row.gui_pn, "");
    }

    #[test]
    fn test_collect_rows_skips_unknown_and_other_classes() {
        let objects = vec![
            fcot("topology/pod-1/node-101/sys/phys-[eth1/1]/phys/fcot", "10G-SR"),
            fcot("topology/pod-1/node-101/sys/phys-[eth1/2]/phys/fcot", "unknown"),
            ManagedObject::new("ethpmPhysIf").with_attr("actualType", "10G-SR"),
            fcot("topology/pod-2/node-201/sys/phys-[eth1/3]/phys/fcot", "25G-LR"),
        ];
        let rows = collect_rows(&objects);
        let types: Vec<&str> = rows.iter().map(|r| r.actual_type.as_str()).collect();
        assert_eq!(types, vec!["10G-SR", "25G-LR"]);
    }

    #[test]
    fn test_parse_port_location_breakout_port() {
        let loc = parse_port_location("topology/pod-12/node-1203/sys/phys-[eth1/1/4]/phys/fcot").unwrap();
        assert_eq!(loc.pod, "12");
        assert_eq!(loc.node, "1203");
        assert_eq!(loc.port, "eth1/1/4");
    }

    #[test]
    fn test_location_defaults_when_unparseable() {
        let row = TransceiverRow {
            dn: "sys/phys-[eth1/1]".to_owned(),
            ..TransceiverRow::default()
        };
        assert_eq!(row.location(), PortLocation::default());
    }
}
