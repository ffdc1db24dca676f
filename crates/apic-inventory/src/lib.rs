//! SFP transceiver inventory export.
//!
//! Turns `ethpmFcot` objects fetched from a controller into CSV rows. Slots
//! reporting an `unknown` type are dropped. The [`CsvLayout::WithLocation`]
//! layout adds the pod, node and interface parsed from each dn.
//!
//! # Example
//!
//! ```
//! use apic_core::{CsvLayout, ManagedObject};
//! use apic_inventory::{collect_rows, render_csv};
//!
//! let objects = vec![
//!     ManagedObject::new("ethpmFcot")
//!         .with_attr("dn", "topology/pod-1/node-101/sys/phys-[eth1/49]/phys/fcot")
//!         .with_attr("actualType", "QSFP-100G-SR4"),
//! ];
//! let csv = render_csv(&collect_rows(&objects), CsvLayout::WithLocation);
//! assert!(csv.contains(",1,101,eth1/49,QSFP-100G-SR4,"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod csv;
mod error;
mod sfp;

pub use apic_core::CsvLayout;
pub use csv::{escape_csv, render_csv, write_csv};
pub use error::ExportError;
pub use sfp::{
    PortLocation, TRANSCEIVER_CLASS, TransceiverRow, UNKNOWN_TYPE, collect_rows,
    parse_port_location,
};
