//! CSV rendering of transceiver rows.
//!
//! Fields are quoted only when they contain a comma, a double quote or a line
//! break; embedded quotes are doubled. Records end with `\r\n`.

use std::borrow::Cow;
use std::fmt::Write as _;

use apic_core::CsvLayout;
use camino::Utf8Path;
use tracing::info;

use crate::error::ExportError;
use crate::sfp::TransceiverRow;

const LINE_END: &str = "\r\n";

const BASIC_HEADER: [&str; 6] = [
    "dn",
    "actualType",
    "guiCiscoPID",
    "guiCiscoPN",
    "guiName",
    "guiPN",
];

const LOCATION_HEADER: [&str; 9] = [
    "dn",
    "pod",
    "node",
    "port",
    "actualType",
    "guiCiscoPID",
    "guiCiscoPN",
    "guiName",
    "guiPN",
];

/// Quotes `field` if it needs quoting.
///
/// # Examples
///
/// ```
/// use apic_inventory::escape_csv;
///
/// assert_eq!(escape_csv("eth1/49"), "eth1/49");
/// assert_eq!(escape_csv("a,b"), "\"a,b\"");
/// assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
#[must_use]
pub fn escape_csv(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", escape_csv(field));
    }
    out.push_str(LINE_END);
}

/// Renders a header plus one record per row.
#[must_use]
pub fn render_csv(rows: &[TransceiverRow], layout: CsvLayout) -> String {
    let mut out = String::new();
    match layout {
        CsvLayout::WithLocation => {
            push_record(&mut out, LOCATION_HEADER);
            for row in rows {
                let loc = row.location();
                push_record(
                    &mut out,
                    [
                        row.dn.as_str(),
                        loc.pod.as_str(),
                        loc.node.as_str(),
                        loc.port.as_str(),
                        row.actual_type.as_str(),
                        row.gui_cisco_pid.as_str(),
                        row.gui_cisco_pn.as_str(),
                        row.gui_name.as_str(),
                        row.gui_pn.as_str(),
                    ],
                );
            }
        }
        _ => {
            push_record(&mut out, BASIC_HEADER);
            for row in rows {
                push_record(
                    &mut out,
                    [
                        row.dn.as_str(),
                        row.actual_type.as_str(),
                        row.gui_cisco_pid.as_str(),
                        row.gui_cisco_pn.as_str(),
                        row.gui_name.as_str(),
                        row.gui_pn.as_str(),
                    ],
                );
            }
        }
    }
    out
}

/// Renders `rows` and writes them to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError::Write`] if the file cannot be written.
pub fn write_csv(path: &Utf8Path, rows: &[TransceiverRow], layout: CsvLayout) -> Result<(), ExportError> {
    let rendered = render_csv(rows, layout);
    std::fs::write(path, rendered).map_err(|source| ExportError::write(path, source))?;
    info!(path = %path, rows = rows.len(), ?layout, "Wrote transceiver inventory");
    Ok(())
}
