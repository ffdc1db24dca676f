//! Error types for the apic-inventory crate.

use camino::Utf8PathBuf;

/// Errors that can occur while exporting inventory.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Creates a new [`ExportError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_display() {
        let error = ExportError::write(
            "/readonly/xsfp.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = error.to_string();
        assert!(msg.contains("/readonly/xsfp.csv"));
        assert!(msg.contains("denied"));
        let ExportError::Write { path, source } = &error;
        assert_eq!(path.as_str(), "/readonly/xsfp.csv");
        assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
    }
}
