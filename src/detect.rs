//! PDF header sniffing.
//!
//! Checked before handing a file to the PDF library so that obviously wrong
//! inputs (HTML, empty files, truncated downloads) fail with a clear message.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the header of `path` and return the declared PDF version.
///
/// Every failure is reported as [`Error::DocumentOpen`] naming the path.
pub fn sniff_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| Error::document_open(path, e))?;

    let mut header = Vec::with_capacity(16);
    file.by_ref()
        .take(16)
        .read_to_end(&mut header)
        .map_err(|e| Error::document_open(path, e))?;

    pdf_version_from_bytes(&header).ok_or_else(|| {
        Error::document_open(path, "not a PDF file (missing %PDF- header)")
    })
}

/// Extract the version string (e.g. "1.7") from the first bytes of a file.
pub fn pdf_version_from_bytes(data: &[u8]) -> Option<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return None;
    }

    let version = String::from_utf8_lossy(&data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN]);
    is_valid_version(&version).then(|| version.to_string())
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_version_from_valid_header() {
        assert_eq!(
            pdf_version_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"),
            Some("1.7".to_string())
        );
        assert_eq!(pdf_version_from_bytes(b"%PDF-2.0\n"), Some("2.0".to_string()));
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert_eq!(pdf_version_from_bytes(b"<!DOCTYPE html>"), None);
        assert_eq!(pdf_version_from_bytes(b"%PDF"), None);
        assert_eq!(pdf_version_from_bytes(b""), None);
        assert_eq!(pdf_version_from_bytes(b"%PDF-x.y\n"), None);
    }

    #[test]
    fn test_sniff_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = sniff_pdf_version(dir.path().join("nope.pdf"));
        assert!(matches!(result, Err(Error::DocumentOpen { .. })));
    }

    #[test]
    fn test_sniff_short_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF").unwrap();
        let result = sniff_pdf_version(file.path());
        assert!(matches!(result, Err(Error::DocumentOpen { .. })));
    }
}
