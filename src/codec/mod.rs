//! Document codec
//!
//! Converts between the persisted HTML table and standings rows.
//!
//! # Document shape
//!
//! ```text
//! <table>
//!  <thead> #  | Team | Points | Status </thead>
//!  <tbody> 1  | Alpha| 50     | 🟩🟩🟥🟥 </tbody>
//! </table>
//! ```
//!
//! The first header label may also be the legacy `Rank`. Status cells use
//! document glyphs on disk and are translated to display glyphs on decode.
//!
//! Decoding yields a [`DocumentSkeleton`]; encoding renders rows into it.
//! The skeleton is never mutated, so a save never depends on a previous
//! save's output.

mod decoder;
mod encoder;
mod errors;
mod markup;
mod skeleton;

pub use decoder::DecodedDocument;
pub use errors::{LoadError, LoadResult, RowWarning};
pub use skeleton::DocumentSkeleton;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::standings::Row;

/// Entry point for document conversion.
pub struct DocumentCodec;

impl DocumentCodec {
    /// Decodes raw document text.
    ///
    /// # Errors
    ///
    /// `LoadError::NoTable` or `LoadError::BadHeader`. Row-level problems are
    /// returned as warnings inside the [`DecodedDocument`].
    pub fn decode(raw: &str) -> LoadResult<DecodedDocument> {
        decoder::decode(raw)
    }

    /// Encodes rows into a document built on `skeleton`.
    pub fn encode(skeleton: &DocumentSkeleton, rows: &[Row]) -> String {
        encoder::encode(skeleton, rows)
    }

    /// Reads and decodes the document at `path`.
    ///
    /// # Errors
    ///
    /// - `LoadError::NotFound` if nothing exists at `path`
    /// - `LoadError::Unreadable` for other I/O failures or non-UTF-8 content
    /// - any error from [`DocumentCodec::decode`]
    pub fn read_file(path: &Path) -> LoadResult<DecodedDocument> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.display().to_string(),
            },
            _ => LoadError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;

        Self::decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_not_found() {
        let dir = TempDir::new().unwrap();
        let result = DocumentCodec::read_file(&dir.path().join("missing.html"));
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_read_file_non_utf8_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.html");
        fs::write(&path, [0xFF, 0xFE, 0x00, 0x80]).unwrap();

        let result = DocumentCodec::read_file(&path);
        assert!(matches!(result, Err(LoadError::Unreadable { .. })));
    }

    #[test]
    fn test_read_file_decodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("standings.html");
        fs::write(&path, DocumentCodec::encode(&DocumentSkeleton::empty(), &[])).unwrap();

        let decoded = DocumentCodec::read_file(&path).unwrap();
        assert!(decoded.rows.is_empty());
        assert!(decoded.skeleton.has_header());
    }
}
