//! # Persistence Gate
//!
//! Writes a rewritten unit back to disk only when it actually differs
//! from the original, re-encoding the rendered text in whatever encoding
//! the file currently uses so a non-UTF-8 source never gets silently
//! converted. Detection samples the file's current bytes at write time.
//!
//! Writes are not transactional: no atomic rename, no backup. A crash
//! mid-write can leave a partial file; callers wanting stronger
//! guarantees must layer them on top.

use crate::errors::RewriteError;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::path::Path;
use treescribe_syntax::SyntaxTree;

/// What the gate decided for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Result is equivalent to the input; nothing happened.
    Unchanged,
    /// Result differs but the document has no backing file.
    ChangedInMemory,
    /// Result differs and was written back.
    Written,
}

/// Compare, and write back when different and file-backed.
pub(crate) fn persist(
    original: &SyntaxTree,
    rewritten: &SyntaxTree,
    path: Option<&Path>,
) -> Result<PersistOutcome, RewriteError> {
    if rewritten.is_equivalent_to(original) {
        return Ok(PersistOutcome::Unchanged);
    }

    let Some(path) = path else {
        return Ok(PersistOutcome::ChangedInMemory);
    };

    let current = std::fs::read(path)?;
    let encoding = detect_encoding(&current);

    let text = rewritten.to_source_text();
    let (encoded, _, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        return Err(RewriteError::EncodingDetection {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }

    tracing::debug!(path = %path.display(), encoding = encoding.name(), "writing rewritten document");
    std::fs::write(path, &encoded)?;
    Ok(PersistOutcome::Written)
}

/// Sniff the encoding of the file's current bytes. A byte-order mark
/// wins outright; otherwise the statistical detector decides.
pub(crate) fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode file bytes with the same detection used at write time.
pub(crate) fn decode_bytes(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_wins_detection() {
        let bytes = [0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(detect_encoding(&bytes), encoding_rs::UTF_8);
    }

    #[test]
    fn test_plain_ascii_decodes_verbatim() {
        assert_eq!(decode_bytes(b"class C { }"), "class C { }");
    }

    #[test]
    fn test_windows_1252_roundtrip() {
        // "// café" with the é as a single 0xE9 byte.
        let bytes = b"// caf\xE9\nclass C { }".to_vec();
        let text = decode_bytes(&bytes);
        assert!(text.contains("café"));

        let encoding = detect_encoding(&bytes);
        let (encoded, _, _) = encoding.encode(&text);
        assert_eq!(encoded.as_ref(), bytes.as_slice());
    }
}
