//! Computes output file names for chapters. A chapter's file name depends
//! only on its book and its ordinal, never on its content: editing a chapter
//! keeps its name (and every link to it) stable across builds.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// The extension of every rendered chapter page.
pub const HTML_EXTENSION: &str = ".html";

/// The largest ordinal that fits the two-digit prefix. Larger ordinals still
/// work but widen the prefix, which breaks the fixed-width naming.
pub const MAX_FIXED_WIDTH_ORDINAL: usize = 99;

/// Returns the file name for the chapter at the 1-based `ordinal` of `book`,
/// e.g. `01-x2KdLw.html`.
pub fn file_name(book: &str, ordinal: usize) -> String {
    format!("{:02}-{}{}", ordinal, digest(book, ordinal), HTML_EXTENSION)
}

/// A short token derived from `book` and `ordinal`: the CRC-32 of
/// `{book}/{ordinal}` as unpadded URL-safe base64. Always six characters
/// from `[A-Za-z0-9_-]`.
pub fn digest(book: &str, ordinal: usize) -> String {
    let hash = crc32fast::hash(format!("{}/{}", book, ordinal).as_bytes());
    URL_SAFE_NO_PAD.encode(hash.to_be_bytes())
}
