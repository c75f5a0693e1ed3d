//! magic-encoding: text file encoding detection and transcoding
//!
//! Determines the character encoding of a byte stream without external metadata,
//! then converts the text to a chosen target encoding.
//!
//! # Quick Start
//!
//! ```no_run
//! use magic_encoding::{get_acceptable_encoding_for_file, read_all_text_from_file, EncodingId};
//!
//! let encoding = get_acceptable_encoding_for_file("notes.txt", None).unwrap();
//! println!("Encoding: {encoding}");
//!
//! let text = read_all_text_from_file("notes.txt", EncodingId::Utf8, None).unwrap();
//! println!("{text}");
//! ```
//!
//! # Detection Order
//!
//! 1. A byte-order mark (UTF-32BE, UTF-32LE, UTF-16BE, UTF-16LE, UTF-8, UTF-7)
//! 2. A structural UTF-8 scan that requires at least one multi-byte sequence
//! 3. Zero-byte statistics for BOM-less UTF-16
//! 4. An inline `charset=` or `encoding=` declaration
//! 5. The fallback, ISO-8859-1 by default, which decodes any byte sequence
//!
//! Steps 2-4 look at a bounded window ("taster") of the input, see [`Detector`]
//! and [`Taster`] to configure it.

pub mod bom;
mod detector;
mod encoding;
mod error;
mod sample;
pub mod sniff;
mod transcode;
mod utf7;
mod validate;

use std::path::Path;

pub use detector::{Confidence, DEFAULT_FALLBACK, DetectionResult, Detector};
pub use encoding::{Codepage, EncodingId, is_utf8};
pub use error::{EncodingError, Result};
pub use sample::Taster;
pub use transcode::{
    DEFAULT_TARGET, encode_text, ensure_secure, read_all_text, read_all_text_from_file,
    transcode, write_all_text, write_all_text_with_label,
};
pub use validate::{PARSE_CANDIDATES, first_acceptable, validate_full_decode};

/// Find an acceptable encoding for the data.
///
/// Never fails: with no byte-order mark and no heuristic match, `fallback` (or
/// ISO-8859-1) is returned.
pub fn get_acceptable_encoding(data: &[u8], fallback: Option<EncodingId>) -> EncodingId {
    let mut detector = Detector::new();
    detector.fallback(fallback.unwrap_or(DEFAULT_FALLBACK));
    detector.encoding(data)
}

/// Find an acceptable encoding for a file. The whole file is read.
pub fn get_acceptable_encoding_for_file<P: AsRef<Path>>(
    path: P,
    fallback: Option<EncodingId>,
) -> Result<EncodingId> {
    let data = std::fs::read(path.as_ref())?;
    Ok(get_acceptable_encoding(&data, fallback))
}
