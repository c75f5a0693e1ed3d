//! Reading text of unknown encoding and writing text in a chosen encoding.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::detector::Detector;
use crate::encoding::EncodingId;
use crate::error::{EncodingError, Result};

/// Target used when the caller does not name one.
pub const DEFAULT_TARGET: EncodingId = EncodingId::Utf16Le;

const BOM_CHAR: char = '\u{FEFF}';

impl Detector {
    /// Detect the encoding of `data` and convert it to `target`.
    ///
    /// The output carries no byte-order mark. Characters `target` cannot
    /// represent become `?`.
    pub fn transcode(&self, data: &[u8], target: EncodingId) -> Vec<u8> {
        let detected = self.detect(data);
        let text = detected.encoding.decode(detected.payload(data));
        let text = text.trim_start_matches(BOM_CHAR);
        debug!(source = %detected.encoding, target = %target, "transcoding");
        target.encode(text).into_owned()
    }

    /// Detect the encoding of `data` and return its text as seen through `target`.
    ///
    /// Any leading U+FEFF is removed, whether or not the source had a byte-level mark.
    pub fn read_text(&self, data: &[u8], target: EncodingId) -> String {
        let converted = self.transcode(data, target);
        target
            .decode(&converted)
            .trim_start_matches(BOM_CHAR)
            .to_string()
    }

    /// Read a whole file and return its text as seen through `target`.
    pub fn read_text_path<P: AsRef<Path>>(&self, path: P, target: EncodingId) -> Result<String> {
        let data = fs::read(path.as_ref())?;
        Ok(self.read_text(&data, target))
    }
}

fn detector_with(fallback: Option<EncodingId>) -> Detector {
    let mut detector = Detector::new();
    if let Some(fallback) = fallback {
        detector.fallback(fallback);
    }
    detector
}

/// Convert `data` of unknown encoding to `target`.
pub fn transcode(data: &[u8], target: EncodingId, fallback: Option<EncodingId>) -> Vec<u8> {
    detector_with(fallback).transcode(data, target)
}

/// Read text of unknown encoding from bytes.
pub fn read_all_text(data: &[u8], target: EncodingId, fallback: Option<EncodingId>) -> String {
    detector_with(fallback).read_text(data, target)
}

/// Read text of unknown encoding from a file.
pub fn read_all_text_from_file<P: AsRef<Path>>(
    path: P,
    target: EncodingId,
    fallback: Option<EncodingId>,
) -> Result<String> {
    detector_with(fallback).read_text_path(path, target)
}

/// Encode text, prefixed with the encoding's byte-order mark if it has one.
pub fn encode_text(text: &str, encoding: EncodingId) -> Vec<u8> {
    let preamble = encoding.preamble();
    let body = encoding.encode(text);
    let mut out = Vec::with_capacity(preamble.len() + body.len());
    out.extend_from_slice(preamble);
    out.extend_from_slice(&body);
    out
}

/// Write text to a file in the given encoding, replacing any existing content.
///
/// Fails with [`EncodingError::InvalidArgument`] on an empty path before touching
/// the filesystem.
pub fn write_all_text<P: AsRef<Path>>(path: P, encoding: EncodingId, text: &str) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(EncodingError::InvalidArgument("path is empty".to_string()));
    }
    debug!(path = %path.display(), encoding = %encoding, "writing text");
    fs::write(path, encode_text(text, encoding))?;
    Ok(())
}

/// Like [`write_all_text`], with the encoding given by label.
///
/// An empty label is an [`EncodingError::InvalidArgument`], an unknown one an
/// [`EncodingError::UnsupportedEncoding`]; neither touches the filesystem.
pub fn write_all_text_with_label<P: AsRef<Path>>(path: P, label: &str, text: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(EncodingError::InvalidArgument("encoding is empty".to_string()));
    }
    let encoding: EncodingId = label.parse()?;
    write_all_text(path, encoding, text)
}

/// Refuse encodings that are unsafe to emit.
pub fn ensure_secure(encoding: EncodingId) -> Result<()> {
    if encoding.is_secure() {
        Ok(())
    } else {
        Err(EncodingError::InsecureEncoding(format!(
            "{encoding} can hide markup from ASCII-based filters"
        )))
    }
}
