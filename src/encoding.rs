//! Encoding identifiers and codecs built on `encoding_rs`.
//!
//! `encoding_rs` covers UTF-8, UTF-16 and the WHATWG code pages. UTF-32 and
//! UTF-7 are implemented here, and Latin-1 is kept distinct from windows-1252
//! (WHATWG folds the two labels together) so that it stays a total one-to-one
//! byte mapping.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoder, EncoderResult, Encoding};
use simdutf8::basic::from_utf8;

use crate::error::EncodingError;
use crate::utf7;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// A supported text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingId {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    Utf7,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// Any other encoding known to `encoding_rs`, see [`EncodingId::from_encoding_rs`].
    Codepage(Codepage),
}

/// An `encoding_rs` encoding other than UTF-8 and UTF-16.
///
/// Only [`EncodingId::from_encoding_rs`] builds one, so each encoding has exactly
/// one `EncodingId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codepage(&'static Encoding);

impl Codepage {
    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }
}

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso88591",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "latin-1",
    "l1",
    "cp819",
    "ibm819",
    "csisolatin1",
];

impl EncodingId {
    /// Map an `encoding_rs` encoding onto the matching variant.
    pub fn from_encoding_rs(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            EncodingId::Utf8
        } else if encoding == encoding_rs::UTF_16LE {
            EncodingId::Utf16Le
        } else if encoding == encoding_rs::UTF_16BE {
            EncodingId::Utf16Be
        } else {
            EncodingId::Codepage(Codepage(encoding))
        }
    }

    /// Resolve an encoding label such as `utf-8`, `Latin1` or `windows-1251`.
    ///
    /// Matching ignores ASCII case and surrounding whitespace. Returns None for
    /// unknown labels and for labels that WHATWG maps to the replacement encoding.
    pub fn for_label(label: &[u8]) -> Option<Self> {
        let label = std::str::from_utf8(label).ok()?.trim().to_ascii_lowercase();

        if LATIN1_LABELS.contains(&label.as_str()) {
            return Some(EncodingId::Latin1);
        }

        match label.as_str() {
            "utf-32" | "utf32" | "utf-32le" | "utf32le" => Some(EncodingId::Utf32Le),
            "utf-32be" | "utf32be" => Some(EncodingId::Utf32Be),
            "utf-7" | "utf7" | "unicode-1-1-utf-7" | "csunicode11utf7" => Some(EncodingId::Utf7),
            other => {
                Encoding::for_label_no_replacement(other.as_bytes()).map(Self::from_encoding_rs)
            }
        }
    }

    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        match self {
            EncodingId::Utf8 => "UTF-8",
            EncodingId::Utf16Le => "UTF-16LE",
            EncodingId::Utf16Be => "UTF-16BE",
            EncodingId::Utf32Le => "UTF-32LE",
            EncodingId::Utf32Be => "UTF-32BE",
            EncodingId::Utf7 => "UTF-7",
            EncodingId::Latin1 => "ISO-8859-1",
            EncodingId::Codepage(codepage) => codepage.0.name(),
        }
    }

    /// The byte-order mark the encoder writes in front of the text, if any.
    pub fn preamble(&self) -> &'static [u8] {
        match self {
            EncodingId::Utf8 => &[0xEF, 0xBB, 0xBF],
            EncodingId::Utf16Le => &[0xFF, 0xFE],
            EncodingId::Utf16Be => &[0xFE, 0xFF],
            EncodingId::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            EncodingId::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            EncodingId::Utf7 | EncodingId::Latin1 | EncodingId::Codepage(_) => &[],
        }
    }

    /// Whether every byte sequence decodes without error.
    pub fn is_total(&self) -> bool {
        match self {
            EncodingId::Latin1 => true,
            EncodingId::Codepage(codepage) => {
                codepage.0 == encoding_rs::WINDOWS_1252 || codepage.0 == encoding_rs::X_USER_DEFINED
            }
            _ => false,
        }
    }

    /// UTF-7 can smuggle markup past filters that only look at ASCII.
    pub fn is_secure(&self) -> bool {
        !matches!(self, EncodingId::Utf7)
    }

    /// Decode bytes, replacing malformed sequences with U+FFFD.
    ///
    /// A leading BOM is not consumed; it surfaces as U+FEFF.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            EncodingId::Utf8 => String::from_utf8_lossy(bytes),
            EncodingId::Utf16Le => encoding_rs::UTF_16LE.decode_without_bom_handling(bytes).0,
            EncodingId::Utf16Be => encoding_rs::UTF_16BE.decode_without_bom_handling(bytes).0,
            EncodingId::Utf32Le => {
                Cow::Owned(decode_utf32(bytes, u32::from_le_bytes, false).unwrap_or_default())
            }
            EncodingId::Utf32Be => {
                Cow::Owned(decode_utf32(bytes, u32::from_be_bytes, false).unwrap_or_default())
            }
            EncodingId::Utf7 => Cow::Owned(utf7::decode(bytes, false).unwrap_or_default()),
            EncodingId::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            EncodingId::Codepage(codepage) => codepage.0.decode_without_bom_handling(bytes).0,
        }
    }

    /// Decode bytes, returning None on the first malformed sequence.
    pub fn decode_strict<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            EncodingId::Utf8 => from_utf8(bytes).ok().map(Cow::Borrowed),
            EncodingId::Utf16Le => {
                encoding_rs::UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes)
            }
            EncodingId::Utf16Be => {
                encoding_rs::UTF_16BE.decode_without_bom_handling_and_without_replacement(bytes)
            }
            EncodingId::Utf32Le => decode_utf32(bytes, u32::from_le_bytes, true).map(Cow::Owned),
            EncodingId::Utf32Be => decode_utf32(bytes, u32::from_be_bytes, true).map(Cow::Owned),
            EncodingId::Utf7 => utf7::decode(bytes, true).map(Cow::Owned),
            EncodingId::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            EncodingId::Codepage(codepage) => {
                codepage.0.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }

    /// Encode text without a preamble. Characters the encoding cannot represent
    /// become `?`.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            EncodingId::Utf8 => Cow::Borrowed(text.as_bytes()),
            EncodingId::Utf16Le => {
                Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
            }
            EncodingId::Utf16Be => {
                Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
            }
            EncodingId::Utf32Le => Cow::Owned(
                text.chars()
                    .flat_map(|c| u32::from(c).to_le_bytes())
                    .collect(),
            ),
            EncodingId::Utf32Be => Cow::Owned(
                text.chars()
                    .flat_map(|c| u32::from(c).to_be_bytes())
                    .collect(),
            ),
            EncodingId::Utf7 => Cow::Owned(utf7::encode(text)),
            EncodingId::Latin1 => encode_latin1(text),
            EncodingId::Codepage(codepage) => {
                Cow::Owned(encode_codepage(codepage.0.new_encoder(), text))
            }
        }
    }
}

impl fmt::Display for EncodingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingId {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncodingId::for_label(s.as_bytes())
            .ok_or_else(|| EncodingError::UnsupportedEncoding(s.to_string()))
    }
}

fn decode_utf32(bytes: &[u8], read: fn([u8; 4]) -> u32, strict: bool) -> Option<String> {
    let chunks = bytes.chunks_exact(4);
    if strict && !chunks.remainder().is_empty() {
        return None;
    }
    let trailing = !chunks.remainder().is_empty();

    let mut out = String::with_capacity(bytes.len() / 4);
    for chunk in chunks {
        let unit = read([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match char::from_u32(unit) {
            Some(c) => out.push(c),
            None if strict => return None,
            None => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    if trailing {
        out.push(char::REPLACEMENT_CHARACTER);
    }

    Some(out)
}

fn encode_latin1(text: &str) -> Cow<'_, [u8]> {
    if encoding_rs::mem::is_str_latin1(text) {
        return encoding_rs::mem::encode_latin1_lossy(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect(),
    )
}

fn encode_codepage(mut encoder: Encoder, text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 1024];
    let mut src = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(src, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    out
}
