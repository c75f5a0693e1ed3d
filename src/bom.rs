//! Byte-order mark signatures and prefix matching.

use crate::encoding::EncodingId;

/// A byte-order mark and the encoding it announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub encoding: EncodingId,
    pub bytes: &'static [u8],
}

impl Signature {
    const fn new(encoding: EncodingId, bytes: &'static [u8]) -> Self {
        Self { encoding, bytes }
    }

    /// Number of bytes to skip before decoding.
    ///
    /// Zero for UTF-7: the third byte of its signature also carries bits of the
    /// first character, so the decoder has to see it.
    pub fn skip_len(&self) -> usize {
        match self.encoding {
            EncodingId::Utf7 => 0,
            _ => self.bytes.len(),
        }
    }

    /// Whether `data` starts with this signature.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.starts_with(self.bytes)
    }
}

/// Known signatures, most specific first.
///
/// `FF FE` is a prefix of the UTF-32LE mark, so UTF-32LE has to be tested before UTF-16LE.
pub static SIGNATURES: [Signature; 6] = [
    Signature::new(EncodingId::Utf32Be, &[0x00, 0x00, 0xFE, 0xFF]),
    Signature::new(EncodingId::Utf32Le, &[0xFF, 0xFE, 0x00, 0x00]),
    Signature::new(EncodingId::Utf16Be, &[0xFE, 0xFF]),
    Signature::new(EncodingId::Utf16Le, &[0xFF, 0xFE]),
    Signature::new(EncodingId::Utf8, &[0xEF, 0xBB, 0xBF]),
    Signature::new(EncodingId::Utf7, &[0x2B, 0x2F, 0x76]),
];

/// Find the first signature `data` starts with.
pub fn match_bom(data: &[u8]) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|signature| signature.matches(data))
}

/// Check if the data starts with any known byte-order mark.
pub fn has_bom(data: &[u8]) -> bool {
    match_bom(data).is_some()
}

/// Skip the byte-order mark if present and return the remaining data.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    match match_bom(data) {
        Some(signature) => &data[signature.skip_len()..],
        None => data,
    }
}
