//! Strict full-buffer decode checks.

use tracing::trace;

use crate::encoding::EncodingId;

/// Candidates tried, in order, by [`first_acceptable`] when the caller has no
/// preference.
pub const PARSE_CANDIDATES: [EncodingId; 3] =
    [EncodingId::Utf8, EncodingId::Latin1, EncodingId::Utf7];

/// Decode the entire buffer under `encoding` with no replacement characters.
///
/// Returns false on the first malformed sequence. This is O(n) in the buffer size and,
/// unlike the heuristic sniffers, never looks at a shorter window. Encodings that
/// accept every byte sequence are not decoded at all.
pub fn validate_full_decode(data: &[u8], encoding: EncodingId) -> bool {
    if encoding.is_total() {
        return true;
    }
    let valid = encoding.decode_strict(data).is_some();
    trace!(encoding = %encoding, valid, len = data.len(), "strict decode");
    valid
}

/// Return the first candidate that decodes the whole buffer cleanly.
pub fn first_acceptable(data: &[u8], candidates: &[EncodingId]) -> Option<EncodingId> {
    candidates
        .iter()
        .copied()
        .find(|&candidate| validate_full_decode(data, candidate))
}
