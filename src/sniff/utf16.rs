//! Zero-byte statistics for BOM-less UTF-16.
//!
//! Latin-script UTF-16 text has a NUL high (or low) byte in most code units.

use crate::encoding::EncodingId;

/// Share of the sample that must be zero bytes on one parity.
pub const ZERO_THRESHOLD: f64 = 0.1;

fn zero_ratio(sample: &[u8], start: usize) -> f64 {
    let zeros = sample.iter().skip(start).step_by(2).filter(|&&b| b == 0).count();
    zeros as f64 / sample.len() as f64
}

/// Classify the sample as UTF-16 by counting zero bytes at even and odd offsets.
///
/// Zeros at even offsets mean big-endian, at odd offsets little-endian. Big-endian
/// is checked first, so it wins when both parities pass the threshold.
pub fn sniff(sample: &[u8]) -> Option<EncodingId> {
    if sample.is_empty() {
        return None;
    }

    // Each parity count is bounded by the total.
    let total = bytecount::count(sample, 0) as f64 / sample.len() as f64;
    if total <= ZERO_THRESHOLD {
        return None;
    }

    if zero_ratio(sample, 0) > ZERO_THRESHOLD {
        Some(EncodingId::Utf16Be)
    } else if zero_ratio(sample, 1) > ZERO_THRESHOLD {
        Some(EncodingId::Utf16Le)
    } else {
        None
    }
}
