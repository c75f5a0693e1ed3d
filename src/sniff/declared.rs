//! Inline `charset=` / `encoding=` declarations, as found in HTML meta tags,
//! XML prologs and MIME headers.

use tracing::{debug, trace};

use crate::encoding::EncodingId;

const CHARSET_MARKER: &[u8] = b"charset=";
const ENCODING_MARKER: &[u8] = b"encoding=";

fn marker_at(sample: &[u8], n: usize) -> Option<usize> {
    let rest = &sample[n..];
    [CHARSET_MARKER, ENCODING_MARKER]
        .into_iter()
        .find(|marker| {
            rest.len() >= marker.len() && rest[..marker.len()].eq_ignore_ascii_case(marker)
        })
        .map(<[u8]>::len)
}

fn is_label_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Find the first declared label in the sample.
///
/// The marker match is ASCII case-insensitive. One opening quote is skipped, then the
/// label is the longest run of `[A-Za-z0-9_-]`. The scan stops nine bytes before the
/// end of the sample.
pub fn declared_label(sample: &[u8]) -> Option<&[u8]> {
    let end = sample.len().saturating_sub(ENCODING_MARKER.len());
    let mut start = (0..end).find_map(|n| marker_at(sample, n).map(|len| n + len))?;

    if matches!(sample.get(start), Some(b'"' | b'\'')) {
        start += 1;
    }
    let len = sample[start..].iter().take_while(|&&b| is_label_byte(b)).count();

    Some(&sample[start..start + len])
}

/// Resolve the first declared label. An unknown label ends the search; later
/// declarations are not considered.
pub fn sniff(sample: &[u8]) -> Option<EncodingId> {
    let label = declared_label(sample)?;
    match EncodingId::for_label(label) {
        Some(id) => {
            trace!(encoding = %id, "found declared charset");
            Some(id)
        }
        None => {
            debug!(
                label = %String::from_utf8_lossy(label),
                "ignoring unsupported declared charset"
            );
            None
        }
    }
}
