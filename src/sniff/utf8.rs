//! Structural UTF-8 scan.

use crate::encoding::EncodingId;

#[inline]
fn is_continuation(b: u8) -> bool {
    (0x80..=0xBF).contains(&b)
}

#[inline]
fn continuations(sample: &[u8], lead: usize, count: usize) -> bool {
    sample[lead + 1..=lead + count].iter().all(|&b| is_continuation(b))
}

/// Walk the sample and report whether it contains well-formed multi-byte UTF-8.
///
/// ASCII bytes are inconclusive: pure ASCII input returns false so that it is left to
/// the later strategies and the fallback. Any byte that does not start a valid sequence
/// ends the scan with false. The last four positions are never used as a lead byte, so
/// multi-byte lookahead stays inside the sample.
pub fn looks_like_utf8(sample: &[u8]) -> bool {
    let end = sample.len().saturating_sub(4);
    let mut utf8 = false;
    let mut i = 0;

    while i < end {
        let b = sample[i];
        if b <= 0x7F {
            i += 1;
            continue;
        }

        if (0xC2..=0xDF).contains(&b) && continuations(sample, i, 1) {
            i += 2;
            utf8 = true;
            continue;
        }

        // 0xF0 is accepted here as well as below.
        if (0xE0..=0xF0).contains(&b) && continuations(sample, i, 2) {
            i += 3;
            utf8 = true;
            continue;
        }

        if (0xF0..=0xF4).contains(&b) && continuations(sample, i, 3) {
            i += 4;
            utf8 = true;
            continue;
        }

        return false;
    }

    utf8
}

pub fn sniff(sample: &[u8]) -> Option<EncodingId> {
    looks_like_utf8(sample).then_some(EncodingId::Utf8)
}
