//! Heuristic encoding sniffers, used when the data carries no byte-order mark.
//!
//! Strategies run in a fixed priority order: structural UTF-8, zero-byte
//! UTF-16 statistics, then an inline `charset=`/`encoding=` declaration.

pub mod declared;
pub mod guess;
pub mod utf16;
pub mod utf8;

use crate::detector::Confidence;
use crate::encoding::EncodingId;

/// A sniffer examines a sample and either names an encoding or abstains.
pub type Strategy = fn(&[u8]) -> Option<EncodingId>;

/// All strategies in priority order.
pub const STRATEGIES: [(Confidence, Strategy); 3] = [
    (Confidence::HeuristicUtf8, utf8::sniff),
    (Confidence::HeuristicUtf16, utf16::sniff),
    (Confidence::Declared, declared::sniff),
];

/// Run the strategies in order and return the first hit.
pub fn sniff(sample: &[u8]) -> Option<(EncodingId, Confidence)> {
    STRATEGIES
        .iter()
        .find_map(|(confidence, strategy)| strategy(sample).map(|id| (id, *confidence)))
}
