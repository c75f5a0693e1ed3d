//! Encoding resolution: byte-order mark, then heuristics, then fallback.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bom::match_bom;
use crate::encoding::EncodingId;
use crate::error::Result;
use crate::sample::Taster;
use crate::sniff::{self, guess};
use crate::validate::validate_full_decode;

/// Encoding used when nothing else applies. Latin-1 decodes any byte sequence.
pub const DEFAULT_FALLBACK: EncodingId = EncodingId::Latin1;

/// How an encoding was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A byte-order mark named the encoding.
    Bom,
    /// The structural UTF-8 scan found multi-byte sequences.
    HeuristicUtf8,
    /// Zero-byte statistics pointed at UTF-16.
    HeuristicUtf16,
    /// An inline `charset=` or `encoding=` declaration.
    Declared,
    /// `chardetng` guessed a code page.
    Guessed,
    /// Nothing matched, the fallback was used.
    Fallback,
}

/// Result of encoding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionResult {
    /// The detected encoding.
    pub encoding: EncodingId,
    /// Length of the byte-order mark to skip, 0 when there is none (or for UTF-7).
    pub bom_len: usize,
    /// Which step decided.
    pub confidence: Confidence,
}

impl DetectionResult {
    pub const fn new(encoding: EncodingId, bom_len: usize, confidence: Confidence) -> Self {
        Self {
            encoding,
            bom_len,
            confidence,
        }
    }

    /// The data following the byte-order mark.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.bom_len.min(data.len())..]
    }
}

/// Text encoding detector.
///
/// # Example
///
/// ```
/// use magic_encoding::{Detector, EncodingId, Taster};
///
/// let mut detector = Detector::new();
/// detector.taster(Taster::Bytes(4096)).fallback(EncodingId::Latin1);
///
/// let result = detector.detect("grüße".as_bytes());
/// assert_eq!(result.encoding, EncodingId::Utf8);
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    /// Window examined by the heuristics.
    taster: Taster,
    /// Encoding returned when nothing matches.
    fallback: EncodingId,
    /// Require heuristic candidates to decode the whole buffer strictly.
    verify: bool,
    /// Ask `chardetng` before settling on the fallback.
    guess_fallback: bool,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Create a new Detector with default settings.
    pub fn new() -> Self {
        Self {
            taster: Taster::All,
            fallback: DEFAULT_FALLBACK,
            verify: false,
            guess_fallback: false,
        }
    }

    /// Set the heuristic sample window.
    pub fn taster(&mut self, taster: Taster) -> &mut Self {
        self.taster = taster;
        self
    }

    /// Set the fallback encoding.
    pub fn fallback(&mut self, fallback: EncodingId) -> &mut Self {
        self.fallback = fallback;
        self
    }

    /// Reject heuristic candidates that fail a strict decode of the whole buffer.
    ///
    /// A rejected candidate hands over to the next strategy. Off by default.
    pub fn verify(&mut self, verify: bool) -> &mut Self {
        self.verify = verify;
        self
    }

    /// Try a statistical code page guess before the fallback. Off by default.
    pub fn guess_fallback(&mut self, guess_fallback: bool) -> &mut Self {
        self.guess_fallback = guess_fallback;
        self
    }

    /// Detect the encoding of a file. The whole file is read.
    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<DetectionResult> {
        let data = fs::read(path.as_ref())?;
        Ok(self.detect(&data))
    }

    /// Detect the encoding of the data. Always returns a usable encoding.
    pub fn detect(&self, data: &[u8]) -> DetectionResult {
        if let Some(signature) = match_bom(data) {
            debug!(encoding = %signature.encoding, "byte-order mark found");
            return DetectionResult::new(signature.encoding, signature.skip_len(), Confidence::Bom);
        }

        let sample = self.taster.window(data);

        for (confidence, strategy) in &sniff::STRATEGIES {
            let Some(candidate) = strategy(sample) else {
                continue;
            };
            if self.verify && !validate_full_decode(data, candidate) {
                debug!(encoding = %candidate, ?confidence, "candidate rejected by strict decode");
                continue;
            }
            debug!(encoding = %candidate, ?confidence, "heuristic match");
            return DetectionResult::new(candidate, 0, *confidence);
        }

        if self.guess_fallback {
            if let Some(guessed) = guess::guess(sample) {
                if !self.verify || validate_full_decode(data, guessed) {
                    debug!(encoding = %guessed, "chardetng guess");
                    return DetectionResult::new(guessed, 0, Confidence::Guessed);
                }
            }
        }

        debug!(encoding = %self.fallback, "falling back");
        DetectionResult::new(self.fallback, 0, Confidence::Fallback)
    }

    /// Detect and return just the encoding.
    pub fn encoding(&self, data: &[u8]) -> EncodingId {
        self.detect(data).encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_builder() {
        let mut detector = Detector::new();
        detector
            .taster(Taster::Bytes(512))
            .fallback(EncodingId::Utf8)
            .verify(true)
            .guess_fallback(true);

        assert_eq!(detector.taster, Taster::Bytes(512));
        assert_eq!(detector.fallback, EncodingId::Utf8);
        assert!(detector.verify);
        assert!(detector.guess_fallback);
    }

    #[test]
    fn test_bom_result() {
        let data = [0xEF, 0xBB, 0xBF, b'h', b'i'];
        let result = Detector::new().detect(&data);
        assert_eq!(result, DetectionResult::new(EncodingId::Utf8, 3, Confidence::Bom));
        assert_eq!(result.payload(&data), b"hi");
    }

    #[test]
    fn test_empty_input_falls_back() {
        let result = Detector::new().detect(&[]);
        assert_eq!(result.encoding, DEFAULT_FALLBACK);
        assert_eq!(result.confidence, Confidence::Fallback);
        assert_eq!(result.payload(&[]), b"");
    }

    #[test]
    fn test_custom_fallback() {
        let mut detector = Detector::new();
        detector.fallback(EncodingId::Utf8);
        assert_eq!(detector.encoding(b"plain ascii"), EncodingId::Utf8);
    }

    #[test]
    fn test_taster_hides_late_utf8() {
        let mut data = vec![b'a'; 200];
        data.extend_from_slice("äöü and some tail".as_bytes());

        assert_eq!(Detector::new().encoding(&data), EncodingId::Utf8);

        let mut detector = Detector::new();
        detector.taster(Taster::Bytes(100));
        assert_eq!(detector.encoding(&data), EncodingId::Latin1);
    }

    #[test]
    fn test_verify_rejects_truncated_utf8_sample() {
        // Valid UTF-8 in the taster window, a stray Latin-1 byte afterwards.
        let mut data = "äöü abcdefgh".as_bytes().to_vec();
        data.extend_from_slice(&[b' ', 0xFC, b' ', b'x', b'y', b'z', b'w', b'v']);

        let mut detector = Detector::new();
        detector.taster(Taster::Bytes(12));
        assert_eq!(detector.encoding(&data), EncodingId::Utf8);

        detector.verify(true);
        let result = detector.detect(&data);
        assert_eq!(result.encoding, EncodingId::Latin1);
        assert_eq!(result.confidence, Confidence::Fallback);
    }

    #[test]
    fn test_verify_keeps_valid_utf16() {
        let data = EncodingId::Utf16Le.encode("verified text");
        let mut detector = Detector::new();
        detector.verify(true);
        let result = detector.detect(&data);
        assert_eq!(result.encoding, EncodingId::Utf16Le);
        assert_eq!(result.confidence, Confidence::HeuristicUtf16);
    }

    #[test]
    fn test_verify_keeps_declared_total_encoding() {
        let mut data = b"<meta charset=iso-8859-1> ".to_vec();
        data.extend(0x80..=0xFFu8);

        let mut detector = Detector::new();
        detector.verify(true).fallback(EncodingId::Utf8);
        let result = detector.detect(&data);
        assert_eq!(result.encoding, EncodingId::Latin1);
        assert_eq!(result.confidence, Confidence::Declared);
    }

    #[test]
    fn test_guess_fallback() {
        let cp1251 = EncodingId::from_encoding_rs(encoding_rs::WINDOWS_1251);
        let data = cp1251.encode("Привет, мир! Как у тебя дела? Сегодня хорошая погода.");

        let mut detector = Detector::new();
        assert_eq!(detector.detect(&data).confidence, Confidence::Fallback);

        detector.guess_fallback(true);
        assert_eq!(detector.detect(&data).confidence, Confidence::Guessed);

        // Pure ASCII has nothing to guess from.
        assert_eq!(detector.detect(b"plain").confidence, Confidence::Fallback);
    }
}
