//! Statistical code page guess via `chardetng`, used in place of the caller's
//! fallback when a `Detector` is configured to guess.

use chardetng::EncodingDetector;

use crate::encoding::EncodingId;

/// Guess a legacy encoding for non-ASCII data. Returns None for pure ASCII.
pub fn guess(sample: &[u8]) -> Option<EncodingId> {
    let mut detector = EncodingDetector::new();
    if !detector.feed(sample, true) {
        return None;
    }
    Some(EncodingId::from_encoding_rs(detector.guess(None, true)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_has_no_guess() {
        assert_eq!(guess(b"plain ascii"), None);
    }

    #[test]
    fn test_cyrillic() {
        let cp1251 = EncodingId::from_encoding_rs(encoding_rs::WINDOWS_1251);
        let data = cp1251.encode("Привет, мир! Как у тебя дела? Сегодня хорошая погода.");
        let guessed = guess(&data).unwrap();
        assert_ne!(guessed, EncodingId::Utf8);
        assert!(matches!(guessed, EncodingId::Codepage(_)));
    }
}
