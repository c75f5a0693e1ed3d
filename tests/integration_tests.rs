//! Integration tests for magic-encoding

use magic_encoding::{
    Confidence, Detector, EncodingError, EncodingId, Taster, bom, encode_text,
    get_acceptable_encoding, get_acceptable_encoding_for_file, read_all_text,
    read_all_text_from_file, validate_full_decode, write_all_text, write_all_text_with_label,
};
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE: &str = "Kleiner Test äöüÄÖÜ?ß";

fn utf8_with_bom(text: &str) -> Vec<u8> {
    let mut data = vec![0xEF, 0xBB, 0xBF];
    data.extend_from_slice(text.as_bytes());
    data
}

#[test]
fn test_bom_signatures() {
    let cases: [(&[u8], EncodingId); 6] = [
        (&[0x00, 0x00, 0xFE, 0xFF], EncodingId::Utf32Be),
        (&[0xFF, 0xFE, 0x00, 0x00], EncodingId::Utf32Le),
        (&[0xFE, 0xFF], EncodingId::Utf16Be),
        (&[0xFF, 0xFE], EncodingId::Utf16Le),
        (&[0xEF, 0xBB, 0xBF], EncodingId::Utf8),
        (&[0x2B, 0x2F, 0x76], EncodingId::Utf7),
    ];

    for (signature, expected) in cases {
        let mut data = signature.to_vec();
        data.extend_from_slice(&[0x41, 0x42, 0x43, 0x44]);
        assert_eq!(get_acceptable_encoding(&data, None), expected);
        assert_eq!(
            bom::match_bom(signature).map(|s| s.encoding),
            Some(expected)
        );
    }
}

#[test]
fn test_utf32le_not_shadowed_by_utf16le() {
    assert_eq!(
        get_acceptable_encoding(&[0xFF, 0xFE, 0x00, 0x00], None),
        EncodingId::Utf32Le
    );
}

#[test]
fn test_fallback_totality() {
    let all: Vec<u8> = (0..=255).collect();
    let without_zero: Vec<u8> = (1..=255).collect();

    let high = [0x80u8, 0x81, 0x82, 0x83, 0x84, 0x85];
    let empty: &[u8] = &[];

    // No BOM, no UTF-8 structure, too few zeros, no declaration: the fallback.
    for data in [empty, &all[..], &without_zero[..], &high[..]] {
        let encoding = get_acceptable_encoding(data, None);
        assert_eq!(encoding, EncodingId::Latin1, "{data:02X?}");
        assert!(validate_full_decode(data, encoding));
        assert_eq!(encoding.decode(data).chars().count(), data.len());
    }

    assert_eq!(
        get_acceptable_encoding(&without_zero, Some(EncodingId::Utf8)),
        EncodingId::Utf8
    );
}

#[test]
fn test_utf8_structural_scan() {
    let euros = "€".repeat(50);
    assert_eq!(get_acceptable_encoding(euros.as_bytes(), None), EncodingId::Utf8);

    // A lone E2 followed by ASCII is not UTF-8.
    let data = b"abc\xE2def ghi jkl";
    assert_eq!(get_acceptable_encoding(data, None), EncodingId::Latin1);
}

#[test]
fn test_utf16_heuristic() {
    let mut le = Vec::new();
    let mut be = Vec::new();
    for i in 0..200u8 {
        let ascii = b'a' + i % 26;
        le.extend_from_slice(&[ascii, 0x00]);
        be.extend_from_slice(&[0x00, ascii]);
    }

    assert_eq!(get_acceptable_encoding(&le, None), EncodingId::Utf16Le);
    assert_eq!(get_acceptable_encoding(&be, None), EncodingId::Utf16Be);
}

#[test]
fn test_declared_charset() {
    let data = b"<html><head><meta charset=\"iso-8859-1\"></head><body>Hello</body></html>";
    assert_eq!(get_acceptable_encoding(data, None), EncodingId::Latin1);

    let result = Detector::new().detect(data);
    assert_eq!(result.confidence, Confidence::Declared);
    assert_eq!(result.bom_len, 0);
}

#[test]
fn test_unknown_declared_charset_falls_back() {
    let data = b"charset=x-made-up; charset=utf-8; lots of ascii";
    let result = Detector::new().detect(data);
    assert_eq!(result.encoding, EncodingId::Latin1);
    assert_eq!(result.confidence, Confidence::Fallback);
}

#[test]
fn test_utf8_bom_scenario() {
    let data = utf8_with_bom(SAMPLE);
    assert_eq!(get_acceptable_encoding(&data, None), EncodingId::Utf8);
    assert_eq!(read_all_text(&data, EncodingId::Utf16Le, None), SAMPLE);
}

#[test]
fn test_latin1_scenario() {
    let data = EncodingId::Latin1.encode(SAMPLE).into_owned();
    assert_eq!(
        get_acceptable_encoding(&data, Some(EncodingId::Latin1)),
        EncodingId::Latin1
    );

    let text = read_all_text(&data, EncodingId::Utf16Le, Some(EncodingId::Latin1));
    assert_eq!(text, SAMPLE);

    let utf8 = EncodingId::Utf8.encode(&text).into_owned();
    assert_eq!(read_all_text(&utf8, EncodingId::Utf16Le, None), SAMPLE);
}

#[test]
fn test_write_then_read_round_trip() {
    for encoding in [
        EncodingId::Utf8,
        EncodingId::Utf16Le,
        EncodingId::Utf16Be,
        EncodingId::Latin1,
    ] {
        let file = NamedTempFile::new().unwrap();
        write_all_text(file.path(), encoding, SAMPLE).unwrap();

        assert_eq!(
            get_acceptable_encoding_for_file(file.path(), None).unwrap(),
            encoding
        );
        assert_eq!(
            read_all_text_from_file(file.path(), EncodingId::Utf16Le, None).unwrap(),
            SAMPLE,
            "round trip through {encoding}"
        );
    }
}

#[test]
fn test_write_utf8_emits_bom() {
    let file = NamedTempFile::new().unwrap();
    write_all_text(file.path(), EncodingId::Utf8, SAMPLE).unwrap();
    assert_eq!(std::fs::read(file.path()).unwrap(), utf8_with_bom(SAMPLE));
}

#[test]
fn test_convert_to_latin1_file() {
    // Read UTF-16BE with BOM, save as ISO-8859-1.
    let mut source = NamedTempFile::new().unwrap();
    source
        .write_all(&encode_text(SAMPLE, EncodingId::Utf16Be))
        .unwrap();
    source.flush().unwrap();

    let text = read_all_text_from_file(source.path(), EncodingId::Utf16Le, None).unwrap();
    let target = NamedTempFile::new().unwrap();
    write_all_text_with_label(target.path(), "ISO-8859-1", &text).unwrap();

    assert_eq!(
        std::fs::read(target.path()).unwrap(),
        EncodingId::Latin1.encode(SAMPLE).into_owned()
    );
}

#[test]
fn test_write_argument_errors() {
    assert!(matches!(
        write_all_text("", EncodingId::Utf8, SAMPLE),
        Err(EncodingError::InvalidArgument(_))
    ));
    assert!(matches!(
        write_all_text_with_label("ignored.txt", "", SAMPLE),
        Err(EncodingError::InvalidArgument(_))
    ));
    assert!(!std::path::Path::new("ignored.txt").exists());
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    assert!(matches!(
        get_acceptable_encoding_for_file(&missing, None),
        Err(EncodingError::Io(_))
    ));
    assert!(matches!(
        read_all_text_from_file(&missing, EncodingId::Utf8, None),
        Err(EncodingError::Io(_))
    ));
}

#[test]
fn test_validate_full_decode() {
    assert!(validate_full_decode(SAMPLE.as_bytes(), EncodingId::Utf8));
    assert!(!validate_full_decode(
        &EncodingId::Latin1.encode(SAMPLE),
        EncodingId::Utf8
    ));
    assert!(validate_full_decode(
        &EncodingId::Latin1.encode(SAMPLE),
        EncodingId::Latin1
    ));
}

#[test]
fn test_detector_from_file_with_taster() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'x'; 64]).unwrap();
    file.write_all("größer".as_bytes()).unwrap();
    file.write_all(b" tail").unwrap();
    file.flush().unwrap();

    let result = Detector::new().detect_path(file.path()).unwrap();
    assert_eq!(result.encoding, EncodingId::Utf8);
    assert_eq!(result.confidence, Confidence::HeuristicUtf8);

    let mut detector = Detector::new();
    detector.taster(Taster::Bytes(32));
    let result = detector.detect_path(file.path()).unwrap();
    assert_eq!(result.confidence, Confidence::Fallback);
}

#[test]
fn test_concurrent_detection() {
    let data = utf8_with_bom(SAMPLE);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let data = data.clone();
            std::thread::spawn(move || read_all_text(&data, EncodingId::Utf8, None))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), SAMPLE);
    }
}

#[test]
fn test_codepage_ids_are_canonical() {
    use magic_encoding::Codepage;

    assert_eq!(EncodingId::from_encoding_rs(encoding_rs::UTF_8), EncodingId::Utf8);
    assert_eq!(EncodingId::from_encoding_rs(encoding_rs::UTF_16LE), EncodingId::Utf16Le);
    assert_eq!(
        EncodingId::from_encoding_rs(encoding_rs::UTF_16LE).encode("A").as_ref(),
        &[0x41, 0x00]
    );

    let cp1251 = EncodingId::from_encoding_rs(encoding_rs::WINDOWS_1251);
    assert_eq!(Some(cp1251), EncodingId::for_label(b"cp1251"));
    let codepage: Codepage = match cp1251 {
        EncodingId::Codepage(codepage) => codepage,
        other => panic!("expected a code page, got {other}"),
    };
    assert_eq!(codepage.encoding(), encoding_rs::WINDOWS_1251);
    assert_eq!(cp1251.decode(&cp1251.encode("Привет")), "Привет");
}
