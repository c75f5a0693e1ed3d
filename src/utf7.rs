//! UTF-7 (RFC 2152) codec. `encoding_rs` deliberately leaves UTF-7 out.

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_value(b: u8) -> Option<u32> {
    match b {
        b'A'..=b'Z' => Some(u32::from(b - b'A')),
        b'a'..=b'z' => Some(u32::from(b - b'a') + 26),
        b'0'..=b'9' => Some(u32::from(b - b'0') + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Characters written as themselves (RFC 2152 set D plus whitespace).
fn is_direct(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '\'' | '(' | ')' | ',' | '-' | '.' | '/' | ':' | '?' | ' ' | '\t' | '\r' | '\n'
        )
}

/// Decode UTF-7 bytes.
///
/// With `strict` set, returns None on bytes above 0x7F, non-zero padding bits or
/// unpaired surrogates. Otherwise those are replaced with U+FFFD and the result is
/// always `Some`.
pub(crate) fn decode(bytes: &[u8], strict: bool) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut units: Vec<u16> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'+' {
            if b > 0x7F {
                if strict {
                    return None;
                }
                out.push(char::REPLACEMENT_CHARACTER);
            } else {
                out.push(char::from(b));
            }
            i += 1;
            continue;
        }

        i += 1;
        if bytes.get(i) == Some(&b'-') {
            out.push('+');
            i += 1;
            continue;
        }

        units.clear();
        let mut acc: u32 = 0;
        let mut bits = 0u32;
        while let Some(value) = bytes.get(i).copied().and_then(base64_value) {
            acc = (acc << 6) | value;
            bits += 6;
            if bits >= 16 {
                bits -= 16;
                units.push((acc >> bits) as u16);
                acc &= (1 << bits) - 1;
            }
            i += 1;
        }

        // Leftover bits are padding and must be zero.
        if strict && (bits >= 6 || acc != 0) {
            return None;
        }

        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => out.push(c),
                Err(_) if strict => return None,
                Err(_) => out.push(char::REPLACEMENT_CHARACTER),
            }
        }

        // An explicit '-' terminates the shifted run and is absorbed.
        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }
    }

    Some(out)
}

/// Encode text as UTF-7. Every shifted run is closed with an explicit '-'.
pub(crate) fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut pending: Vec<u16> = Vec::new();

    for c in text.chars() {
        if c == '+' {
            flush_shifted(&mut pending, &mut out);
            out.extend_from_slice(b"+-");
        } else if is_direct(c) {
            flush_shifted(&mut pending, &mut out);
            out.push(c as u8);
        } else {
            let mut buf = [0u16; 2];
            pending.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }
    flush_shifted(&mut pending, &mut out);

    out
}

fn flush_shifted(units: &mut Vec<u16>, out: &mut Vec<u8>) {
    if units.is_empty() {
        return;
    }

    out.push(b'+');
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &unit in units.iter() {
        acc = (acc << 16) | u32::from(unit);
        bits += 16;
        while bits >= 6 {
            bits -= 6;
            out.push(BASE64[((acc >> bits) & 0x3F) as usize]);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(BASE64[((acc << (6 - bits)) & 0x3F) as usize]);
    }
    out.push(b'-');

    units.clear();
}
