//! Fallback classification for samples that match no binary signature.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Endianness {
    BigEndian,
    LittleEndian,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TextClass {
    Empty,
    Ascii,
    Utf8,
    Utf16(Endianness),
    Latin1,
    Data,
}

impl TextClass {
    pub(crate) const fn mime_type(self) -> &'static str {
        match self {
            TextClass::Empty => "inode/x-empty",
            TextClass::Ascii | TextClass::Utf8 | TextClass::Utf16(_) | TextClass::Latin1 => {
                "text/plain"
            }
            TextClass::Data => "application/octet-stream",
        }
    }

    pub(crate) const fn description(self) -> &'static str {
        match self {
            TextClass::Empty => "empty",
            TextClass::Ascii => "ASCII text",
            TextClass::Utf8 => "Unicode text, UTF-8 text",
            TextClass::Utf16(Endianness::BigEndian) => "Unicode text, UTF-16, big-endian text",
            TextClass::Utf16(Endianness::LittleEndian) => {
                "Unicode text, UTF-16, little-endian text"
            }
            TextClass::Latin1 => "ISO-8859 text",
            TextClass::Data => "data",
        }
    }
}

/// `truncated` marks a sample cut off at the read limit, so a trailing
/// partial multi-byte sequence is not held against it.
pub(crate) fn classify(sample: &[u8], truncated: bool) -> TextClass {
    if sample.is_empty() {
        return TextClass::Empty;
    }
    if sample.iter().all(|&b| b.is_ascii() && is_text(b as u32)) {
        return TextClass::Ascii;
    }
    if let Some(endianness) = utf16_text(sample, truncated) {
        return TextClass::Utf16(endianness);
    }
    if utf8_text(sample, truncated) {
        return TextClass::Utf8;
    }
    if sample.iter().all(|&b| is_text(b as u32)) {
        return TextClass::Latin1;
    }
    TextClass::Data
}

/// Printable characters, `\b` through `\r`, ESC, and everything from U+00A0 up.
const fn is_text(codepoint: u32) -> bool {
    if char::from_u32(codepoint).is_none() {
        return false;
    }
    !((codepoint < 0xFF)
        && !(0x08 <= codepoint && 0x0D >= codepoint)
        && codepoint != 0x1B
        && !(0x20 <= codepoint && 0x7E >= codepoint)
        && 0xA0 > codepoint)
}

fn utf8_text(sample: &[u8], truncated: bool) -> bool {
    let valid = match std::str::from_utf8(sample) {
        Ok(text) => text,
        // error_len() is None only for an incomplete sequence at the very end
        Err(e) if truncated && e.error_len().is_none() => {
            match std::str::from_utf8(&sample[..e.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };
    valid.chars().all(|c| is_text(c as u32))
}

fn utf16_text(sample: &[u8], truncated: bool) -> Option<Endianness> {
    let (endianness, body) = match sample {
        [0xFE, 0xFF, rest @ ..] => (Endianness::BigEndian, rest),
        [0xFF, 0xFE, rest @ ..] => (Endianness::LittleEndian, rest),
        _ => return None,
    };
    if body.len() % 2 != 0 && !truncated {
        return None;
    }
    let from_bytes: fn([u8; 2]) -> u16 = match endianness {
        Endianness::BigEndian => u16::from_be_bytes,
        Endianness::LittleEndian => u16::from_le_bytes,
    };
    let units = body.chunks_exact(2).map(|pair| from_bytes([pair[0], pair[1]]));
    let mut decoded = char::decode_utf16(units).peekable();
    while let Some(unit) = decoded.next() {
        match unit {
            Ok(c) if is_text(c as u32) => {}
            // a high surrogate split by the read limit
            Err(_) if truncated && decoded.peek().is_none() => {}
            _ => return None,
        }
    }
    Some(endianness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(classify(b"", false), TextClass::Empty);
        assert_eq!(classify(b"", false).mime_type(), "inode/x-empty");
    }

    #[test]
    fn test_ascii() {
        assert_eq!(classify(b"hello, world\r\n\tindented\n", false), TextClass::Ascii);
    }

    #[test]
    fn test_utf8() {
        let class = classify("naïve café ☕\n".as_bytes(), false);
        assert_eq!(class, TextClass::Utf8);
        assert_eq!(class.description(), "Unicode text, UTF-8 text");
    }

    #[test]
    fn truncated_utf8_tail() {
        let mut sample = "snow ☃".as_bytes().to_vec();
        sample.pop();
        assert_eq!(classify(&sample, true), TextClass::Utf8);
        assert_ne!(classify(&sample, false), TextClass::Utf8);
    }

    #[test]
    fn test_iso() {
        // "Grüße" in ISO-8859-1
        let sample = [0x47, 0x72, 0xFC, 0xDF, 0x65, 0x0A];
        assert_eq!(classify(&sample, false), TextClass::Latin1);
        assert_eq!(classify(&sample, false).description(), "ISO-8859 text");
    }

    #[test]
    fn test_utf16() {
        let le = [0xFF, 0xFE, b'h', 0, b'i', 0, b'\n', 0];
        assert_eq!(
            classify(&le, false),
            TextClass::Utf16(Endianness::LittleEndian)
        );
        let be = [0xFE, 0xFF, 0, b'h', 0, b'i'];
        assert_eq!(classify(&be, false), TextClass::Utf16(Endianness::BigEndian));
        // odd byte count
        assert_ne!(
            classify(&be[..5], false),
            TextClass::Utf16(Endianness::BigEndian)
        );
    }

    #[test]
    fn test_data() {
        let class = classify(&[0x00, 0x01, 0x02, 0x80, 0x90], false);
        assert_eq!(class, TextClass::Data);
        assert_eq!(class.mime_type(), "application/octet-stream");
        assert_eq!(class.description(), "data");
    }

    #[test]
    fn control_bytes_are_not_text() {
        assert!(is_text(b'\n' as u32));
        assert!(is_text(0x1B));
        assert!(!is_text(0x00));
        assert!(!is_text(0x7F));
        assert!(!is_text(0x85));
        assert!(is_text(0xE9));
    }
}
