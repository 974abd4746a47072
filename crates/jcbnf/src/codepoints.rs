//! Conversions from host text into the codepoint slices the matcher reads.
//!
//! Offsets reported by the engine count codepoints, not bytes or UTF-16
//! units.

/// Decodes UTF-16 text into codepoints.
///
/// Unpaired surrogates become U+FFFD, so every input unit contributes at
/// most one codepoint and offsets stay meaningful.
#[must_use]
pub fn decode_utf16(units: &[u16]) -> Vec<char> {
    char::decode_utf16(units.iter().copied())
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// The codepoints of a string.
#[must_use]
pub fn codepoints(text: &str) -> Vec<char> {
    text.chars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_pairs_join() {
        let units: Vec<u16> = "a😀b".encode_utf16().collect();
        assert_eq!(units.len(), 4);
        assert_eq!(decode_utf16(&units), ['a', '😀', 'b']);
    }

    #[test]
    fn lone_surrogates_are_replaced() {
        assert_eq!(decode_utf16(&[0x61, 0xD800, 0x62]), ['a', '\u{FFFD}', 'b']);
        assert_eq!(decode_utf16(&[0xDC00]), ['\u{FFFD}']);
    }

    #[test]
    fn string_codepoints() {
        assert_eq!(codepoints("né"), ['n', 'é']);
        assert!(codepoints("").is_empty());
    }
}
