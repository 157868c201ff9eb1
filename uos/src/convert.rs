//! Small conversions shared by the decoders and by calling code.

use crate::error::DecodeError;

const ADDRESS_URI_PREFIXES: [&str; 3] = ["0x", "ethereum:", "substrate:"];

/// Decodes `bytes` as UTF-8 text. Invalid sequences are an error, not replaced.
pub fn bytes_to_text(bytes: &[u8]) -> Result<String, DecodeError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Concatenates the hex form of every code point in `text`.
///
/// Each code point uses its natural width, so `"\n"` becomes `"a"` rather than
/// `"0a"`.
pub fn text_to_hex(text: &str) -> String {
    text.chars().map(|ch| format!("{:x}", ch as u32)).collect()
}

pub fn looks_like_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

pub fn looks_like_address_uri(text: &str) -> bool {
    ADDRESS_URI_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// Big-endian split of `value` into its high and low byte.
pub fn encode_u16_be(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn hex_with_prefix(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Hex decoding that tolerates a leading `0x`.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_text_accepts_multibyte_utf8() {
        let text = bytes_to_text("grüße".as_bytes()).unwrap();
        assert_eq!(text, "grüße");
    }

    #[test]
    fn bytes_to_text_rejects_invalid_utf8() {
        let err = bytes_to_text(&[0x66, 0xff, 0x6f]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }

    #[test]
    fn text_to_hex_uses_natural_width() {
        assert_eq!(text_to_hex("AB"), "4142");
        assert_eq!(text_to_hex("\n"), "a");
        assert_eq!(text_to_hex("é"), "e9");
        assert_eq!(text_to_hex(""), "");
    }

    #[test]
    fn json_detection() {
        assert!(looks_like_json(r#"{"action":"signData"}"#));
        assert!(looks_like_json("[1, 2, 3]"));
        assert!(looks_like_json("4370000"));
        assert!(!looks_like_json("4370000ec11"));
        assert!(!looks_like_json("substrate:5Grw"));
        assert!(!looks_like_json("{not json"));
    }

    #[test]
    fn address_uri_detection() {
        assert!(looks_like_address_uri("0xdeadbeef"));
        assert!(looks_like_address_uri("ethereum:0xabc@1"));
        assert!(looks_like_address_uri("substrate:5Grw"));
        assert!(!looks_like_address_uri("bitcoin:1abc"));
        assert!(!looks_like_address_uri(""));
    }

    #[test]
    fn u16_big_endian_split() {
        assert_eq!(encode_u16_be(256), [1, 0]);
        assert_eq!(encode_u16_be(0x1234), [0x12, 0x34]);
        assert_eq!(encode_u16_be(7), [0, 7]);
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(hex_with_prefix(&[0xab, 0x01]), "0xab01");
        assert_eq!(decode_hex("0xab01").unwrap(), vec![0xab, 0x01]);
        assert_eq!(decode_hex("ab01").unwrap(), vec![0xab, 0x01]);
        assert!(decode_hex("0xabc").is_err());
    }
}
