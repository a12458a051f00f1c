//! Word-to-bit encoding.
//!
//! Every character becomes one byte, sent most significant bit first.
//! Characters U+0000..=U+00FF map to their code point (Latin-1); anything
//! wider rejects the whole word so a queue never holds half a word.

use crate::bit::Bit;
use crate::error::{EncodeError, EncodeResult};

/// Bits produced per character.
pub const BITS_PER_CHAR: usize = 8;

/// Encodes a single byte MSB first.
pub fn byte_to_bits(byte: u8) -> [Bit; BITS_PER_CHAR] {
    let mut bits = [Bit::Zero; BITS_PER_CHAR];
    for (i, slot) in bits.iter_mut().enumerate() {
        *slot = Bit::from((byte >> (7 - i)) & 1 == 1);
    }
    bits
}

/// Encodes a word into its bit sequence.
///
/// # Errors
/// Returns [`EncodeError::UnencodableChar`] for the first character whose
/// code point is above U+00FF.
pub fn encode_word(text: &str) -> EncodeResult<Vec<Bit>> {
    let mut bits = Vec::with_capacity(text.len() * BITS_PER_CHAR);
    for (index, ch) in text.chars().enumerate() {
        let code = ch as u32;
        let byte =
            u8::try_from(code).map_err(|_| EncodeError::UnencodableChar { ch, index, code })?;
        bits.extend_from_slice(&byte_to_bits(byte));
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_u8s(bits: &[Bit]) -> Vec<u8> {
        bits.iter().map(|b| b.as_u8()).collect()
    }

    #[test]
    fn test_ascii_a() {
        let bits = encode_word("A").unwrap();
        assert_eq!(as_u8s(&bits), vec![0, 1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_character_order_preserved() {
        let bits = encode_word("Hi").unwrap();
        assert_eq!(
            as_u8s(&bits),
            vec![0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1]
        );
    }

    #[test]
    fn test_latin1_accepted() {
        let bits = encode_word("é").unwrap();
        assert_eq!(as_u8s(&bits), vec![1, 1, 1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_wide_char_rejects_word() {
        let err = encode_word("ok€").unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnencodableChar {
                ch: '€',
                index: 2,
                code: 0x20AC
            }
        );
    }

    #[test]
    fn test_empty_word() {
        assert!(encode_word("").unwrap().is_empty());
    }
}
