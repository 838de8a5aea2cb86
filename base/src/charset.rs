//! The MIX character code.
//!
//! Character codes are base-64 digits.  Code 0 is the space; 1..=26 are
//! the letters A..Z; 30..=39 are the digits; 40..=55 are punctuation.
//! Codes 56..=63 have no standard assignment, so this implementation
//! gives them a fixed set of extra characters; codes 27..=29 stay
//! unassigned and decode to a space, like every other unmapped code.
//! Encoding is case-insensitive and maps unknown characters to 0.

use crate::word::{Sign, Word, WordError};

const PUNCTUATION: [char; 16] = [
    '.', ',', '(', ')', '+', '-', '*', '/', '=', '$', '<', '>', '@', ';', ':', '\'',
];

const EXTRAS: [char; 8] = ['#', '&', '%', '!', '?', '_', '"', '~'];

/// The code for `ch`, or 0 when the character has no MIX encoding.
pub fn encode_char(ch: char) -> u8 {
    let ch = ch.to_ascii_uppercase();
    match ch {
        ' ' => 0,
        'A'..='Z' => 1 + (ch as u8 - b'A'),
        '0'..='9' => 30 + (ch as u8 - b'0'),
        _ => {
            if let Some(pos) = PUNCTUATION.iter().position(|&p| p == ch) {
                40 + pos as u8
            } else if let Some(pos) = EXTRAS.iter().position(|&p| p == ch) {
                56 + pos as u8
            } else {
                0
            }
        }
    }
}

/// The character for `code`; unmapped codes decode to a space.
pub fn decode_char(code: u8) -> char {
    match code {
        0 => ' ',
        1..=26 => (b'A' + code - 1) as char,
        30..=39 => (b'0' + code - 30) as char,
        40..=55 => PUNCTUATION[usize::from(code - 40)],
        56..=63 => EXTRAS[usize::from(code - 56)],
        _ => ' ',
    }
}

/// Build the positive word an ALF directive denotes: up to five
/// characters, right-padded with spaces.
pub fn alf_word(text: &str) -> Result<Word, WordError> {
    let mut bytes = [0u8; 5];
    let mut count = 0;
    for ch in text.chars() {
        if count == 5 {
            return Err(WordError::Alf(text.to_string()));
        }
        bytes[count] = encode_char(ch);
        count += 1;
    }
    // Trailing positions keep code 0, the space.
    Word::new(Sign::Plus, bytes)
}

/// Decode the five bytes of a word as characters, for listings.
pub fn decode_word(w: &Word) -> String {
    w.bytes().iter().map(|&b| decode_char(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(encode_char('A'), 1);
        assert_eq!(encode_char('Z'), 26);
        assert_eq!(encode_char('a'), 1);
        assert_eq!(encode_char('0'), 30);
        assert_eq!(encode_char('9'), 39);
        assert_eq!(encode_char(' '), 0);
    }

    #[test]
    fn test_punctuation_block() {
        assert_eq!(encode_char('.'), 40);
        assert_eq!(encode_char('\''), 55);
        for code in 40..=55 {
            assert_eq!(encode_char(decode_char(code)), code);
        }
    }

    #[test]
    fn test_unknown_characters_encode_to_space() {
        assert_eq!(encode_char('^'), 0);
        assert_eq!(encode_char('é'), 0);
    }

    #[test]
    fn test_unassigned_codes_decode_to_space() {
        assert_eq!(decode_char(27), ' ');
        assert_eq!(decode_char(28), ' ');
        assert_eq!(decode_char(29), ' ');
    }

    #[test]
    fn test_alf_pads_with_spaces() {
        let w = alf_word("AB").expect("two characters fit");
        assert_eq!(w.bytes(), [1, 2, 0, 0, 0]);
        assert_eq!(w.sign(), Sign::Plus);
        assert_eq!(decode_word(&w), "AB   ");
    }

    #[test]
    fn test_alf_rejects_long_text() {
        assert_eq!(
            alf_word("TOOLONG"),
            Err(WordError::Alf("TOOLONG".to_string()))
        );
    }

    #[test]
    fn test_alf_round_trip() {
        for text in ["HELLO", "A B C", "1+2=3", "     "] {
            let w = alf_word(text).expect("valid ALF text");
            assert_eq!(decode_word(&w), *text);
        }
    }
}
