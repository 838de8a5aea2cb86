//! Serialization of assembled memory images.
//!
//! A word serializes as six bytes: one sign byte (0 for +, 1 for -)
//! followed by the five MIX bytes.  An image file is a little-endian
//! 16-bit start address followed by exactly 4000 word records; readers
//! also accept the bare 4000 records, in which case the start address
//! is 0.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Read, Write};

use base::prelude::{Sign, Word, WordError, MEMORY_SIZE};

const RECORD_SIZE: usize = 6;
const BODY_SIZE: usize = MEMORY_SIZE * RECORD_SIZE;

#[derive(Debug)]
pub enum ImageError {
    Io(io::Error),
    /// The file is not one of the two accepted lengths.
    Length(usize),
    /// A sign byte other than 0 or 1.
    BadSign { record: usize, value: u8 },
    /// A byte outside 0..=63.
    BadByte { record: usize, value: u8 },
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ImageError::Io(e) => write!(f, "I/O error: {e}"),
            ImageError::Length(len) => {
                write!(
                    f,
                    "image has {len} bytes; expected {BODY_SIZE} or {} (with start address)",
                    BODY_SIZE + 2
                )
            }
            ImageError::BadSign { record, value } => {
                write!(f, "record {record} has sign byte {value}; expected 0 or 1")
            }
            ImageError::BadByte { record, value } => {
                write!(f, "record {record} holds byte value {value}, outside 0..=63")
            }
        }
    }
}

impl Error for ImageError {}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> ImageError {
        ImageError::Io(e)
    }
}

/// Write a full memory image, prefixed with the start address.
pub fn write_image<W: Write>(image: &[Word], entry: u16, mut writer: W) -> Result<(), ImageError> {
    debug_assert_eq!(image.len(), MEMORY_SIZE);
    writer.write_all(&entry.to_le_bytes())?;
    for word in image {
        let sign = match word.sign() {
            Sign::Plus => 0u8,
            Sign::Minus => 1u8,
        };
        let bytes = word.bytes();
        let record = [sign, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]];
        writer.write_all(&record)?;
    }
    Ok(())
}

/// Read an image back; returns the words and the start address.
pub fn read_image<R: Read>(mut reader: R) -> Result<(Vec<Word>, u16), ImageError> {
    let mut data = Vec::with_capacity(BODY_SIZE + 2);
    reader.read_to_end(&mut data)?;
    let (entry, body) = match data.len() {
        BODY_SIZE => (0u16, &data[..]),
        len if len == BODY_SIZE + 2 => (u16::from_le_bytes([data[0], data[1]]), &data[2..]),
        len => return Err(ImageError::Length(len)),
    };
    let mut words = Vec::with_capacity(MEMORY_SIZE);
    for (record, chunk) in body.chunks_exact(RECORD_SIZE).enumerate() {
        let sign = match chunk[0] {
            0 => Sign::Plus,
            1 => Sign::Minus,
            value => return Err(ImageError::BadSign { record, value }),
        };
        let bytes = [chunk[1], chunk[2], chunk[3], chunk[4], chunk[5]];
        let word = match Word::new(sign, bytes) {
            Ok(word) => word,
            Err(WordError::ByteRange { value, .. }) => {
                return Err(ImageError::BadByte { record, value });
            }
            Err(other) => unreachable!("Word::new only reports byte ranges here: {other}"),
        };
        words.push(word);
    }
    Ok((words, entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> Vec<Word> {
        let mut image = vec![Word::ZERO; MEMORY_SIZE];
        image[0] = Word::from_i64(-123456).unwrap();
        image[3999] = Word::MAX;
        image[17] = Word::MINUS_ZERO;
        image
    }

    #[test]
    fn test_round_trip() {
        let image = sample_image();
        let mut buffer = Vec::new();
        write_image(&image, 1234, &mut buffer).unwrap();
        assert_eq!(buffer.len(), 2 + MEMORY_SIZE * RECORD_SIZE);

        let (words, entry) = read_image(buffer.as_slice()).unwrap();
        assert_eq!(entry, 1234);
        assert_eq!(words, image);
        // The signed-zero distinction survives serialization.
        assert_eq!(words[17], Word::MINUS_ZERO);
    }

    #[test]
    fn test_read_without_prefix() {
        let image = sample_image();
        let mut buffer = Vec::new();
        write_image(&image, 99, &mut buffer).unwrap();
        let (words, entry) = read_image(&buffer[2..]).unwrap();
        assert_eq!(entry, 0);
        assert_eq!(words, image);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            read_image(&[0u8; 100][..]),
            Err(ImageError::Length(100))
        ));
    }

    #[test]
    fn test_rejects_bad_sign() {
        let mut buffer = Vec::new();
        write_image(&sample_image(), 0, &mut buffer).unwrap();
        buffer[2] = 7; // first record's sign byte
        assert!(matches!(
            read_image(buffer.as_slice()),
            Err(ImageError::BadSign { record: 0, value: 7 })
        ));
    }

    #[test]
    fn test_rejects_bad_byte() {
        let mut buffer = Vec::new();
        write_image(&sample_image(), 0, &mut buffer).unwrap();
        buffer[3] = 64;
        assert!(matches!(
            read_image(buffer.as_slice()),
            Err(ImageError::BadByte { record: 0, value: 64 })
        ));
    }
}
