//! The MIX machine word and its field algebra.
//!
//! A word is a sign plus five "bytes", where a MIX byte is a base-64
//! digit (0..=63).  The numeric interpretation is sign-magnitude:
//!
//! ```text
//! value = sign * (b1*64^4 + b2*64^3 + b3*64^2 + b4*64 + b5)
//! ```
//!
//! so the largest magnitude is 64^5 - 1 = 1_073_741_823.  Because the
//! representation is sign-magnitude, +0 and -0 are distinct words which
//! both convert to the integer 0.  This distinction is load-bearing:
//! sign-only field operations such as `(0:0)` must be able to move a
//! negative sign onto a zero word, and the arithmetic unit preserves
//! the sign of a register whose magnitude becomes zero.
//!
//! Partial words are named by a field specification `(L:R)` with
//! `0 <= L <= R <= 5`, where position 0 is the sign and positions 1..=5
//! are the bytes from most to least significant.  A field spec is
//! packed into a single byte as `8*L + R`.

use std::fmt::{self, Display, Formatter};

#[cfg(test)]
use test_strategy::Arbitrary;

/// Number of distinct values a MIX byte can hold.
pub const BYTE_SIZE: i64 = 64;

/// Largest magnitude representable in five MIX bytes: 64^5 - 1.
pub const MAX_WORD_VALUE: i64 = BYTE_SIZE.pow(5) - 1;

/// One more than [`MAX_WORD_VALUE`]; arithmetic that overflows is
/// reduced modulo this.
pub const WORD_MODULUS: i64 = MAX_WORD_VALUE + 1;

/// Number of addressable words of MIX memory.
pub const MEMORY_SIZE: usize = 4000;

/// Largest magnitude of the two-byte address field of an instruction,
/// and the capacity of an index register.
pub const MAX_ADDRESS: i64 = 4095;

/// The sign part of a word.  There is no "no sign" state; a freshly
/// zeroed word is positive.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// The sign an integer would have; 0 maps to `Plus`.
    pub fn of(n: i64) -> Sign {
        if n < 0 {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }

    pub fn opposite(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// Sign of a product or quotient of two sign-magnitude quantities.
    pub fn combined(self, other: Sign) -> Sign {
        if self == other {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Minus)
    }
}

impl From<Sign> for i64 {
    fn from(s: Sign) -> i64 {
        match s {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        })
    }
}

/// Validation failures in the word layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    /// An integer whose magnitude does not fit in five bytes.
    Overflow(i64),
    /// A byte value outside 0..=63 at the given position (1-based).
    ByteRange { position: usize, value: u8 },
    /// A field specification violating `0 <= L <= R <= 5`.
    Field { left: u8, right: u8 },
    /// An ALF operand longer than five characters.
    Alf(String),
}

impl Display for WordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            WordError::Overflow(n) => {
                write!(
                    f,
                    "{n} does not fit in a word (maximum magnitude {MAX_WORD_VALUE})"
                )
            }
            WordError::ByteRange { position, value } => {
                write!(f, "byte {position} has value {value}, outside 0..=63")
            }
            WordError::Field { left, right } => {
                write!(f, "({left}:{right}) is not a valid field specification")
            }
            WordError::Alf(text) => {
                write!(f, "ALF text '{text}' is longer than five characters")
            }
        }
    }
}

impl std::error::Error for WordError {}

/// A partial-word selector `(L:R)`.  Position 0 is the sign; positions
/// 1..=5 are bytes, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    left: u8,
    right: u8,
}

impl FieldSpec {
    /// The whole word, sign included: `(0:5)`.
    pub const FULL: FieldSpec = FieldSpec { left: 0, right: 5 };

    /// Sign and the two address bytes: `(0:2)`, the default field of STJ.
    pub const ADDRESS: FieldSpec = FieldSpec { left: 0, right: 2 };

    pub fn new(left: u8, right: u8) -> Result<FieldSpec, WordError> {
        if left <= right && right <= 5 {
            Ok(FieldSpec { left, right })
        } else {
            Err(WordError::Field { left, right })
        }
    }

    /// Decode a packed field byte `F = 8*L + R`.
    pub fn from_code(code: u8) -> Result<FieldSpec, WordError> {
        FieldSpec::new(code / 8, code % 8)
    }

    /// The packed encoding `8*L + R`.
    pub fn code(&self) -> u8 {
        8 * self.left + self.right
    }

    pub fn left(&self) -> u8 {
        self.left
    }

    pub fn right(&self) -> u8 {
        self.right
    }

    /// True when the selector covers the sign position.
    pub fn includes_sign(&self) -> bool {
        self.left == 0
    }
}

impl Display for FieldSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "({}:{})", self.left, self.right)
    }
}

/// A MIX word: a sign and five base-64 bytes, `bytes[0]` being MIX
/// byte 1 (the most significant).
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word {
    sign: Sign,
    #[cfg_attr(test, strategy(proptest::array::uniform5(0u8..64u8)))]
    bytes: [u8; 5],
}

impl Word {
    /// Positive zero, the value of a freshly reset register or memory
    /// cell.
    pub const ZERO: Word = Word {
        sign: Sign::Plus,
        bytes: [0; 5],
    };

    /// Negative zero.  Equal to [`Word::ZERO`] numerically but not
    /// structurally.
    pub const MINUS_ZERO: Word = Word {
        sign: Sign::Minus,
        bytes: [0; 5],
    };

    /// The largest word value, `+ 63 63 63 63 63`.
    pub const MAX: Word = Word {
        sign: Sign::Plus,
        bytes: [63; 5],
    };

    /// Build a word from an explicit sign and byte values, validating
    /// that every byte is a base-64 digit.
    pub fn new(sign: Sign, bytes: [u8; 5]) -> Result<Word, WordError> {
        for (i, &b) in bytes.iter().enumerate() {
            if b >= 64 {
                return Err(WordError::ByteRange {
                    position: i + 1,
                    value: b,
                });
            }
        }
        Ok(Word { sign, bytes })
    }

    /// Convert an integer.  Fails when the magnitude exceeds
    /// [`MAX_WORD_VALUE`]; 0 converts to +0.
    pub fn from_i64(n: i64) -> Result<Word, WordError> {
        if n.unsigned_abs() > MAX_WORD_VALUE as u64 {
            return Err(WordError::Overflow(n));
        }
        Ok(Word::from_sign_magnitude(Sign::of(n), n.abs()).expect("magnitude was checked above"))
    }

    /// Build a word from a sign and a non-negative magnitude.  Unlike
    /// [`Word::from_i64`] this can produce -0, which the arithmetic
    /// unit needs when a negative register's magnitude reaches zero.
    pub fn from_sign_magnitude(sign: Sign, magnitude: i64) -> Result<Word, WordError> {
        if !(0..=MAX_WORD_VALUE).contains(&magnitude) {
            return Err(WordError::Overflow(magnitude));
        }
        let mut bytes = [0u8; 5];
        let mut rest = magnitude;
        for slot in bytes.iter_mut().rev() {
            *slot = (rest % BYTE_SIZE) as u8;
            rest /= BYTE_SIZE;
        }
        Ok(Word { sign, bytes })
    }

    /// The signed integer value.  Both zeros convert to 0.
    pub fn to_i64(&self) -> i64 {
        i64::from(self.sign) * self.magnitude()
    }

    /// The unsigned magnitude of the five bytes.
    pub fn magnitude(&self) -> i64 {
        self.bytes
            .iter()
            .fold(0i64, |acc, &b| acc * BYTE_SIZE + i64::from(b))
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn bytes(&self) -> [u8; 5] {
        self.bytes
    }

    /// MIX byte `i` (1-based, 1 = most significant).
    pub fn byte(&self, i: usize) -> u8 {
        assert!((1..=5).contains(&i), "byte index {i} out of range");
        self.bytes[i - 1]
    }

    /// True for +0 and -0 alike.
    pub fn is_zero(&self) -> bool {
        self.bytes == [0; 5]
    }

    pub fn with_sign(mut self, sign: Sign) -> Word {
        self.sign = sign;
        self
    }

    pub fn negated(self) -> Word {
        let sign = self.sign.opposite();
        self.with_sign(sign)
    }

    /// Extract the partial word named by `field` into a fresh word.
    ///
    /// The extracted bytes land right-aligned: `(1:1)` of
    /// `+ 10 20 30 40 50` is `+ 0 0 0 0 10`, not `+ 10 0 0 0 0`.  The
    /// sign is copied only when the field covers position 0; otherwise
    /// the result is positive.  `(0:0)` extracts the sign alone.
    pub fn field(&self, field: FieldSpec) -> Word {
        let sign = if field.includes_sign() {
            self.sign
        } else {
            Sign::Plus
        };
        let mut bytes = [0u8; 5];
        let lo = field.left().max(1) as usize;
        let hi = field.right() as usize;
        if hi >= lo {
            let count = hi - lo + 1;
            bytes[5 - count..].copy_from_slice(&self.bytes[lo - 1..hi]);
        }
        Word { sign, bytes }
    }

    /// Store the rightmost bytes of `src` into the positions of `self`
    /// named by `field`, leaving every other position alone.  This is
    /// the only in-place mutation a word supports.
    pub fn set_field(&mut self, field: FieldSpec, src: &Word) {
        if field.includes_sign() {
            self.sign = src.sign;
        }
        let lo = field.left().max(1) as usize;
        let hi = field.right() as usize;
        if hi >= lo {
            let count = hi - lo + 1;
            self.bytes[lo - 1..hi].copy_from_slice(&src.bytes[5 - count..]);
        }
    }
}

impl Default for Word {
    fn default() -> Word {
        Word::ZERO
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} {:02} {:02} {:02} {:02} {:02}",
            self.sign, self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3], self.bytes[4]
        )
    }
}
