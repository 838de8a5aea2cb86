//! Arithmetic: ADD, SUB, MUL, DIV, the NUM/CHAR conversions, and the
//! comparison family.
//!
//! The sign-magnitude rules matter throughout.  A sum whose magnitude
//! is zero keeps rA's previous sign; MUL's two result registers both
//! take the algebraic product sign even when the magnitude is zero;
//! DIV's remainder takes the dividend's sign.  Overflow never fails an
//! instruction — it sets the toggle and the reduced value is stored.

use tracing::{event, Level};

use base::prelude::{FieldSpec, Word, MAX_WORD_VALUE, WORD_MODULUS};

use crate::decode::RegId;
use crate::error::ExecError;
use crate::machine::{reduced_to_capacity, Machine};

impl Machine {
    /// ADD, and SUB via `negate`.
    pub(crate) fn op_add(
        &mut self,
        m: i64,
        field: FieldSpec,
        negate: bool,
    ) -> Result<(), ExecError> {
        let mut operand = self.memory.fetch(m)?.field(field).to_i64();
        if negate {
            operand = -operand;
        }
        let sum = self.regs.a.to_i64() + operand;
        let (result, overflowed) = reduced_to_capacity(self.regs.a.sign(), sum, MAX_WORD_VALUE);
        self.regs.a = result;
        if overflowed {
            event!(Level::TRACE, "addition overflowed; toggle set");
            self.regs.overflow = true;
        }
        Ok(())
    }

    /// MUL: the ten-byte product of rA and the sliced operand goes
    /// into rA (high half) and rX (low half), both with the product
    /// sign.
    pub(crate) fn op_mul(&mut self, m: i64, field: FieldSpec) -> Result<(), ExecError> {
        let operand = self.memory.fetch(m)?.field(field);
        let sign = self.regs.a.sign().combined(operand.sign());
        let product = self.regs.a.magnitude() * operand.magnitude();
        self.regs.a = Word::from_sign_magnitude(sign, product / WORD_MODULUS)
            .expect("high half of a 10-byte product fits in a word");
        self.regs.x = Word::from_sign_magnitude(sign, product % WORD_MODULUS)
            .expect("low half reduced modulo the word size");
        Ok(())
    }

    /// DIV: the ten-byte dividend rA‖rX divided by the sliced operand.
    /// Division by zero or a quotient beyond one word sets the
    /// overflow toggle and leaves both registers alone.
    pub(crate) fn op_div(&mut self, m: i64, field: FieldSpec) -> Result<(), ExecError> {
        let operand = self.memory.fetch(m)?.field(field);
        let divisor = operand.magnitude();
        let dividend = self.regs.a.magnitude() * WORD_MODULUS + self.regs.x.magnitude();
        if divisor == 0 || dividend / divisor > MAX_WORD_VALUE {
            event!(Level::TRACE, "division overflow; registers unchanged");
            self.regs.overflow = true;
            return Ok(());
        }
        let quotient_sign = self.regs.a.sign().combined(operand.sign());
        let remainder_sign = self.regs.a.sign();
        self.regs.a = Word::from_sign_magnitude(quotient_sign, dividend / divisor)
            .expect("quotient checked against the word maximum");
        self.regs.x = Word::from_sign_magnitude(remainder_sign, dividend % divisor)
            .expect("remainder is smaller than the divisor");
        Ok(())
    }

    /// NUM: read the ten bytes of rA‖rX as decimal digits (each byte
    /// taken modulo 10) and leave the composed value in rA with its
    /// sign.  rX is untouched.
    pub(crate) fn op_num(&mut self) {
        let mut value: i64 = 0;
        for byte in self.regs.a.bytes().into_iter().chain(self.regs.x.bytes()) {
            value = value * 10 + i64::from(byte % 10);
        }
        if value > MAX_WORD_VALUE {
            self.regs.overflow = true;
            value %= WORD_MODULUS;
        }
        self.regs.a = Word::from_sign_magnitude(self.regs.a.sign(), value)
            .expect("value reduced modulo the word size");
    }

    /// CHAR: render |rA| as exactly ten digit characters across rA and
    /// rX; both registers take rA's sign.  A word magnitude always
    /// fits in ten digits.
    pub(crate) fn op_char(&mut self) {
        let sign = self.regs.a.sign();
        let mut digits = [0u8; 10];
        let mut rest = self.regs.a.magnitude();
        for slot in digits.iter_mut().rev() {
            *slot = 30 + (rest % 10) as u8;
            rest /= 10;
        }
        let mut high = [0u8; 5];
        let mut low = [0u8; 5];
        high.copy_from_slice(&digits[..5]);
        low.copy_from_slice(&digits[5..]);
        self.regs.a = Word::new(sign, high).expect("digit codes are valid bytes");
        self.regs.x = Word::new(sign, low).expect("digit codes are valid bytes");
    }

    /// The CMP family: numeric comparison of the sliced register
    /// against the sliced memory operand.  Both zeros are equal.
    pub(crate) fn op_compare(
        &mut self,
        reg: RegId,
        field: FieldSpec,
        m: i64,
    ) -> Result<(), ExecError> {
        let register = match reg {
            RegId::A => self.regs.a,
            RegId::X => self.regs.x,
            RegId::I(n) => self.regs.index(n),
        };
        let left = register.field(field).to_i64();
        let right = self.memory.fetch(m)?.field(field).to_i64();
        self.regs.comparison = left.cmp(&right).into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Comparison;
    use base::prelude::{Instruction, Sign};

    fn word(sign: Sign, bytes: [u8; 5]) -> Word {
        Word::new(sign, bytes).expect("valid test data")
    }

    fn exec(machine: &mut Machine, opcode: u8, address: u16, field: u8) {
        let inst = Instruction {
            sign: Sign::Plus,
            address,
            index: 0,
            field,
            opcode,
        };
        machine
            .execute_instruction(&inst)
            .expect("instruction should execute");
    }

    fn with_operand(value: i64) -> Machine {
        let mut machine = Machine::new();
        machine
            .memory
            .store(1000, Word::from_i64(value).unwrap())
            .unwrap();
        machine
    }

    #[test]
    fn test_add_simple() {
        let mut machine = with_operand(100);
        machine.regs.a = Word::from_i64(-30).unwrap();
        exec(&mut machine, 1, 1000, 5);
        assert_eq!(machine.regs.a.to_i64(), 70);
        assert!(!machine.regs.overflow);
    }

    #[test]
    fn test_add_field_slices_operand() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(1000, word(Sign::Minus, [0, 0, 0, 1, 2]))
            .unwrap();
        // (4:5) drops the sign, so the operand is +66.
        exec(&mut machine, 1, 1000, 8 * 4 + 5);
        assert_eq!(machine.regs.a.to_i64(), 66);
    }

    #[test]
    fn test_add_overflow_wraps_and_sets_toggle() {
        let mut machine = with_operand(1);
        machine.regs.a = Word::from_i64(MAX_WORD_VALUE).unwrap();
        exec(&mut machine, 1, 1000, 5);
        assert_eq!(machine.regs.a.to_i64(), 0);
        assert_eq!(machine.regs.a.sign(), Sign::Plus);
        assert!(machine.regs.overflow);
    }

    #[test]
    fn test_add_zero_result_keeps_sign() {
        let mut machine = with_operand(5);
        machine.regs.a = Word::from_i64(-5).unwrap();
        exec(&mut machine, 1, 1000, 5);
        assert_eq!(machine.regs.a, Word::MINUS_ZERO);
        assert!(!machine.regs.overflow);
    }

    #[test]
    fn test_sub() {
        let mut machine = with_operand(-200);
        machine.regs.a = Word::from_i64(100).unwrap();
        exec(&mut machine, 2, 1000, 5);
        assert_eq!(machine.regs.a.to_i64(), 300);
    }

    #[test]
    fn test_mul_splits_product() {
        let mut machine = with_operand(WORD_MODULUS / 2);
        machine.regs.a = Word::from_i64(6).unwrap();
        exec(&mut machine, 3, 1000, 5);
        // 6 * 2^29 = 3 * 2^30: high half 3, low half 0.
        assert_eq!(machine.regs.a.to_i64(), 3);
        assert_eq!(machine.regs.x.to_i64(), 0);
    }

    #[test]
    fn test_mul_sign_rules() {
        let mut machine = with_operand(-7);
        machine.regs.a = Word::from_i64(13).unwrap();
        exec(&mut machine, 3, 1000, 5);
        assert_eq!(machine.regs.a, Word::MINUS_ZERO);
        assert_eq!(machine.regs.x.to_i64(), -91);
        assert_eq!(machine.regs.x.sign(), Sign::Minus);
    }

    #[test]
    fn test_mul_law_reconstructs_product() {
        let mut machine = with_operand(123_456_789);
        machine.regs.a = Word::from_i64(-987_654).unwrap();
        exec(&mut machine, 3, 1000, 5);
        let magnitude =
            machine.regs.a.magnitude() * WORD_MODULUS + machine.regs.x.magnitude();
        assert_eq!(magnitude, 987_654i64 * 123_456_789);
        assert_eq!(machine.regs.a.sign(), Sign::Minus);
        assert_eq!(machine.regs.x.sign(), Sign::Minus);
    }

    #[test]
    fn test_div() {
        let mut machine = with_operand(3);
        machine.regs.a = Word::ZERO;
        machine.regs.x = Word::from_i64(17).unwrap();
        exec(&mut machine, 4, 1000, 5);
        assert_eq!(machine.regs.a.to_i64(), 5);
        assert_eq!(machine.regs.x.to_i64(), 2);
    }

    #[test]
    fn test_div_signs() {
        // Dividend -(0‖17), divisor +3: quotient -5, remainder -2.
        let mut machine = with_operand(3);
        machine.regs.a = Word::MINUS_ZERO;
        machine.regs.x = Word::from_i64(17).unwrap();
        exec(&mut machine, 4, 1000, 5);
        assert_eq!(machine.regs.a.to_i64(), -5);
        assert_eq!(machine.regs.x.to_i64(), -2);
    }

    #[test]
    fn test_div_wide_dividend() {
        // rA‖rX = 7 * 2^30 + 11, divided by 8.
        let mut machine = with_operand(8);
        machine.regs.a = Word::from_i64(7).unwrap();
        machine.regs.x = Word::from_i64(11).unwrap();
        exec(&mut machine, 4, 1000, 5);
        let dividend = 7 * WORD_MODULUS + 11;
        assert_eq!(machine.regs.a.to_i64(), dividend / 8);
        assert_eq!(machine.regs.x.to_i64(), dividend % 8);
    }

    #[test]
    fn test_div_by_zero_sets_toggle_only() {
        let mut machine = with_operand(0);
        machine.regs.a = Word::from_i64(1).unwrap();
        machine.regs.x = Word::from_i64(2).unwrap();
        exec(&mut machine, 4, 1000, 5);
        assert!(machine.regs.overflow);
        assert_eq!(machine.regs.a.to_i64(), 1);
        assert_eq!(machine.regs.x.to_i64(), 2);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_div_quotient_overflow() {
        // Dividend 5 * 2^30, divisor 1: quotient exceeds a word.
        let mut machine = with_operand(1);
        machine.regs.a = Word::from_i64(5).unwrap();
        machine.regs.x = Word::ZERO;
        exec(&mut machine, 4, 1000, 5);
        assert!(machine.regs.overflow);
        assert_eq!(machine.regs.a.to_i64(), 5);
    }

    #[test]
    fn test_num() {
        // TAOCP example: digits 0 0 31 32 39 / 37 57 47 30 30 read as
        // 0012977700 with each byte reduced modulo 10.
        let mut machine = Machine::new();
        machine.regs.a = word(Sign::Minus, [0, 0, 31, 32, 39]);
        machine.regs.x = word(Sign::Plus, [37, 57, 47, 30, 30]);
        machine.op_num();
        assert_eq!(machine.regs.a.to_i64(), -12_977_700);
        assert_eq!(machine.regs.x, word(Sign::Plus, [37, 57, 47, 30, 30]));
        assert!(!machine.regs.overflow);
    }

    #[test]
    fn test_num_overflow_wraps() {
        // All nines: 9_999_999_999 exceeds the word maximum.
        let mut machine = Machine::new();
        machine.regs.a = word(Sign::Plus, [39, 39, 39, 39, 39]);
        machine.regs.x = word(Sign::Plus, [39, 39, 39, 39, 39]);
        machine.op_num();
        assert!(machine.regs.overflow);
        assert_eq!(machine.regs.a.to_i64(), 9_999_999_999 % WORD_MODULUS);
    }

    #[test]
    fn test_char() {
        let mut machine = Machine::new();
        machine.regs.a = Word::from_i64(-12_977_699).unwrap();
        machine.regs.x = Word::from_i64(1).unwrap();
        machine.op_char();
        assert_eq!(machine.regs.a, word(Sign::Minus, [30, 30, 31, 32, 39]));
        assert_eq!(machine.regs.x, word(Sign::Minus, [37, 37, 36, 39, 39]));
    }

    #[test]
    fn test_num_char_round_trip() {
        for n in [0i64, 1, 999, 123_456_789, MAX_WORD_VALUE, -42, -1_000_000] {
            let mut machine = Machine::new();
            machine.regs.a = Word::from_i64(n).unwrap();
            machine.op_char();
            machine.op_num();
            assert_eq!(machine.regs.a.to_i64(), n, "round trip of {n}");
            assert!(!machine.regs.overflow);
        }
    }

    #[test]
    fn test_compare_fields_and_zeros() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(1000, Word::from_i64(100).unwrap())
            .unwrap();
        machine.regs.a = Word::from_i64(99).unwrap();
        exec(&mut machine, 56, 1000, 5); // CMPA
        assert_eq!(machine.regs.comparison, Comparison::Less);

        machine.regs.a = Word::from_i64(100).unwrap();
        exec(&mut machine, 56, 1000, 5);
        assert_eq!(machine.regs.comparison, Comparison::Equal);

        machine.regs.x = Word::from_i64(101).unwrap();
        exec(&mut machine, 63, 1000, 5); // CMPX
        assert_eq!(machine.regs.comparison, Comparison::Greater);

        // (1:1) of both sides: 0 vs 0.
        exec(&mut machine, 56, 1000, 8 * 1 + 1);
        assert_eq!(machine.regs.comparison, Comparison::Equal);

        // -0 compares equal to +0.
        machine.memory.store(1001, Word::ZERO).unwrap();
        machine.regs.a = Word::MINUS_ZERO;
        exec(&mut machine, 56, 1001, 5);
        assert_eq!(machine.regs.comparison, Comparison::Equal);
    }

    #[test]
    fn test_compare_index_register() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(1000, Word::from_i64(-5).unwrap())
            .unwrap();
        machine.regs.set_index_value(2, -4).unwrap();
        exec(&mut machine, 58, 1000, 5); // CMP2
        assert_eq!(machine.regs.comparison, Comparison::Greater);
    }
}
