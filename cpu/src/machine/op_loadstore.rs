//! The load and store families (opcodes 8..=23 and 24..=33).
//!
//! A load extracts the `(L:R)` partial of the memory operand —
//! right-aligned, per the field algebra — and deposits it in the
//! target register, negating the sign for the LD*N variants.  A store
//! is the inverse: the rightmost bytes of the source register replace
//! the named positions of the memory word, leaving the rest intact.

use tracing::{event, Level};

use base::prelude::{FieldSpec, Word};

use crate::decode::{RegId, StoreSource};
use crate::error::ExecError;
use crate::machine::Machine;

impl Machine {
    pub(crate) fn op_load(
        &mut self,
        target: RegId,
        field: FieldSpec,
        negate: bool,
        m: i64,
    ) -> Result<(), ExecError> {
        let word = self.memory.fetch(m)?;
        let mut value = word.field(field);
        if negate {
            value = value.negated();
        }
        event!(Level::TRACE, "load {value} into {target:?}");
        match target {
            RegId::A => self.regs.a = value,
            RegId::X => self.regs.x = value,
            RegId::I(n) => self.regs.set_index(n, value),
        }
        Ok(())
    }

    pub(crate) fn op_store(
        &mut self,
        source: StoreSource,
        field: FieldSpec,
        m: i64,
    ) -> Result<(), ExecError> {
        let src = match source {
            StoreSource::Register(RegId::A) => self.regs.a,
            StoreSource::Register(RegId::X) => self.regs.x,
            StoreSource::Register(RegId::I(n)) => self.regs.index(n),
            StoreSource::Jump => self.regs.j_word(),
            StoreSource::Zero => Word::ZERO,
        };
        let mut dest = self.memory.fetch(m)?;
        dest.set_field(field, &src);
        self.memory.store(m, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::prelude::{Instruction, Sign};
    use crate::machine::Machine;

    fn word(sign: Sign, bytes: [u8; 5]) -> Word {
        Word::new(sign, bytes).expect("valid test data")
    }

    fn exec(machine: &mut Machine, opcode: u8, address: u16, index: u8, field: u8) {
        let inst = Instruction {
            sign: Sign::Plus,
            address,
            index,
            field,
            opcode,
        };
        machine
            .execute_instruction(&inst)
            .expect("instruction should execute");
    }

    #[test]
    fn test_lda_full_word() {
        let mut machine = Machine::new();
        let w = word(Sign::Minus, [1, 2, 3, 4, 5]);
        machine.memory.store(2000, w).unwrap();
        exec(&mut machine, 8, 2000, 0, 5);
        assert_eq!(machine.regs.a, w);
    }

    #[test]
    fn test_lda_partial_fields() {
        // The examples from TAOCP's description of LDA.
        let mut machine = Machine::new();
        let w = word(Sign::Minus, [1, 16, 3, 5, 4]);
        machine.memory.store(2000, w).unwrap();

        exec(&mut machine, 8, 2000, 0, 8 * 1 + 5); // (1:5)
        assert_eq!(machine.regs.a, word(Sign::Plus, [1, 16, 3, 5, 4]));

        exec(&mut machine, 8, 2000, 0, 8 * 3 + 5); // (3:5)
        assert_eq!(machine.regs.a, word(Sign::Plus, [0, 0, 3, 5, 4]));

        exec(&mut machine, 8, 2000, 0, 8 * 0 + 3); // (0:3)
        assert_eq!(machine.regs.a, word(Sign::Minus, [0, 0, 1, 16, 3]));

        exec(&mut machine, 8, 2000, 0, 8 * 4 + 4); // (4:4)
        assert_eq!(machine.regs.a, word(Sign::Plus, [0, 0, 0, 0, 5]));

        exec(&mut machine, 8, 2000, 0, 8 * 0 + 0); // (0:0)
        assert_eq!(machine.regs.a, Word::MINUS_ZERO);
    }

    #[test]
    fn test_lda_indexed() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(2005, Word::from_i64(99).unwrap())
            .unwrap();
        machine.regs.set_index_value(3, 5).unwrap();
        exec(&mut machine, 8, 2000, 3, 5);
        assert_eq!(machine.regs.a.to_i64(), 99);
    }

    #[test]
    fn test_negative_base_address_with_index() {
        // A negative address field plus a larger index value still
        // names a valid cell.
        let mut machine = Machine::new();
        machine
            .memory
            .store(10, Word::from_i64(7).unwrap())
            .unwrap();
        machine.regs.set_index_value(1, 110).unwrap();
        let inst = Instruction {
            sign: Sign::Minus,
            address: 100,
            index: 1,
            field: 5,
            opcode: 8,
        };
        machine.execute_instruction(&inst).unwrap();
        assert_eq!(machine.regs.a.to_i64(), 7);
    }

    #[test]
    fn test_ldan_negates() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(0, Word::from_i64(123).unwrap())
            .unwrap();
        exec(&mut machine, 16, 0, 0, 5); // LDAN
        assert_eq!(machine.regs.a.to_i64(), -123);

        // Negating a zero operand produces -0.
        machine.memory.store(1, Word::ZERO).unwrap();
        exec(&mut machine, 16, 1, 0, 5);
        assert_eq!(machine.regs.a, Word::MINUS_ZERO);
    }

    #[test]
    fn test_ldi_and_ldx() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(50, Word::from_i64(-300).unwrap())
            .unwrap();
        exec(&mut machine, 9, 50, 0, 5); // LD1
        assert_eq!(machine.regs.index_value(1), -300);
        exec(&mut machine, 15, 50, 0, 5); // LDX
        assert_eq!(machine.regs.x.to_i64(), -300);
        exec(&mut machine, 22, 50, 0, 5); // LD6N
        assert_eq!(machine.regs.index_value(6), 300);
    }

    #[test]
    fn test_load_out_of_range_is_fatal() {
        let mut machine = Machine::new();
        let inst = Instruction {
            sign: Sign::Minus,
            address: 1,
            index: 0,
            field: 5,
            opcode: 8,
        };
        assert_eq!(
            machine.execute_instruction(&inst),
            Err(ExecError::AddressOutOfRange(-1))
        );
    }

    #[test]
    fn test_sta_full_and_partial() {
        let mut machine = Machine::new();
        machine.regs.a = word(Sign::Plus, [6, 7, 8, 9, 0]);
        machine
            .memory
            .store(100, word(Sign::Minus, [1, 2, 3, 4, 5]))
            .unwrap();

        exec(&mut machine, 24, 100, 0, 5); // STA (0:5)
        assert_eq!(machine.memory.fetch(100).unwrap(), machine.regs.a);

        // STA 101(2:3) writes the rightmost two bytes of rA into
        // positions 2..=3 and keeps everything else.
        machine
            .memory
            .store(101, word(Sign::Minus, [1, 2, 3, 4, 5]))
            .unwrap();
        exec(&mut machine, 24, 101, 0, 8 * 2 + 3);
        assert_eq!(
            machine.memory.fetch(101).unwrap(),
            word(Sign::Minus, [1, 9, 0, 4, 5])
        );
    }

    #[test]
    fn test_stz_clears_field_only() {
        let mut machine = Machine::new();
        machine
            .memory
            .store(7, word(Sign::Minus, [1, 2, 3, 4, 5]))
            .unwrap();
        exec(&mut machine, 33, 7, 0, 8 * 4 + 5); // STZ (4:5)
        assert_eq!(
            machine.memory.fetch(7).unwrap(),
            word(Sign::Minus, [1, 2, 3, 0, 0])
        );

        exec(&mut machine, 33, 7, 0, 5); // STZ (0:5)
        assert_eq!(machine.memory.fetch(7).unwrap(), Word::ZERO);
    }

    #[test]
    fn test_stj_default_field_writes_address_bytes() {
        let mut machine = Machine::new();
        machine.regs.set_j(3001);
        machine
            .memory
            .store(20, word(Sign::Minus, [1, 2, 3, 4, 5]))
            .unwrap();
        // STJ's default field (0:2) comes from the mnemonic table; the
        // decoded instruction carries it explicitly.
        exec(&mut machine, 32, 20, 0, 2);
        assert_eq!(
            machine.memory.fetch(20).unwrap(),
            word(Sign::Plus, [46, 57, 3, 4, 5]) // 46*64 + 57 = 3001
        );
    }

    #[test]
    fn test_sti_stores_low_bytes() {
        let mut machine = Machine::new();
        machine.regs.set_index_value(2, -70).unwrap();
        machine
            .memory
            .store(9, word(Sign::Plus, [1, 2, 3, 4, 5]))
            .unwrap();
        exec(&mut machine, 26, 9, 0, 5); // ST2 (0:5)
        assert_eq!(
            machine.memory.fetch(9).unwrap(),
            word(Sign::Minus, [0, 0, 0, 1, 6]) // 70 = 1*64 + 6
        );
    }
}
