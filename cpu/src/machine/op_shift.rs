//! The shift family (opcode 6).  `M` gives the shift count, reduced
//! modulo the width of the unit being shifted: five bytes for SLA/SRA,
//! ten for the rA‖rX variants.  Signs never participate; only bytes
//! move.

use base::prelude::{Sign, Word};

use crate::decode::ShiftKind;
use crate::machine::Machine;

fn replace_bytes(sign: Sign, bytes: [u8; 5]) -> Word {
    Word::new(sign, bytes).expect("shifted bytes are unchanged values")
}

impl Machine {
    pub(crate) fn op_shift(&mut self, kind: ShiftKind, m: i64) {
        match kind {
            ShiftKind::Sla | ShiftKind::Sra => {
                let count = m.rem_euclid(5) as usize;
                let old = self.regs.a.bytes();
                let mut new = [0u8; 5];
                for i in 0..5 {
                    let from = match kind {
                        ShiftKind::Sla => i + count,
                        _ => i.wrapping_sub(count),
                    };
                    if from < 5 {
                        new[i] = old[from];
                    }
                }
                self.regs.a = replace_bytes(self.regs.a.sign(), new);
            }
            ShiftKind::Slax | ShiftKind::Srax | ShiftKind::Slc | ShiftKind::Src => {
                let count = m.rem_euclid(10) as usize;
                let mut old = [0u8; 10];
                old[..5].copy_from_slice(&self.regs.a.bytes());
                old[5..].copy_from_slice(&self.regs.x.bytes());
                let mut new = [0u8; 10];
                for i in 0..10 {
                    new[i] = match kind {
                        ShiftKind::Slax => {
                            if i + count < 10 {
                                old[i + count]
                            } else {
                                0
                            }
                        }
                        ShiftKind::Srax => {
                            if i >= count {
                                old[i - count]
                            } else {
                                0
                            }
                        }
                        ShiftKind::Slc => old[(i + count) % 10],
                        _ => old[(i + 10 - count) % 10],
                    };
                }
                let mut high = [0u8; 5];
                let mut low = [0u8; 5];
                high.copy_from_slice(&new[..5]);
                low.copy_from_slice(&new[5..]);
                self.regs.a = replace_bytes(self.regs.a.sign(), high);
                self.regs.x = replace_bytes(self.regs.x.sign(), low);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::prelude::{Instruction, Sign};

    fn word(sign: Sign, bytes: [u8; 5]) -> Word {
        Word::new(sign, bytes).expect("valid test data")
    }

    fn shift(machine: &mut Machine, field: u8, count: u16) {
        let inst = Instruction {
            sign: Sign::Plus,
            address: count,
            index: 0,
            field,
            opcode: 6,
        };
        machine
            .execute_instruction(&inst)
            .expect("shift should execute");
    }

    fn loaded() -> Machine {
        let mut machine = Machine::new();
        machine.regs.a = word(Sign::Minus, [1, 2, 3, 4, 5]);
        machine.regs.x = word(Sign::Plus, [6, 7, 8, 9, 10]);
        machine
    }

    #[test]
    fn test_sla_and_sra() {
        let mut machine = loaded();
        shift(&mut machine, 0, 2); // SLA 2
        assert_eq!(machine.regs.a, word(Sign::Minus, [3, 4, 5, 0, 0]));

        shift(&mut machine, 1, 1); // SRA 1
        assert_eq!(machine.regs.a, word(Sign::Minus, [0, 3, 4, 5, 0]));
        // rX never moves for the single-register shifts.
        assert_eq!(machine.regs.x, word(Sign::Plus, [6, 7, 8, 9, 10]));
    }

    #[test]
    fn test_slax_and_srax() {
        let mut machine = loaded();
        shift(&mut machine, 2, 3); // SLAX 3
        assert_eq!(machine.regs.a, word(Sign::Minus, [4, 5, 6, 7, 8]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [9, 10, 0, 0, 0]));

        let mut machine = loaded();
        shift(&mut machine, 3, 4); // SRAX 4
        assert_eq!(machine.regs.a, word(Sign::Minus, [0, 0, 0, 0, 1]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_slc_and_src() {
        let mut machine = loaded();
        shift(&mut machine, 4, 2); // SLC 2
        assert_eq!(machine.regs.a, word(Sign::Minus, [3, 4, 5, 6, 7]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [8, 9, 10, 1, 2]));

        shift(&mut machine, 5, 2); // SRC 2 undoes it
        assert_eq!(machine.regs.a, word(Sign::Minus, [1, 2, 3, 4, 5]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [6, 7, 8, 9, 10]));
    }

    #[test]
    fn test_shift_by_unit_width_is_identity() {
        let mut machine = loaded();
        shift(&mut machine, 0, 5); // SLA 5
        assert_eq!(machine.regs.a, word(Sign::Minus, [1, 2, 3, 4, 5]));

        shift(&mut machine, 2, 10); // SLAX 10
        assert_eq!(machine.regs.a, word(Sign::Minus, [1, 2, 3, 4, 5]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [6, 7, 8, 9, 10]));

        shift(&mut machine, 4, 20); // SLC 20
        assert_eq!(machine.regs.a, word(Sign::Minus, [1, 2, 3, 4, 5]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [6, 7, 8, 9, 10]));
    }

    #[test]
    fn test_counts_reduce_modulo_width() {
        // SLA 7 behaves as SLA 2.
        let mut machine = loaded();
        shift(&mut machine, 0, 7);
        assert_eq!(machine.regs.a, word(Sign::Minus, [3, 4, 5, 0, 0]));
    }

    #[test]
    fn test_srax_example_from_taocp() {
        // The worked SRAX 1 example: bytes slide one position right
        // across the register boundary.
        let mut machine = loaded();
        shift(&mut machine, 3, 1);
        assert_eq!(machine.regs.a, word(Sign::Minus, [0, 1, 2, 3, 4]));
        assert_eq!(machine.regs.x, word(Sign::Plus, [5, 6, 7, 8, 9]));
    }
}
