pub use crate::instruction::{opcode_for_mnemonic, Instruction, OpSpec};
pub use crate::word::{
    FieldSpec, Sign, Word, WordError, BYTE_SIZE, MAX_ADDRESS, MAX_WORD_VALUE, MEMORY_SIZE,
    WORD_MODULUS,
};
