// Instruction formats for the reduced MIPS-32 subset
//
// Notes:
// Register - $0->$31 general purpose, $zero hardcoded to 0
// Instruction - one u32 word, aligned on four byte memory
// Imm - 16 bit field, two's-complement wrap for negative displacements
// Jump target - absolute word index (byte address / 4), not a byte address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrFormat {
    Register,
    RegisterShift, // Subtype of Register, shamt instead of rs
    Immediate,
    Jump,
    Null,
}

#[derive(Debug, Clone)]
pub struct InstrCodes {
    pub format: InstrFormat,
    pub opcode: u32,   // bits 31-26
    pub function: u32, // bits 5-0, Register forms only
}

// Codegen from phf_codegen
include!(concat!(env!("OUT_DIR"), "/instr_codes.rs"));

pub fn lookup(mnemonic: &str) -> Option<InstrCodes> {
    INSTR_CODES.get(mnemonic).cloned()
}
