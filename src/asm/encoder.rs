use twiddle::Twiddle;

use crate::asm::register;
use crate::asm::AsmErrorKind;
use crate::opcode::{self, InstrFormat};

// Field layout per format class, opcode always at bits 31-26:
//
//   Register        31-26, 25-21, 20-16, 15-11,  10-6,    5-0
//                  opcode,    rs,    rt,    rd,     0,   func
//   RegisterShift  opcode,     0,    rt,    rd, shamt,   func
//   Immediate      opcode,    rs,    rt,         imm[15:0]
//   Jump           opcode,            target[25:0]

/// Pack one tokenized instruction into its 32-bit word. Label operands must
/// already be resolved to numeric text.
pub fn encode(parts: &[String]) -> Result<u32, AsmErrorKind> {
    let Some(mnemonic) = parts.first() else {
        return Err(AsmErrorKind::UnrecognizedInstructionLine);
    };

    let codes = opcode::lookup(mnemonic)
        .ok_or_else(|| AsmErrorKind::UnsupportedInstruction(mnemonic.clone()))?;

    let mut word: u32 = codes.opcode << 26;

    match codes.format {
        InstrFormat::Register => match parts.len() {
            // Single-register argument form (jr)
            2 => {
                word |= register::resolve(&parts[1])? << 21;
                word |= codes.function;
            }
            // {mnemonic, rd, rs, rt}
            4 => {
                word |= register::resolve(&parts[2])? << 21; // rs
                word |= register::resolve(&parts[3])? << 16; // rt
                word |= register::resolve(&parts[1])? << 11; // rd
                word |= codes.function;
            }
            count => {
                return Err(AsmErrorKind::ArgumentCountMismatch { format: "R", count });
            }
        },
        InstrFormat::RegisterShift => {
            // {mnemonic, rd, rt, shamt}
            if parts.len() != 4 {
                return Err(AsmErrorKind::ArgumentCountMismatch {
                    format: "R",
                    count: parts.len(),
                });
            }
            word |= register::resolve(&parts[2])? << 16; // rt
            word |= register::resolve(&parts[1])? << 11; // rd
            word |= select_and_shift(parse_imm(&parts[3])?, 4, 0, 6);
            word |= codes.function;
        }
        InstrFormat::Immediate => {
            // {mnemonic, rt, rs, imm}
            if parts.len() != 4 {
                return Err(AsmErrorKind::ArgumentCountMismatch {
                    format: "I",
                    count: parts.len(),
                });
            }
            word |= register::resolve(&parts[2])? << 21; // rs
            word |= register::resolve(&parts[1])? << 16; // rt
            word |= select_and_shift(parse_imm(&parts[3])?, 15, 0, 0);
        }
        InstrFormat::Jump => {
            // {mnemonic, target}, target is an absolute word index
            if parts.len() != 2 {
                return Err(AsmErrorKind::ArgumentCountMismatch {
                    format: "J",
                    count: parts.len(),
                });
            }
            word |= select_and_shift(parse_imm(&parts[1])?, 25, 0, 0);
        }
        InstrFormat::Null => {
            word = 0;
        }
    }

    Ok(word)
}

/// Signed decimal; negative values rely on two's-complement wrap before the
/// field mask is applied.
fn parse_imm(token: &str) -> Result<u32, AsmErrorKind> {
    token
        .parse::<i32>()
        .map(|n| n as u32)
        .map_err(|_| AsmErrorKind::InvalidImmediate(token.to_string()))
}

fn select_and_shift(imm: u32, hi: usize, lo: usize, shift: usize) -> u32 {
    ((imm & u32::mask(hi..=lo)) >> lo) << shift
}
