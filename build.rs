use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// phf_codegen for the instruction catalog
fn main() {
    let path = Path::new(&env::var("OUT_DIR").unwrap()).join("instr_codes.rs");
    let mut file = BufWriter::new(File::create(&path).unwrap());

    let mut codes = phf_codegen::Map::new();
    codes
        .entry("add",  "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x20}")
        .entry("sub",  "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x22}")
        .entry("and",  "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x24}")
        .entry("or",   "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x25}")
        .entry("nor",  "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x27}")
        .entry("slt",  "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x2A}")

        // Single-register argument form
        .entry("jr",   "InstrCodes{format: InstrFormat::Register, opcode: 0x00, function: 0x08}")

        // shamt at bits 10-6
        .entry("sll",  "InstrCodes{format: InstrFormat::RegisterShift, opcode: 0x00, function: 0x00}")

        .entry("lw",   "InstrCodes{format: InstrFormat::Immediate, opcode: 0x23, function: 0x00}")
        .entry("sw",   "InstrCodes{format: InstrFormat::Immediate, opcode: 0x2B, function: 0x00}")
        .entry("beq",  "InstrCodes{format: InstrFormat::Immediate, opcode: 0x04, function: 0x00}")
        .entry("addi", "InstrCodes{format: InstrFormat::Immediate, opcode: 0x08, function: 0x00}")

        .entry("j",    "InstrCodes{format: InstrFormat::Jump, opcode: 0x02, function: 0x00}")

        .entry("nop",  "InstrCodes{format: InstrFormat::Null, opcode: 0x00, function: 0x00}");

    writeln!(
        &mut file,
        "static INSTR_CODES: phf::Map<&'static str, InstrCodes> = {};",
        codes.build()
    )
    .unwrap();
}
