pub mod asm;
pub mod opcode;

pub use asm::emitter::{Assembly, ListingEntry};
pub use asm::{assemble, AsmError, AsmErrorKind};
