use thiserror::Error;

pub mod emitter;
pub mod encoder;
pub mod labels;
pub mod line;
pub mod register;

// Every error is fatal to the whole run, there is no per-line recovery.
// The stages return the bare kind; the pass drivers attach the offending
// line, and only the cli binary decides the process exit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AsmErrorKind {
    #[error("line matches no instruction shape")]
    UnrecognizedInstructionLine,

    #[error("instruction `{0}` is not supported")]
    UnsupportedInstruction(String),

    #[error("wrong amount of arguments for instruction type {format}: {count}")]
    ArgumentCountMismatch { format: &'static str, count: usize },

    #[error("register string invalid: `{0}`")]
    InvalidRegister(String),

    #[error("register out of range: {0}")]
    RegisterOutOfRange(u32),

    #[error("register abbreviation not supported: `{0}`")]
    UnknownAbbreviation(String),

    #[error("label `{0}` is not defined")]
    UnresolvedLabel(String),

    #[error("label `{0}` is defined more than once")]
    DuplicateLabel(String),

    #[error("immediate operand is not a number: `{0}`")]
    InvalidImmediate(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}: `{text}`")]
pub struct AsmError {
    /// 1-based source line number.
    pub line: usize,
    /// The offending source line, verbatim.
    pub text: String,
    pub kind: AsmErrorKind,
}

pub(crate) fn fail(line: usize, text: &str, kind: AsmErrorKind) -> AsmError {
    AsmError {
        line,
        text: text.to_string(),
        kind,
    }
}

/// Two-pass assembly of a complete source text.
///
/// Pass 1 runs to completion and produces the finalized label table before
/// pass 2 starts; forward references are resolved against that table.
pub fn assemble(input: &str) -> Result<emitter::Assembly, AsmError> {
    let table = labels::build(input)?;
    emitter::run(input, &table)
}
