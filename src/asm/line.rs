use crate::asm::AsmErrorKind;

// Line classification: comment strip, leading label, then an ordered set of
// shape matchers over the remaining text. First shape that matches wins.
//
// The operand list comes out in encoder order (mem operands reordered to
// {mnemonic, reg, base, offset}, beq comparison registers swapped); the
// display string keeps the source order for the listing.

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedInstruction {
    /// Mnemonic first, then operand tokens in encoder order.
    pub parts: Vec<String>,
    /// Operands re-rendered in human-readable source order.
    pub display: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SourceLine {
    pub label: Option<String>,
    /// The line exists solely to define a label at the current address.
    pub label_only: bool,
    /// Trailing comment, `#` included. Empty when absent.
    pub comment: String,
    pub instruction: Option<ParsedInstruction>,
}

/// Split at the first `#`; the comment keeps its `#`.
pub fn split_comment(line: &str) -> (&str, &str) {
    match line.find('#') {
        Some(at) => (&line[..at], &line[at..]),
        None => (line, ""),
    }
}

/// Longest leading token immediately followed by `:`, or none.
pub fn split_label(code: &str) -> (Option<&str>, &str) {
    let trimmed = code.trim_start();
    if let Some(at) = trimmed.find(':') {
        let head = &trimmed[..at];
        if !head.is_empty() && !head.contains(char::is_whitespace) {
            return (Some(head), &trimmed[at + 1..]);
        }
    }
    (None, code)
}

/// Classify one raw source line.
///
/// A line whose code matches no shape is only an error when it carries no
/// label; blank and comment-only lines yield no instruction and no error.
pub fn classify(raw: &str) -> Result<SourceLine, AsmErrorKind> {
    let (code, comment) = split_comment(raw);
    let (label, rest) = split_label(code);
    let rest = rest.trim();

    let mut out = SourceLine {
        label: label.map(str::to_string),
        label_only: label.is_some() && rest.is_empty(),
        comment: comment.to_string(),
        instruction: None,
    };

    if rest.is_empty() {
        return Ok(out);
    }

    out.instruction = match_shape(rest);
    if out.instruction.is_none() && out.label.is_none() {
        return Err(AsmErrorKind::UnrecognizedInstructionLine);
    }
    Ok(out)
}

fn match_shape(code: &str) -> Option<ParsedInstruction> {
    shape_bare(code)
        .or_else(|| shape_pair(code))
        .or_else(|| shape_mem(code))
        .or_else(|| shape_triple(code))
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace) && !s.contains(',')
}

// Shape 1: single bare token, e.g. `nop`
fn shape_bare(code: &str) -> Option<ParsedInstruction> {
    if !is_token(code) {
        return None;
    }
    Some(ParsedInstruction {
        parts: vec![code.to_string()],
        display: code.to_string(),
    })
}

// Shape 2: two whitespace-separated tokens, e.g. `jr $ra` or `j loop`
fn shape_pair(code: &str) -> Option<ParsedInstruction> {
    let fields: Vec<&str> = code.split_whitespace().collect();
    match fields[..] {
        [mnemonic, token] if is_token(mnemonic) && is_token(token) => Some(ParsedInstruction {
            parts: vec![mnemonic.to_string(), token.to_string()],
            display: format!("{} {}", mnemonic, token),
        }),
        _ => None,
    }
}

// Shape 3: `mnemonic reg, offset(base)`, e.g. `lw $t4, 4($t5)`.
// The base register precedes the offset in encoder order.
fn shape_mem(code: &str) -> Option<ParsedInstruction> {
    let (mnemonic, rest) = code.split_once(char::is_whitespace)?;
    let (reg, mem) = rest.split_once(',')?;
    let (reg, mem) = (reg.trim(), mem.trim());

    let inner = mem.strip_suffix(')')?;
    let (offset, base) = inner.split_once('(')?;
    if !is_token(mnemonic)
        || !is_token(reg)
        || !is_token(base)
        || offset.is_empty()
        || !offset.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    Some(ParsedInstruction {
        parts: vec![
            mnemonic.to_string(),
            reg.to_string(),
            base.to_string(),
            offset.to_string(),
        ],
        display: format!("{} {}, {}({})", mnemonic, reg, offset, base),
    })
}

// Shape 4: `mnemonic a, b, c`. For beq the comparison registers are swapped
// so the encoder's Immediate layout puts the first source register in rs.
fn shape_triple(code: &str) -> Option<ParsedInstruction> {
    let (mnemonic, rest) = code.split_once(char::is_whitespace)?;
    let mnemonic = mnemonic.trim();
    let fields: Vec<&str> = rest.split(',').map(str::trim).collect();
    let (a, b, c) = match fields[..] {
        [a, b, c] => (a, b, c),
        _ => return None,
    };
    if !is_token(mnemonic) || !is_token(a) || !is_token(b) || !is_token(c) {
        return None;
    }

    let parts = if mnemonic == "beq" {
        vec![
            mnemonic.to_string(),
            b.to_string(),
            a.to_string(),
            c.to_string(),
        ]
    } else {
        vec![
            mnemonic.to_string(),
            a.to_string(),
            b.to_string(),
            c.to_string(),
        ]
    };

    Some(ParsedInstruction {
        parts,
        display: format!("{} {}, {}, {}", mnemonic, a, b, c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(code: &str) -> Vec<String> {
        classify(code).unwrap().instruction.unwrap().parts
    }

    #[test]
    fn test_split_comment() {
        assert_eq!(split_comment("nop # idle"), ("nop ", "# idle"));
        assert_eq!(split_comment("# a # b"), ("", "# a # b"));
        assert_eq!(split_comment("add $1, $2, $3"), ("add $1, $2, $3", ""));
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("loop:   nop"), (Some("loop"), "   nop"));
        assert_eq!(split_label("  done:"), (Some("done"), ""));
        assert_eq!(split_label("add $1, $2, $3"), (None, "add $1, $2, $3"));
    }

    #[test]
    fn test_shape_bare() {
        assert_eq!(parts("nop"), vec!["nop"]);
        assert_eq!(parts("   nop  "), vec!["nop"]);
    }

    #[test]
    fn test_shape_pair() {
        assert_eq!(parts("jr $ra"), vec!["jr", "$ra"]);
        assert_eq!(parts("j loop"), vec!["j", "loop"]);
        assert_eq!(parts("j 5"), vec!["j", "5"]);
    }

    #[test]
    fn test_shape_mem_reorders_base_and_offset() {
        assert_eq!(parts("lw $t4, 4($t5)"), vec!["lw", "$t4", "$t5", "4"]);
        assert_eq!(parts("sw $s0, 16($sp)"), vec!["sw", "$s0", "$sp", "16"]);

        let inst = classify("lw $t4, 4($t5)").unwrap().instruction.unwrap();
        assert_eq!(inst.display, "lw $t4, 4($t5)");
    }

    #[test]
    fn test_shape_triple() {
        assert_eq!(parts("add $t2, $t1, $t1"), vec!["add", "$t2", "$t1", "$t1"]);
        // Tight commas still classify as three operands
        assert_eq!(parts("add $t2,$t1,$t1"), vec!["add", "$t2", "$t1", "$t1"]);
        assert_eq!(parts("sll $t0, $t1, 4"), vec!["sll", "$t0", "$t1", "4"]);
    }

    #[test]
    fn test_beq_register_swap() {
        let inst = classify("beq $t0, $t1, loop").unwrap().instruction.unwrap();
        assert_eq!(inst.parts, vec!["beq", "$t1", "$t0", "loop"]);
        assert_eq!(inst.display, "beq $t0, $t1, loop");
    }

    #[test]
    fn test_label_handling() {
        let line = classify("loop:   addi $t0, $t0, 1 # bump").unwrap();
        assert_eq!(line.label.as_deref(), Some("loop"));
        assert!(!line.label_only);
        assert_eq!(line.comment, "# bump");
        assert_eq!(
            line.instruction.unwrap().parts,
            vec!["addi", "$t0", "$t0", "1"]
        );

        let alone = classify("done:").unwrap();
        assert_eq!(alone.label.as_deref(), Some("done"));
        assert!(alone.label_only);
        assert_eq!(alone.instruction, None);
    }

    #[test]
    fn test_blank_and_comment_only() {
        assert_eq!(classify(""), Ok(SourceLine::default()));

        let line = classify("   # just talk").unwrap();
        assert_eq!(line.label, None);
        assert_eq!(line.comment, "# just talk");
        assert_eq!(line.instruction, None);
    }

    #[test]
    fn test_unrecognized_line() {
        assert_eq!(
            classify("one two three four"),
            Err(AsmErrorKind::UnrecognizedInstructionLine)
        );
        // With a label present the junk is tolerated, per the grammar
        let line = classify("weird: one two three four").unwrap();
        assert_eq!(line.label.as_deref(), Some("weird"));
        assert_eq!(line.instruction, None);
    }
}
