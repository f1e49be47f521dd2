use std::fmt::Write as _;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::asm::encoder;
use crate::asm::labels::LabelTable;
use crate::asm::line;
use crate::asm::{fail, AsmError, AsmErrorKind};

// Pass 2: re-scan the source against the completed label table, resolve
// label operands into numeric immediates, encode, and accumulate the listing
// and raw-word outputs. Nothing is written anywhere until the whole run
// succeeds.

/// One listing line. Address and word are present together or not at all;
/// blank, comment-only and label-only lines carry neither.
#[derive(Debug, PartialEq, Eq)]
pub struct ListingEntry {
    pub address: Option<u32>,
    pub word: Option<u32>,
    pub label: Option<String>,
    /// Operands in human-readable source order; empty without an instruction.
    pub text: String,
    pub comment: String,
}

/// The full result of one assembly run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    pub listing: Vec<ListingEntry>,
    /// The loadable machine-code image, in program order.
    pub words: Vec<u32>,
    /// Label name and address, lexicographic by name.
    pub symbols: Vec<(String, u32)>,
}

pub fn run(input: &str, table: &LabelTable) -> Result<Assembly, AsmError> {
    let mut out = Assembly::default();
    let mut instruction_count: u32 = 0;

    for (idx, raw) in input.lines().enumerate() {
        let parsed = line::classify(raw).map_err(|kind| fail(idx + 1, raw, kind))?;

        match parsed.instruction {
            Some(mut inst) => {
                resolve_labels(&mut inst.parts, table, instruction_count)
                    .map_err(|kind| fail(idx + 1, raw, kind))?;
                let word =
                    encoder::encode(&inst.parts).map_err(|kind| fail(idx + 1, raw, kind))?;
                debug!(address = instruction_count, word, "encoded `{}`", inst.display);

                out.listing.push(ListingEntry {
                    address: Some(instruction_count),
                    word: Some(word),
                    label: parsed.label,
                    text: inst.display,
                    comment: parsed.comment,
                });
                out.words.push(word);
                instruction_count += 4;
            }
            None => {
                out.listing.push(ListingEntry {
                    address: None,
                    word: None,
                    label: parsed.label,
                    text: String::new(),
                    comment: parsed.comment,
                });
            }
        }
    }

    out.symbols = table
        .iter()
        .map(|(name, addr)| (name.to_string(), addr))
        .collect();
    Ok(out)
}

/// Rewrite `j`/`beq` label operands into numeric text. A jump target is the
/// absolute word index; a branch displacement is counted in words from the
/// instruction following the branch. Operands that already parse as integers
/// pass through verbatim.
fn resolve_labels(
    parts: &mut [String],
    table: &LabelTable,
    instruction_count: u32,
) -> Result<(), AsmErrorKind> {
    let is_numeric = |token: &str| token.parse::<i32>().is_ok();

    match parts[0].as_str() {
        "j" if parts.len() == 2 && !is_numeric(&parts[1]) => {
            let addr = table
                .get(&parts[1])
                .ok_or_else(|| AsmErrorKind::UnresolvedLabel(parts[1].clone()))?;
            parts[1] = (addr / 4).to_string();
        }
        "beq" if parts.len() == 4 && !is_numeric(&parts[3]) => {
            let addr = table
                .get(&parts[3])
                .ok_or_else(|| AsmErrorKind::UnresolvedLabel(parts[3].clone()))?;
            let displacement = (i64::from(addr) - i64::from(instruction_count) - 4) / 4;
            parts[3] = displacement.to_string();
        }
        _ => {}
    }
    Ok(())
}

impl Assembly {
    /// The listing stream: addressed lines, pass-through label/comment
    /// lines, and the final `Symbols` section.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();

        for entry in &self.listing {
            match (entry.address, entry.word) {
                (Some(address), Some(word)) => {
                    let _ = write!(out, "0x{:08X}    0x{:08X}", address, word);
                    match &entry.label {
                        Some(label) => {
                            let _ = write!(out, "    {:<10}    ", format!("{}:", label));
                        }
                        None => out.push_str("                  "),
                    }
                    out.push_str(&entry.text);
                    if !entry.comment.is_empty() {
                        out.push_str("    ");
                        out.push_str(&entry.comment);
                    }
                }
                _ => {
                    if entry.label.is_some() || !entry.comment.is_empty() {
                        out.push_str("                            ");
                    }
                    if let Some(label) = &entry.label {
                        let _ = write!(out, "{}:", label);
                    }
                    if !entry.comment.is_empty() {
                        if entry.label.is_some() {
                            out.push_str("    ");
                        }
                        out.push_str(&entry.comment);
                    }
                }
            }
            out.push('\n');
        }

        out.push_str("\nSymbols\n");
        for (name, address) in &self.symbols {
            let _ = writeln!(out, "{:<13} 0x{:08X}", name, address);
        }
        out
    }

    /// The raw word stream, one `0x{word:08X}` per encoded instruction.
    pub fn render_words(&self) -> String {
        let mut out = String::new();
        for word in &self.words {
            let _ = writeln!(out, "0x{:08X}", word);
        }
        out
    }

    /// Little-endian binary image of the word stream.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(self.words.len() * 4);
        for &word in &self.words {
            // Writing into a Vec cannot fail
            let _ = image.write_u32::<LittleEndian>(word);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{assemble, labels};

    #[test]
    fn test_branch_displacement_forward() {
        // Branch at 0x10, target at 0x20: (32 - 16 - 4) / 4 = 3
        let input = "\
        nop\n\
        nop\n\
        nop\n\
        nop\n\
        beq $t0, $t1, target\n\
        nop\n\
        nop\n\
        nop\n\
target: nop\n";
        let out = assemble(input).unwrap();

        assert_eq!(out.words[4], 0x11090003);
        assert_eq!(out.symbols, vec![("target".to_string(), 0x20)]);
    }

    #[test]
    fn test_backward_branch() {
        let input = "\
top:    nop\n\
        beq $zero, $zero, top\n";
        let out = assemble(input).unwrap();

        // (0 - 4 - 4) / 4 = -2, wrapped to 0xFFFE
        assert_eq!(out.words[1], 0x1000FFFE);
    }

    #[test]
    fn test_numeric_targets_pass_verbatim() {
        let out = assemble("j 5\nbeq $t0, $t1, 7\n").unwrap();
        assert_eq!(out.words[0], 0x08000005);
        assert_eq!(out.words[1] & 0xFFFF, 7);
    }

    #[test]
    fn test_jump_encodes_word_index() {
        let input = "\
        nop\n\
        nop\n\
dest:   nop\n\
        j dest\n";
        let out = assemble(input).unwrap();

        // dest at byte 8 -> word index 2
        assert_eq!(out.words[3], 0x08000002);
    }

    #[test]
    fn test_addresses_step_by_four() {
        let input = "\
        nop\n\
mid:\n\
        add $t0, $t1, $t2\n\
\n\
        nop # trailing\n";
        let out = assemble(input).unwrap();

        let addressed: Vec<u32> = out
            .listing
            .iter()
            .filter_map(|entry| entry.address)
            .collect();
        assert_eq!(addressed, vec![0, 4, 8]);
        assert_eq!(out.words.len(), addressed.len());
    }

    #[test]
    fn test_unresolved_branch_label() {
        let table = labels::build("nop\n").unwrap();
        let err = run("beq $t0, $t1, missing\n", &table).unwrap_err();

        assert_eq!(err.line, 1);
        assert_eq!(
            err.kind,
            AsmErrorKind::UnresolvedLabel("missing".to_string())
        );
    }

    #[test]
    fn test_listing_layout() {
        let input = "\
# header\n\
loop:   addi $t0, $t0, 1 # bump\n\
alone:\n";
        let out = assemble(input).unwrap();
        let listing = out.render_listing();

        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "                            # header");
        assert_eq!(
            lines[1],
            "0x00000000    0x21080001    loop:         addi $t0, $t0, 1    # bump"
        );
        assert_eq!(lines[2], "                            alone:");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Symbols");
        assert_eq!(lines[5], "alone         0x00000004");
        assert_eq!(lines[6], "loop          0x00000000");
    }

    #[test]
    fn test_word_stream_and_image() {
        let out = assemble("addi $t0, $zero, 10\nnop\n").unwrap();

        assert_eq!(out.render_words(), "0x2008000A\n0x00000000\n");
        assert_eq!(
            out.to_le_bytes(),
            vec![0x0A, 0x00, 0x08, 0x20, 0x00, 0x00, 0x00, 0x00]
        );
    }
}
