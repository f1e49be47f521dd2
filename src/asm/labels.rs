use std::collections::BTreeMap;

use tracing::debug;

use crate::asm::line;
use crate::asm::{fail, AsmError, AsmErrorKind};

// Pass 1: collect label addresses before any encoding happens. Only the
// comment/label split is needed here; operand parsing waits for pass 2.

/// Label name to word-aligned byte address. Built once, read-only afterwards.
/// Iteration is lexicographic by name, which keeps the symbol dump stable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    map: BTreeMap<String, u32>,
}

impl LabelTable {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.map.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Walk all source lines once, assigning each label the address of the
/// instruction it precedes. Label-only lines never advance the counter, so
/// consecutive label-only lines all alias the next instruction's address.
/// Duplicate definitions are rejected.
pub fn build(input: &str) -> Result<LabelTable, AsmError> {
    let mut map = BTreeMap::new();
    let mut address: u32 = 0;

    for (idx, raw) in input.lines().enumerate() {
        let (code, _comment) = line::split_comment(raw);
        let (label, rest) = line::split_label(code);

        match label {
            Some(name) => {
                if map.insert(name.to_string(), address).is_some() {
                    return Err(fail(
                        idx + 1,
                        raw,
                        AsmErrorKind::DuplicateLabel(name.to_string()),
                    ));
                }
                if !rest.trim().is_empty() {
                    address += 4;
                }
            }
            None => {
                if !code.trim().is_empty() {
                    address += 4;
                }
            }
        }
    }

    let table = LabelTable { map };
    debug!(labels = table.len(), "label table built: {:?}", table);
    Ok(table)
}
