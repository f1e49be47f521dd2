use crate::asm::AsmErrorKind;

// Register tokens: `$` followed by `zero`, two decimal digits, or a
// two-character abbreviation (letter+digit or two letters).

/// Resolve a register token to its 5-bit index.
pub fn resolve(token: &str) -> Result<u32, AsmErrorKind> {
    let name = match token.strip_prefix('$') {
        Some(name) => name,
        None => return Err(AsmErrorKind::InvalidRegister(token.to_string())),
    };
    if name == "zero" {
        return Ok(0);
    }

    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return Err(AsmErrorKind::InvalidRegister(token.to_string()));
    }

    if bytes[0].is_ascii_digit() {
        if !bytes[1].is_ascii_digit() {
            return Err(AsmErrorKind::InvalidRegister(token.to_string()));
        }
        let number = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
        if number > 31 {
            return Err(AsmErrorKind::RegisterOutOfRange(number));
        }
        return Ok(number);
    }

    if !bytes[0].is_ascii_lowercase() || !(bytes[1].is_ascii_lowercase() || bytes[1].is_ascii_digit())
    {
        return Err(AsmErrorKind::InvalidRegister(token.to_string()));
    }

    abbreviation(name).ok_or_else(|| AsmErrorKind::UnknownAbbreviation(token.to_string()))
}

// Standard MIPS register naming convention
fn abbreviation(name: &str) -> Option<u32> {
    let index = match name {
        "at" => 1,
        "v0" => 2,
        "v1" => 3,
        "a0" => 4,
        "a1" => 5,
        "a2" => 6,
        "a3" => 7,
        "t0" => 8,
        "t1" => 9,
        "t2" => 10,
        "t3" => 11,
        "t4" => 12,
        "t5" => 13,
        "t6" => 14,
        "t7" => 15,
        "s0" => 16,
        "s1" => 17,
        "s2" => 18,
        "s3" => 19,
        "s4" => 20,
        "s5" => 21,
        "s6" => 22,
        "s7" => 23,
        "t8" => 24,
        "t9" => 25,
        "k0" => 26,
        "k1" => 27,
        "gp" => 28,
        "sp" => 29,
        "fp" => 30,
        "ra" => 31,
        _ => return None,
    };
    Some(index)
}
