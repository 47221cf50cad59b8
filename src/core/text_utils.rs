// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Shared text utilities for line cleanup and operand splitting.

/// Prefix that introduces a hex literal in source (`$3F`).
pub const HEX_PREFIX: &str = "$";

/// Canonical hex prefix the operand classifier understands.
pub const CANONICAL_HEX_PREFIX: &str = "0X";

/// High-RAM base written as `$FF00+` in `LDH`-style operands.
///
/// The base is implied by the `(C)` and `(n)` encodings, so it is dropped
/// before classification.
pub const HIGH_RAM_PREFIX: &str = "0XFF00+";

/// Check if a byte is whitespace (space or tab).
#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Split a line into code and comment parts at the first semicolon.
///
/// Source has no string literals, so quotes do not protect a `;`.
pub fn split_comment(line: &str) -> (&str, &str) {
    match line.find(';') {
        Some(idx) => line.split_at(idx),
        None => (line, ""),
    }
}

/// Split `label: rest` at the first colon.
///
/// Both parts are trimmed. Lines without a colon return `None` as label.
pub fn split_label(code: &str) -> (Option<&str>, &str) {
    match code.split_once(':') {
        Some((label, rest)) => (Some(label.trim()), rest.trim()),
        None => (None, code.trim()),
    }
}

/// Rewrite an instruction line into the canonical form the classifier expects.
///
/// Upper-cases the text, turns `$` hex prefixes into `0X`, drops the
/// `$FF00+` high-RAM base and treats commas as separators.
pub fn normalize_instruction(text: &str) -> String {
    text.to_ascii_uppercase()
        .replace(HEX_PREFIX, CANONICAL_HEX_PREFIX)
        .replace(HIGH_RAM_PREFIX, "")
        .replace(',', " ")
}

/// Split a normalized instruction into its mnemonic and operand tokens.
pub fn split_instruction(normalized: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = normalized
        .split(|c: char| c.is_ascii() && is_space(c as u8))
        .filter(|part| !part.is_empty());
    let mnemonic = parts.next()?;
    Some((mnemonic, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comment() {
        assert_eq!(split_comment("code ; comment"), ("code ", "; comment"));
        assert_eq!(split_comment("no comment"), ("no comment", ""));
        assert_eq!(split_comment("; only"), ("", "; only"));
        assert_eq!(split_comment("it's: NOP ; a ; b"), ("it's: NOP ", "; a ; b"));
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("loop: NOP"), (Some("loop"), "NOP"));
        assert_eq!(split_label("start:"), (Some("start"), ""));
        assert_eq!(split_label("  HALT "), (None, "HALT"));
    }

    #[test]
    fn normalize_rewrites_hex_and_high_ram() {
        assert_eq!(normalize_instruction("ld a, $3f"), "LD A  0X3F");
        assert_eq!(normalize_instruction("ld ($FF00+c), a"), "LD (C)  A");
        assert_eq!(normalize_instruction("ld a, ($ff00+$44)"), "LD A  (0X44)");
    }

    #[test]
    fn split_instruction_collapses_separators() {
        let normalized = normalize_instruction("jp nz,  $1234");
        let (mnemonic, operands) = split_instruction(&normalized).unwrap();
        assert_eq!(mnemonic, "JP");
        assert_eq!(operands, vec!["NZ", "0X1234"]);
        assert!(split_instruction("   ").is_none());
    }

    #[test]
    fn split_instruction_accepts_tabs() {
        let (mnemonic, operands) = split_instruction("INC\tA").unwrap();
        assert_eq!(mnemonic, "INC");
        assert_eq!(operands, vec!["A"]);
    }
}
