// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand classification for the SM83.
//!
//! A source token is turned into an [`Operand`]: the set of structural tags
//! it satisfies, each paired with the value that tag resolves to. Most
//! tokens have a single value shared by all their tags. The exception is
//! `C`, which is both register `C` (index 1) and condition `C` (index 3);
//! it carries both readings, register first, and the instruction shape
//! decides which one is used.

use std::fmt;

use crate::core::assembler::error::AsmError;
use crate::core::symbol_table::SymbolTable;
use crate::core::text_utils::CANONICAL_HEX_PREFIX;

use super::{Condition, Indirect, Reg16, Reg8};

/// Structural category an instruction format can require of an operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandTag {
    /// Any 8-bit register (`r`).
    R8,
    /// Any register pair (`rr`).
    R16,
    /// Any condition code (`cc`).
    Cc,
    /// Two-digit hex literal (`8b`).
    Imm8,
    /// Four-digit hex literal (`16b`).
    Imm16,
    /// Bit or restart index 0-7 (`n`).
    Bit,
    /// Parenthesized two-digit address (`(n)`).
    Mem8,
    /// Parenthesized four-digit address (`(nn)`).
    Mem16,
    /// One specific memory-indirect spelling, e.g. `(HL+)`.
    Indirect(Indirect),
    /// One specific 8-bit register, e.g. `A`.
    Reg8(Reg8),
    /// One specific register pair, e.g. `SP`.
    Reg16(Reg16),
    /// One specific condition, e.g. `NZ`.
    Cond(Condition),
    /// Matches any operand list (`*`).
    Any,
}

impl fmt::Display for OperandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandTag::R8 => f.write_str("r"),
            OperandTag::R16 => f.write_str("rr"),
            OperandTag::Cc => f.write_str("cc"),
            OperandTag::Imm8 => f.write_str("8b"),
            OperandTag::Imm16 => f.write_str("16b"),
            OperandTag::Bit => f.write_str("n"),
            OperandTag::Mem8 => f.write_str("(n)"),
            OperandTag::Mem16 => f.write_str("(nn)"),
            OperandTag::Indirect(ind) => f.write_str(ind.name()),
            OperandTag::Reg8(reg) => f.write_str(reg.name()),
            OperandTag::Reg16(pair) => f.write_str(pair.name()),
            OperandTag::Cond(cond) => f.write_str(cond.name()),
            OperandTag::Any => f.write_str("*"),
        }
    }
}

/// One interpretation of a token: a tag and the value it resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    pub tag: OperandTag,
    pub value: u16,
}

impl Reading {
    const fn new(tag: OperandTag, value: u16) -> Self {
        Self { tag, value }
    }
}

/// A classified operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    text: String,
    readings: Vec<Reading>,
}

impl Operand {
    fn new(text: &str, readings: Vec<Reading>) -> Self {
        Self {
            text: text.to_string(),
            readings,
        }
    }

    /// Source token this operand was classified from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Check if this operand can fill a shape slot requiring `tag`.
    pub fn satisfies(&self, tag: OperandTag) -> bool {
        tag == OperandTag::Any || self.readings.iter().any(|reading| reading.tag == tag)
    }

    /// Value of this operand when used as `tag`.
    pub fn value_for(&self, tag: OperandTag) -> Option<u16> {
        if tag == OperandTag::Any {
            return Some(self.value());
        }
        self.readings
            .iter()
            .find(|reading| reading.tag == tag)
            .map(|reading| reading.value)
    }

    /// Value of the highest-precedence reading.
    pub fn value(&self) -> u16 {
        self.readings.first().map_or(0, |reading| reading.value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.text)?;
        for (idx, reading) in self.readings.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", reading.tag)?;
        }
        write!(f, "]={:#x}", self.value())
    }
}

/// Classify one upper-cased, trimmed operand token.
///
/// The symbol table is accepted for label resolution but not consulted:
/// operands are literals, registers, conditions or indirect forms only.
pub fn classify(token: &str, _symbols: &SymbolTable) -> Result<Operand, AsmError> {
    if let Some(reg) = Reg8::from_name(token) {
        let value = u16::from(reg.index());
        let mut readings = vec![
            Reading::new(OperandTag::R8, value),
            Reading::new(OperandTag::Reg8(reg), value),
        ];
        // `C` doubles as the carry condition; register readings stay first.
        if let Some(cond) = Condition::from_name(token) {
            let value = u16::from(cond.index());
            readings.push(Reading::new(OperandTag::Cc, value));
            readings.push(Reading::new(OperandTag::Cond(cond), value));
        }
        return Ok(Operand::new(token, readings));
    }

    if let Some(pair) = Reg16::from_name(token) {
        let value = u16::from(pair.index());
        return Ok(Operand::new(
            token,
            vec![
                Reading::new(OperandTag::R16, value),
                Reading::new(OperandTag::Reg16(pair), value),
            ],
        ));
    }

    if let Some(digits) = hex_digits(token, 2) {
        let value = parse_hex(digits, token)?;
        return Ok(Operand::new(token, vec![Reading::new(OperandTag::Imm8, value)]));
    }

    if let Some(digits) = hex_digits(token, 4) {
        let value = parse_hex(digits, token)?;
        return Ok(Operand::new(token, vec![Reading::new(OperandTag::Imm16, value)]));
    }

    if let Some(digits) = parenthesized(token).and_then(|inner| hex_digits(inner, 4)) {
        let value = parse_hex(digits, token)?;
        return Ok(Operand::new(token, vec![Reading::new(OperandTag::Mem16, value)]));
    }

    if let Some(digits) = parenthesized(token).and_then(|inner| hex_digits(inner, 2)) {
        let value = parse_hex(digits, token)?;
        return Ok(Operand::new(token, vec![Reading::new(OperandTag::Mem8, value)]));
    }

    if let Some(cond) = Condition::from_name(token) {
        let value = u16::from(cond.index());
        return Ok(Operand::new(
            token,
            vec![
                Reading::new(OperandTag::Cc, value),
                Reading::new(OperandTag::Cond(cond), value),
            ],
        ));
    }

    if let Some(bit) = bit_index(token) {
        return Ok(Operand::new(token, vec![Reading::new(OperandTag::Bit, bit)]));
    }

    if let Some(ind) = Indirect::from_name(token) {
        return Ok(Operand::new(
            token,
            vec![Reading::new(OperandTag::Indirect(ind), 0)],
        ));
    }

    Err(AsmError::invalid_operand(token))
}

/// Digits of a `0X`-prefixed literal with exactly `width` digit positions.
fn hex_digits(token: &str, width: usize) -> Option<&str> {
    let digits = token.strip_prefix(CANONICAL_HEX_PREFIX)?;
    (digits.len() == width).then_some(digits)
}

fn parenthesized(token: &str) -> Option<&str> {
    token.strip_prefix('(')?.strip_suffix(')')
}

fn parse_hex(digits: &str, token: &str) -> Result<u16, AsmError> {
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(AsmError::malformed_literal(token));
    }
    u16::from_str_radix(digits, 16).map_err(|_| AsmError::malformed_literal(token))
}

fn bit_index(token: &str) -> Option<u16> {
    match token.as_bytes() {
        [digit @ b'0'..=b'7'] => Some(u16::from(digit - b'0')),
        _ => None,
    }
}
