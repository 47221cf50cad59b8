// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! First-match instruction selection.

use super::operand::Operand;
use super::table::{lookup_in_table, InstructionEntry, InstructionFormat, INSTRUCTION_TABLE};

/// Check if `format` accepts `operands` position by position.
pub fn shape_matches(format: &InstructionFormat, operands: &[Operand]) -> bool {
    if format.is_wildcard() {
        return true;
    }
    format.shape.len() == operands.len()
        && format
            .shape
            .iter()
            .zip(operands)
            .all(|(tag, operand)| operand.satisfies(*tag))
}

/// Select the first format of `mnemonic` in `table` that accepts `operands`.
///
/// Formats are tried in table order and the first fit wins; there is no
/// backtracking and no preference for shorter encodings.
pub fn match_in_table<'a>(
    table: &'a [InstructionEntry],
    mnemonic: &str,
    operands: &[Operand],
) -> Option<&'a InstructionFormat> {
    let entry = lookup_in_table(table, mnemonic)?;
    entry
        .formats
        .iter()
        .find(|format| shape_matches(format, operands))
}

/// Select the SM83 format for `mnemonic` and `operands`.
pub fn match_format(mnemonic: &str, operands: &[Operand]) -> Option<&'static InstructionFormat> {
    match_in_table(INSTRUCTION_TABLE, mnemonic, operands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol_table::SymbolTable;
    use crate::sm83::operand::{classify, OperandTag};
    use crate::sm83::table::Encoding;
    use crate::sm83::Reg8;

    fn operands(tokens: &[&str]) -> Vec<Operand> {
        let symbols = SymbolTable::new();
        tokens
            .iter()
            .map(|token| classify(token, &symbols).unwrap())
            .collect()
    }

    static OVERLAPPING: &[InstructionEntry] = &[InstructionEntry {
        mnemonic: "TST",
        formats: &[
            InstructionFormat {
                shape: &[OperandTag::R8],
                encoding: Encoding::op(0x01),
            },
            InstructionFormat {
                shape: &[OperandTag::Reg8(Reg8::A)],
                encoding: Encoding::op(0x02),
            },
        ],
    }];

    #[test]
    fn earlier_format_wins_when_both_fit() {
        for _ in 0..3 {
            let format = match_in_table(OVERLAPPING, "TST", &operands(&["A"])).unwrap();
            assert_eq!(format.encoding.opcode, 0x01);
        }
        let format = match_in_table(OVERLAPPING, "TST", &operands(&["B"])).unwrap();
        assert_eq!(format.encoding.opcode, 0x01);
    }

    #[test]
    fn arity_must_match() {
        assert!(match_format("NOP", &operands(&["A"])).is_none());
        assert!(match_format("LD", &operands(&["A"])).is_none());
        assert!(match_format("LD", &operands(&["A", "B", "C"])).is_none());
    }

    #[test]
    fn unknown_mnemonic_has_no_format() {
        assert!(match_format("MOV", &operands(&["A", "B"])).is_none());
        assert!(match_in_table(OVERLAPPING, "LD", &operands(&["A", "B"])).is_none());
    }

    #[test]
    fn literal_register_shapes() {
        let format = match_format("LD", &operands(&["A", "(BC)"])).unwrap();
        assert_eq!(format.encoding.opcode, 0x0A);
        let format = match_format("LD", &operands(&["SP", "HL"])).unwrap();
        assert_eq!(format.encoding.opcode, 0xF9);
        // B is an `r` but not the literal A.
        assert!(match_format("LD", &operands(&["B", "(BC)"])).is_none());
    }

    #[test]
    fn carry_token_fits_register_and_condition_shapes() {
        let format = match_format("JP", &operands(&["C", "0X1234"])).unwrap();
        assert_eq!(format.encoding.opcode, 0xC2);
        assert_eq!(format.shape, &[OperandTag::Cc, OperandTag::Imm16]);

        let format = match_format("INC", &operands(&["C"])).unwrap();
        assert_eq!(format.shape, &[OperandTag::R8]);
    }

    #[test]
    fn wildcard_matches_any_list() {
        assert!(match_format(".DB", &operands(&[])).is_some());
        assert!(match_format(".DB", &operands(&["0X01", "0X02", "A"])).is_some());
    }
}
