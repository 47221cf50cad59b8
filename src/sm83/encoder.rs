// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Byte emission for a matched instruction format.

use crate::core::assembler::error::{AsmError, AsmErrorKind};

use super::operand::{Operand, OperandTag};
use super::table::{InstructionFormat, Trailing};

/// Encode `operands` with `format`.
///
/// Each operand is read through the tag its shape slot requires, so a token
/// with several readings (the `C` register/condition) contributes the value
/// that slot expects.
pub fn encode(format: &InstructionFormat, operands: &[Operand]) -> Result<Vec<u8>, AsmError> {
    let values = resolve_values(format, operands);
    let encoding = &format.encoding;

    if encoding.trailing == Trailing::Data {
        return values
            .iter()
            .zip(operands)
            .map(|(value, operand)| data_byte(*value, operand))
            .collect();
    }

    let mut bytes = Vec::with_capacity(encoding.fixed_len().unwrap_or(1));
    if let Some(prefix) = encoding.prefix {
        bytes.push(prefix);
    }

    let mut opcode = encoding.opcode;
    for field in encoding.fields.iter().flatten() {
        let value = operand_value(&values, field.operand)?;
        opcode |= (value as u8) << field.shift;
    }
    bytes.push(opcode);

    match encoding.trailing {
        Trailing::None | Trailing::Data => {}
        Trailing::Byte(idx) => bytes.push(operand_value(&values, idx)? as u8),
        Trailing::Word(idx) => bytes.extend_from_slice(&operand_value(&values, idx)?.to_le_bytes()),
        Trailing::Fixed(value) => bytes.push(value),
    }

    Ok(bytes)
}

fn resolve_values(format: &InstructionFormat, operands: &[Operand]) -> Vec<u16> {
    operands
        .iter()
        .enumerate()
        .map(|(idx, operand)| {
            let tag = if format.is_wildcard() {
                OperandTag::Any
            } else {
                format.shape.get(idx).copied().unwrap_or(OperandTag::Any)
            };
            operand.value_for(tag).unwrap_or_else(|| operand.value())
        })
        .collect()
}

fn operand_value(values: &[u16], idx: usize) -> Result<u16, AsmError> {
    values.get(idx).copied().ok_or_else(|| {
        AsmError::new(
            AsmErrorKind::UnknownInstruction,
            "Missing operand",
            Some(&(idx + 1).to_string()),
        )
    })
}

fn data_byte(value: u16, operand: &Operand) -> Result<u8, AsmError> {
    u8::try_from(value).map_err(|_| {
        AsmError::new(
            AsmErrorKind::InvalidOperand,
            "Data value does not fit in a byte",
            Some(operand.text()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol_table::SymbolTable;
    use crate::sm83::matcher::match_format;
    use crate::sm83::operand::classify;
    use crate::sm83::table::INSTRUCTION_TABLE;
    use crate::sm83::{Condition, Reg16, Reg8};

    fn assemble(mnemonic: &str, tokens: &[&str]) -> Vec<u8> {
        let symbols = SymbolTable::new();
        let operands: Vec<Operand> = tokens
            .iter()
            .map(|token| classify(token, &symbols).unwrap())
            .collect();
        let format = match_format(mnemonic, &operands)
            .unwrap_or_else(|| panic!("no format for {mnemonic} {tokens:?}"));
        encode(format, &operands).unwrap()
    }

    /// A token that satisfies `tag` with value `value`, where one exists.
    fn sample_token(tag: OperandTag, value: u16) -> Option<String> {
        let token = match tag {
            OperandTag::R8 => Reg8::ALL
                .iter()
                .find(|reg| u16::from(reg.index()) == value)?
                .name()
                .to_string(),
            OperandTag::R16 => Reg16::ALL.get(value as usize)?.name().to_string(),
            OperandTag::Cc => Condition::ALL.get(value as usize)?.name().to_string(),
            OperandTag::Imm8 => format!("0X{value:02X}"),
            OperandTag::Imm16 => format!("0X{value:04X}"),
            OperandTag::Bit => value.to_string(),
            OperandTag::Mem8 => format!("(0X{value:02X})"),
            OperandTag::Mem16 => format!("(0X{value:04X})"),
            OperandTag::Indirect(ind) => ind.name().to_string(),
            OperandTag::Reg8(reg) => reg.name().to_string(),
            OperandTag::Reg16(pair) => pair.name().to_string(),
            OperandTag::Cond(cond) => cond.name().to_string(),
            OperandTag::Any => return None,
        };
        Some(token)
    }

    #[test]
    fn every_format_encodes_to_its_declared_length() {
        let symbols = SymbolTable::new();
        for entry in INSTRUCTION_TABLE {
            for format in entry.formats.iter().filter(|f| !f.is_wildcard()) {
                let Some(expected_len) = format.encoding.fixed_len() else {
                    panic!("{} has no fixed length", entry.mnemonic);
                };
                for value in [0u16, 1, 2, 3] {
                    let operands: Vec<Operand> = format
                        .shape
                        .iter()
                        .map(|tag| {
                            let token = sample_token(*tag, value).unwrap();
                            classify(&token, &symbols).unwrap()
                        })
                        .collect();
                    let bytes = encode(format, &operands).unwrap();
                    assert_eq!(bytes.len(), expected_len, "{} {:?}", entry.mnemonic, format.shape);
                    if let Some(prefix) = format.encoding.prefix {
                        assert_eq!(bytes[0], prefix);
                    }
                }
            }
        }
    }

    #[test]
    fn variable_bits_only_touch_their_field() {
        let symbols = SymbolTable::new();
        for entry in INSTRUCTION_TABLE {
            for format in entry.formats.iter().filter(|f| !f.is_wildcard()) {
                let mut field_mask = 0u8;
                for field in format.encoding.fields.iter().flatten() {
                    let width: u8 = match format.shape[field.operand] {
                        OperandTag::R16 | OperandTag::Cc => 0b11,
                        _ => 0b111,
                    };
                    field_mask |= width << field.shift;
                }
                let opcode_idx = usize::from(format.encoding.prefix.is_some());
                for value in 0u16..4 {
                    let operands: Vec<Operand> = format
                        .shape
                        .iter()
                        .map(|tag| classify(&sample_token(*tag, value).unwrap(), &symbols).unwrap())
                        .collect();
                    let bytes = encode(format, &operands).unwrap();
                    assert_eq!(
                        bytes[opcode_idx] & !field_mask,
                        format.encoding.opcode,
                        "{} {:?}",
                        entry.mnemonic,
                        format.shape
                    );
                }
            }
        }
    }

    #[test]
    fn ld_register_to_register_all_pairs() {
        for dst in Reg8::ALL {
            for src in Reg8::ALL {
                let bytes = assemble("LD", &[dst.name(), src.name()]);
                let expected = 0b0100_0000 | src.index() | (dst.index() << 3);
                assert_eq!(bytes, vec![expected], "LD {}, {}", dst.name(), src.name());
            }
        }
        assert_eq!(assemble("LD", &["A", "B"]), vec![0x78]);
        assert_eq!(assemble("LD", &["B", "A"]), vec![0x47]);
    }

    #[test]
    fn add_immediate_all_bytes() {
        for value in 0..=0xFFu16 {
            let token = format!("0X{value:02X}");
            assert_eq!(assemble("ADD", &[token.as_str()]), vec![0xC6, value as u8]);
        }
    }

    #[test]
    fn conditional_jump_all_conditions() {
        let mut opcodes = Vec::new();
        for cond in Condition::ALL {
            let bytes = assemble("JP", &[cond.name(), "0XBEEF"]);
            assert_eq!(bytes, vec![0xC2 | (cond.index() << 3), 0xEF, 0xBE]);
            opcodes.push(bytes[0]);
        }
        assert_eq!(opcodes, vec![0xC2, 0xCA, 0xD2, 0xDA]);
    }

    #[test]
    fn carry_condition_on_other_branches() {
        assert_eq!(assemble("JR", &["C", "0X05"]), vec![0x38, 0x05]);
        assert_eq!(assemble("CALL", &["C", "0X1234"]), vec![0xDC, 0x34, 0x12]);
        assert_eq!(assemble("RET", &["C"]), vec![0xD8]);
        assert_eq!(assemble("RET", &["NZ"]), vec![0xC0]);
    }

    #[test]
    fn loads_with_trailing_bytes() {
        assert_eq!(assemble("LD", &["A", "0X3F"]), vec![0x3E, 0x3F]);
        assert_eq!(assemble("LD", &["HL", "0XC000"]), vec![0x21, 0x00, 0xC0]);
        assert_eq!(assemble("LD", &["SP", "0XFFFE"]), vec![0x31, 0xFE, 0xFF]);
        assert_eq!(assemble("LD", &["(0XC000)", "A"]), vec![0xEA, 0x00, 0xC0]);
        assert_eq!(assemble("LD", &["A", "(0XC000)"]), vec![0xFA, 0x00, 0xC0]);
        assert_eq!(assemble("LD", &["(0X44)", "A"]), vec![0xE0, 0x44]);
        assert_eq!(assemble("LD", &["A", "(0X44)"]), vec![0xF0, 0x44]);
        assert_eq!(assemble("LD", &["(0XC100)", "SP"]), vec![0x08, 0x00, 0xC1]);
        assert_eq!(assemble("LD", &["(HL)", "0X20"]), vec![0x36, 0x20]);
    }

    #[test]
    fn loads_through_indirect_registers() {
        assert_eq!(assemble("LD", &["(HL)", "A"]), vec![0x77]);
        assert_eq!(assemble("LD", &["E", "(HL)"]), vec![0x5E]);
        assert_eq!(assemble("LD", &["A", "(HL+)"]), vec![0x2A]);
        assert_eq!(assemble("LD", &["(HL-)", "A"]), vec![0x32]);
        assert_eq!(assemble("LD", &["(C)", "A"]), vec![0xE2]);
        assert_eq!(assemble("LD", &["A", "(C)"]), vec![0xF2]);
        assert_eq!(assemble("LD", &["(DE)", "A"]), vec![0x12]);
    }

    #[test]
    fn register_pair_fields() {
        assert_eq!(assemble("PUSH", &["BC"]), vec![0xC5]);
        assert_eq!(assemble("POP", &["HL"]), vec![0xE1]);
        assert_eq!(assemble("INC", &["DE"]), vec![0x13]);
        assert_eq!(assemble("DEC", &["SP"]), vec![0x3B]);
        assert_eq!(assemble("ADD", &["HL", "DE"]), vec![0x19]);
    }

    #[test]
    fn cb_page_encodings() {
        assert_eq!(assemble("BIT", &["7", "H"]), vec![0xCB, 0x7C]);
        assert_eq!(assemble("BIT", &["0", "(HL)"]), vec![0xCB, 0x46]);
        assert_eq!(assemble("SET", &["3", "A"]), vec![0xCB, 0xDF]);
        assert_eq!(assemble("RES", &["1", "(HL)"]), vec![0xCB, 0x8E]);
        assert_eq!(assemble("SWAP", &["A"]), vec![0xCB, 0x37]);
        assert_eq!(assemble("SRL", &["B"]), vec![0xCB, 0x38]);
        assert_eq!(assemble("RL", &["C"]), vec![0xCB, 0x11]);
    }

    #[test]
    fn fixed_encodings() {
        assert_eq!(assemble("NOP", &[]), vec![0x00]);
        assert_eq!(assemble("HALT", &[]), vec![0x76]);
        assert_eq!(assemble("STOP", &[]), vec![0x10, 0x00]);
        assert_eq!(assemble("JP", &["HL"]), vec![0xE9]);
        assert_eq!(assemble("RST", &["7"]), vec![0xFF]);
    }

    #[test]
    fn raw_data_emits_operand_values() {
        assert_eq!(assemble(".DB", &["0X01", "0XFF", "7"]), vec![0x01, 0xFF, 0x07]);
        assert_eq!(assemble(".DB", &[]), Vec::<u8>::new());
    }

    #[test]
    fn raw_data_rejects_words() {
        let symbols = SymbolTable::new();
        let operands = vec![classify("0X1234", &symbols).unwrap()];
        let format = match_format(".DB", &operands).unwrap();
        let err = encode(format, &operands).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::InvalidOperand);
    }
}
