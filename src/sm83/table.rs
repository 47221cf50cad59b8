// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction table for the SM83.
//!
//! Each mnemonic lists its operand shapes in match order. The matcher takes
//! the first shape that fits, so a format that must win over a broader one
//! has to come first. Encodings are declarative: a base opcode, operand
//! fields OR-ed into it, and the bytes that follow.

use super::operand::OperandTag::{self, Any, Bit, Cc, Imm16, Imm8, Mem16, Mem8, R16, R8};
use super::{Indirect, Reg16, Reg8};

/// Prefix byte of the extended (bit, rotate and shift) opcode page.
pub const CB_PREFIX: u8 = 0xCB;

/// An operand value shifted into the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    /// Position of the operand in source order.
    pub operand: usize,
    pub shift: u8,
}

/// Bytes emitted after the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trailing {
    None,
    /// Operand value as one byte.
    Byte(usize),
    /// Operand value as two bytes, low byte first.
    Word(usize),
    /// A constant byte.
    Fixed(u8),
    /// Every operand value as one byte, no opcode byte.
    Data,
}

/// Declarative encoding of one instruction format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding {
    pub prefix: Option<u8>,
    pub opcode: u8,
    pub fields: [Option<BitField>; 2],
    pub trailing: Trailing,
}

impl Encoding {
    /// Single opcode byte with no operand bits.
    pub const fn op(opcode: u8) -> Self {
        Self {
            prefix: None,
            opcode,
            fields: [None, None],
            trailing: Trailing::None,
        }
    }

    /// Opcode on the `CB` extended page.
    pub const fn cb(opcode: u8) -> Self {
        Self {
            prefix: Some(CB_PREFIX),
            ..Self::op(opcode)
        }
    }

    /// Raw data: operand values are the output.
    pub const fn data() -> Self {
        Self {
            trailing: Trailing::Data,
            ..Self::op(0)
        }
    }

    /// OR operand `operand` into the opcode, shifted left by `shift`.
    ///
    /// At most two fields fit; a third is rejected during const evaluation.
    pub const fn field(self, operand: usize, shift: u8) -> Self {
        let added = Some(BitField { operand, shift });
        let fields = match self.fields {
            [None, _] => [added, None],
            [Some(first), None] => [Some(first), added],
            [Some(_), Some(_)] => panic!("encoding already has two bit fields"),
        };
        Self { fields, ..self }
    }

    pub const fn byte(self, operand: usize) -> Self {
        Self {
            trailing: Trailing::Byte(operand),
            ..self
        }
    }

    pub const fn word(self, operand: usize) -> Self {
        Self {
            trailing: Trailing::Word(operand),
            ..self
        }
    }

    pub const fn then(self, value: u8) -> Self {
        Self {
            trailing: Trailing::Fixed(value),
            ..self
        }
    }

    /// Encoded length in bytes, `None` for raw data.
    pub fn fixed_len(&self) -> Option<usize> {
        let head = usize::from(self.prefix.is_some()) + 1;
        match self.trailing {
            Trailing::None => Some(head),
            Trailing::Byte(_) | Trailing::Fixed(_) => Some(head + 1),
            Trailing::Word(_) => Some(head + 2),
            Trailing::Data => None,
        }
    }
}

/// One operand shape of a mnemonic and how to encode it.
#[derive(Debug, PartialEq, Eq)]
pub struct InstructionFormat {
    pub shape: &'static [OperandTag],
    pub encoding: Encoding,
}

impl InstructionFormat {
    /// Check if this format accepts any operand list.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.shape, [Any])
    }
}

/// A mnemonic and its formats, in match order.
#[derive(Debug)]
pub struct InstructionEntry {
    pub mnemonic: &'static str,
    pub formats: &'static [InstructionFormat],
}

const A: OperandTag = OperandTag::Reg8(Reg8::A);
const HL: OperandTag = OperandTag::Reg16(Reg16::Hl);
const SP: OperandTag = OperandTag::Reg16(Reg16::Sp);
const IND_HL: OperandTag = OperandTag::Indirect(Indirect::Hl);
const IND_BC: OperandTag = OperandTag::Indirect(Indirect::Bc);
const IND_DE: OperandTag = OperandTag::Indirect(Indirect::De);
const IND_C: OperandTag = OperandTag::Indirect(Indirect::C);
const IND_HLI: OperandTag = OperandTag::Indirect(Indirect::HlInc);
const IND_HLD: OperandTag = OperandTag::Indirect(Indirect::HlDec);

const fn op(opcode: u8) -> Encoding {
    Encoding::op(opcode)
}

const fn cb(opcode: u8) -> Encoding {
    Encoding::cb(opcode)
}

/// SM83 instruction table.
///
/// Linear search is fine at this size. `.DB` is the raw-data pseudo-opcode.
pub static INSTRUCTION_TABLE: &[InstructionEntry] = &[
    // ============================================================
    // Loads
    // ============================================================
    InstructionEntry {
        mnemonic: "LD",
        formats: &[
            InstructionFormat { shape: &[R8, R8], encoding: op(0x40).field(0, 3).field(1, 0) },
            InstructionFormat { shape: &[R8, Imm8], encoding: op(0x06).field(0, 3).byte(1) },
            InstructionFormat { shape: &[R8, IND_HL], encoding: op(0x46).field(0, 3) },
            InstructionFormat { shape: &[IND_HL, R8], encoding: op(0x70).field(1, 0) },
            InstructionFormat { shape: &[IND_HL, Imm8], encoding: op(0x36).byte(1) },
            InstructionFormat { shape: &[A, IND_BC], encoding: op(0x0A) },
            InstructionFormat { shape: &[A, IND_DE], encoding: op(0x1A) },
            InstructionFormat { shape: &[IND_BC, A], encoding: op(0x02) },
            InstructionFormat { shape: &[IND_DE, A], encoding: op(0x12) },
            InstructionFormat { shape: &[A, Mem16], encoding: op(0xFA).word(1) },
            InstructionFormat { shape: &[Mem16, A], encoding: op(0xEA).word(0) },
            InstructionFormat { shape: &[A, IND_C], encoding: op(0xF2) },
            InstructionFormat { shape: &[IND_C, A], encoding: op(0xE2) },
            InstructionFormat { shape: &[A, Mem8], encoding: op(0xF0).byte(1) },
            InstructionFormat { shape: &[Mem8, A], encoding: op(0xE0).byte(0) },
            InstructionFormat { shape: &[A, IND_HLD], encoding: op(0x3A) },
            InstructionFormat { shape: &[IND_HLD, A], encoding: op(0x32) },
            InstructionFormat { shape: &[A, IND_HLI], encoding: op(0x2A) },
            InstructionFormat { shape: &[IND_HLI, A], encoding: op(0x22) },
            InstructionFormat { shape: &[R16, Imm16], encoding: op(0x01).field(0, 4).word(1) },
            InstructionFormat { shape: &[Mem16, SP], encoding: op(0x08).word(0) },
            InstructionFormat { shape: &[SP, HL], encoding: op(0xF9) },
            InstructionFormat { shape: &[HL, Imm8], encoding: op(0xF8).byte(1) },
        ],
    },
    InstructionEntry {
        mnemonic: "PUSH",
        formats: &[InstructionFormat { shape: &[R16], encoding: op(0xC5).field(0, 4) }],
    },
    InstructionEntry {
        mnemonic: "POP",
        formats: &[InstructionFormat { shape: &[R16], encoding: op(0xC1).field(0, 4) }],
    },
    // ============================================================
    // 8-bit arithmetic and logic
    // ============================================================
    InstructionEntry {
        mnemonic: "ADD",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x80).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x86) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xC6).byte(0) },
            InstructionFormat { shape: &[SP, Imm8], encoding: op(0xE8).byte(1) },
            InstructionFormat { shape: &[HL, R16], encoding: op(0x09).field(1, 4) },
        ],
    },
    InstructionEntry {
        mnemonic: "ADC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x88).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x8E) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xCE).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "SUB",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x90).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x96) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xD6).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "SBC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x98).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x9E) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xDE).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "CP",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0xB8).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0xBE) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xFE).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "INC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x04).field(0, 3) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x34) },
            InstructionFormat { shape: &[R16], encoding: op(0x03).field(0, 4) },
        ],
    },
    InstructionEntry {
        mnemonic: "DEC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0x05).field(0, 3) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0x35) },
            InstructionFormat { shape: &[R16], encoding: op(0x0B).field(0, 4) },
        ],
    },
    InstructionEntry {
        mnemonic: "AND",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0xA0).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0xA6) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xE6).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "OR",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0xB0).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0xB6) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xF6).byte(0) },
        ],
    },
    InstructionEntry {
        mnemonic: "XOR",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: op(0xA8).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: op(0xAE) },
            InstructionFormat { shape: &[Imm8], encoding: op(0xEE).byte(0) },
        ],
    },
    // ============================================================
    // Flags and accumulator
    // ============================================================
    InstructionEntry {
        mnemonic: "CCF",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x3F) }],
    },
    InstructionEntry {
        mnemonic: "SCF",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x37) }],
    },
    InstructionEntry {
        mnemonic: "DAA",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x27) }],
    },
    InstructionEntry {
        mnemonic: "CPL",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x2F) }],
    },
    // ============================================================
    // Jumps, calls and returns
    // ============================================================
    InstructionEntry {
        mnemonic: "JP",
        formats: &[
            InstructionFormat { shape: &[Imm16], encoding: op(0xC3).word(0) },
            InstructionFormat { shape: &[HL], encoding: op(0xE9) },
            InstructionFormat { shape: &[Cc, Imm16], encoding: op(0xC2).field(0, 3).word(1) },
        ],
    },
    InstructionEntry {
        mnemonic: "JR",
        formats: &[
            InstructionFormat { shape: &[Imm8], encoding: op(0x18).byte(0) },
            InstructionFormat { shape: &[Cc, Imm8], encoding: op(0x20).field(0, 3).byte(1) },
        ],
    },
    InstructionEntry {
        mnemonic: "CALL",
        formats: &[
            InstructionFormat { shape: &[Imm16], encoding: op(0xCD).word(0) },
            InstructionFormat { shape: &[Cc, Imm16], encoding: op(0xC4).field(0, 3).word(1) },
        ],
    },
    InstructionEntry {
        mnemonic: "RET",
        formats: &[
            InstructionFormat { shape: &[], encoding: op(0xC9) },
            InstructionFormat { shape: &[Cc], encoding: op(0xC0).field(0, 3) },
        ],
    },
    InstructionEntry {
        mnemonic: "RETI",
        formats: &[InstructionFormat { shape: &[], encoding: op(0xD9) }],
    },
    InstructionEntry {
        mnemonic: "RST",
        formats: &[InstructionFormat { shape: &[Bit], encoding: op(0xC7).field(0, 3) }],
    },
    // ============================================================
    // Control
    // ============================================================
    InstructionEntry {
        mnemonic: "DI",
        formats: &[InstructionFormat { shape: &[], encoding: op(0xF3) }],
    },
    InstructionEntry {
        mnemonic: "EI",
        formats: &[InstructionFormat { shape: &[], encoding: op(0xFB) }],
    },
    InstructionEntry {
        mnemonic: "NOP",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x00) }],
    },
    InstructionEntry {
        mnemonic: "HALT",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x76) }],
    },
    InstructionEntry {
        mnemonic: "STOP",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x10).then(0x00) }],
    },
    // ============================================================
    // Accumulator rotates
    // ============================================================
    InstructionEntry {
        mnemonic: "RLCA",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x07) }],
    },
    InstructionEntry {
        mnemonic: "RLA",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x17) }],
    },
    InstructionEntry {
        mnemonic: "RRCA",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x0F) }],
    },
    InstructionEntry {
        mnemonic: "RRA",
        formats: &[InstructionFormat { shape: &[], encoding: op(0x1F) }],
    },
    // ============================================================
    // CB page: bit test, rotates and shifts
    // ============================================================
    InstructionEntry {
        mnemonic: "BIT",
        // Hardware CB layout 01 bbb rrr, not the older assembler's 0x08|b<<4|r.
        formats: &[
            InstructionFormat { shape: &[Bit, R8], encoding: cb(0x40).field(0, 3).field(1, 0) },
            InstructionFormat { shape: &[Bit, IND_HL], encoding: cb(0x46).field(0, 3) },
        ],
    },
    InstructionEntry {
        mnemonic: "RLC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x00).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x06) },
        ],
    },
    InstructionEntry {
        mnemonic: "RL",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x10).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x16) },
        ],
    },
    InstructionEntry {
        mnemonic: "RRC",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x08).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x0E) },
        ],
    },
    InstructionEntry {
        mnemonic: "RR",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x18).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x1E) },
        ],
    },
    InstructionEntry {
        mnemonic: "SLA",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x20).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x26) },
        ],
    },
    InstructionEntry {
        mnemonic: "SWAP",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x30).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x36) },
        ],
    },
    InstructionEntry {
        mnemonic: "SRA",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x28).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x2E) },
        ],
    },
    InstructionEntry {
        mnemonic: "SRL",
        formats: &[
            InstructionFormat { shape: &[R8], encoding: cb(0x38).field(0, 0) },
            InstructionFormat { shape: &[IND_HL], encoding: cb(0x3E) },
        ],
    },
    InstructionEntry {
        mnemonic: "SET",
        formats: &[
            InstructionFormat { shape: &[Bit, R8], encoding: cb(0xC0).field(0, 3).field(1, 0) },
            InstructionFormat { shape: &[Bit, IND_HL], encoding: cb(0xC6).field(0, 3) },
        ],
    },
    InstructionEntry {
        mnemonic: "RES",
        formats: &[
            InstructionFormat { shape: &[Bit, R8], encoding: cb(0x80).field(0, 3).field(1, 0) },
            InstructionFormat { shape: &[Bit, IND_HL], encoding: cb(0x86).field(0, 3) },
        ],
    },
    // ============================================================
    // Pseudo-opcodes
    // ============================================================
    InstructionEntry {
        mnemonic: ".DB",
        formats: &[InstructionFormat { shape: &[Any], encoding: Encoding::data() }],
    },
];

/// Look up a mnemonic in a table.
pub fn lookup_in_table<'a>(
    table: &'a [InstructionEntry],
    mnemonic: &str,
) -> Option<&'a InstructionEntry> {
    table.iter().find(|entry| entry.mnemonic == mnemonic)
}
