// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Sharp SM83 (Game Boy) CPU support module.
//!
//! This module provides SM83-specific functionality:
//! - Register, pair and condition code definitions
//! - Operand classification
//! - Instruction table, matcher and encoder

pub mod encoder;
pub mod matcher;
pub mod operand;
pub mod table;

pub use encoder::encode;
pub use matcher::match_format;
pub use operand::{classify, Operand, OperandTag};
pub use table::{Encoding, InstructionEntry, InstructionFormat, Trailing, INSTRUCTION_TABLE};

/// 8-bit registers, numbered by their encoding in the `rrr` opcode field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    B = 0,
    C = 1,
    D = 2,
    E = 3,
    H = 4,
    L = 5,
    A = 7,
}

impl Reg8 {
    pub const ALL: [Reg8; 7] = [
        Reg8::A,
        Reg8::B,
        Reg8::C,
        Reg8::D,
        Reg8::E,
        Reg8::H,
        Reg8::L,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "A" => Some(Reg8::A),
            "B" => Some(Reg8::B),
            "C" => Some(Reg8::C),
            "D" => Some(Reg8::D),
            "E" => Some(Reg8::E),
            "H" => Some(Reg8::H),
            "L" => Some(Reg8::L),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// 16-bit register pairs, numbered by their encoding in the `rr` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    Bc = 0,
    De = 1,
    Hl = 2,
    Sp = 3,
}

impl Reg16 {
    pub const ALL: [Reg16; 4] = [Reg16::Bc, Reg16::De, Reg16::Hl, Reg16::Sp];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BC" => Some(Reg16::Bc),
            "DE" => Some(Reg16::De),
            "HL" => Some(Reg16::Hl),
            "SP" => Some(Reg16::Sp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reg16::Bc => "BC",
            Reg16::De => "DE",
            Reg16::Hl => "HL",
            Reg16::Sp => "SP",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Branch conditions, numbered by their encoding in the `cc` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    Nz = 0,
    Z = 1,
    Nc = 2,
    C = 3,
}

impl Condition {
    pub const ALL: [Condition; 4] = [Condition::Nz, Condition::Z, Condition::Nc, Condition::C];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NZ" => Some(Condition::Nz),
            "Z" => Some(Condition::Z),
            "NC" => Some(Condition::Nc),
            "C" => Some(Condition::C),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Condition::Nz => "NZ",
            Condition::Z => "Z",
            Condition::Nc => "NC",
            Condition::C => "C",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Memory-indirect operand spellings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Indirect {
    Hl,
    Bc,
    De,
    C,
    HlInc,
    HlDec,
}

impl Indirect {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "(HL)" => Some(Indirect::Hl),
            "(BC)" => Some(Indirect::Bc),
            "(DE)" => Some(Indirect::De),
            "(C)" => Some(Indirect::C),
            "(HL+)" => Some(Indirect::HlInc),
            "(HL-)" => Some(Indirect::HlDec),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Indirect::Hl => "(HL)",
            Indirect::Bc => "(BC)",
            Indirect::De => "(DE)",
            Indirect::C => "(C)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        }
    }
}
