// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and reporting for the assembler.

use std::fmt;

/// Categories of assembler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmErrorKind {
    Cli,
    InvalidOperand,
    Io,
    MalformedLiteral,
    Symbol,
    UnknownInstruction,
}

/// An assembler error with a kind and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    kind: AsmErrorKind,
    message: String,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn invalid_operand(token: &str) -> Self {
        Self::new(AsmErrorKind::InvalidOperand, "Invalid operand", Some(token))
    }

    pub fn malformed_literal(token: &str) -> Self {
        Self::new(AsmErrorKind::MalformedLiteral, "Malformed literal", Some(token))
    }

    pub fn unknown_instruction(mnemonic: &str, operand_count: usize) -> Self {
        let param = format!("{mnemonic} with {operand_count} operand(s)");
        Self::new(
            AsmErrorKind::UnknownInstruction,
            "No matching instruction",
            Some(&param),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.kind
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AsmError {}

/// A diagnostic message tied to a source line.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub(crate) line: u32,
    pub(crate) error: AsmError,
    pub(crate) file: Option<String>,
}

impl Diagnostic {
    pub fn new(line: u32, error: AsmError) -> Self {
        Self {
            line,
            error,
            file: None,
        }
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn error(&self) -> &AsmError {
        &self.error
    }

    pub fn format_with_context(&self, lines: Option<&[String]>) -> String {
        let header = match &self.file {
            Some(file) => format!("{file}:{}: ERROR", self.line),
            None => format!("{}: ERROR", self.line),
        };

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&build_context_line(self.line, lines));
        out.push('\n');
        out.push_str(&format!("ERROR: {}", self.error.message()));
        out
    }
}

/// Error from a failed assembly run.
#[derive(Debug)]
pub struct AsmRunError {
    error: AsmError,
    diagnostics: Vec<Diagnostic>,
    source_lines: Vec<String>,
}

impl AsmRunError {
    pub fn new(error: AsmError, diagnostics: Vec<Diagnostic>, source_lines: Vec<String>) -> Self {
        Self {
            error,
            diagnostics,
            source_lines,
        }
    }

    pub fn error(&self) -> &AsmError {
        &self.error
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.error.kind()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }
}

impl From<AsmError> for AsmRunError {
    fn from(error: AsmError) -> Self {
        Self::new(error, Vec::new(), Vec::new())
    }
}

impl fmt::Display for AsmRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for AsmRunError {}

/// Build the `  NN | source` context line for error display.
pub fn build_context_line(line_num: u32, lines: Option<&[String]>) -> String {
    let line_idx = line_num.saturating_sub(1) as usize;
    match lines.and_then(|lines| lines.get(line_idx)) {
        Some(line) => format!("{:>5} | {}", line_num, line),
        None => format!("{:>5} | <source unavailable>", line_num),
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}
