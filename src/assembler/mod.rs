// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! SM83 assembler - main entry point.
//!
//! Assembly runs in two passes over the source:
//!
//! 1. The label pass strips comments and labels, keeps the instruction lines
//!    and records each label at the address of its line.
//! 2. The encoding pass classifies every operand, picks the first matching
//!    table format and appends the encoded bytes to the image.
//!
//! The label pass advances the address by a fixed two bytes per
//! instruction line, whatever the instruction's real length. Labels are
//! recorded and handed to the encoder but operands never refer to them, so
//! the image does not depend on those addresses.

pub mod cli;


use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::core::assembler::error::{AsmError, AsmErrorKind, AsmRunError, Diagnostic};
use crate::core::imagestore::ImageStore;
use crate::core::symbol_table::{SymbolTable, SymbolTableResult};
use crate::core::text_utils::{normalize_instruction, split_comment, split_instruction, split_label};
use crate::sm83::{classify, encode, match_format, Operand};

use cli::{validate_cli, Cli};

pub use cli::VERSION;

/// Address advance per instruction line during the label pass.
pub const LINE_ADDRESS_STEP: u32 = 2;

/// An instruction line with comments and labels removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the input.
    pub line_num: u32,
    pub text: String,
    /// Address assigned by the label pass.
    pub addr: u32,
}

/// Output of the label pass.
#[derive(Debug, Default)]
pub struct LabelPass {
    pub lines: Vec<SourceLine>,
    pub symbols: SymbolTable,
}

/// Result of a complete assembly.
#[derive(Debug)]
pub struct Assembly {
    pub image: ImageStore,
    pub symbols: SymbolTable,
}

/// Summary of a successful command-line run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmRunReport {
    pub output: PathBuf,
    pub bytes: usize,
    pub labels: usize,
}

/// Run the assembler with command-line arguments.
pub fn run() -> Result<AsmRunReport, AsmRunError> {
    let cli = Cli::parse();
    let config = validate_cli(&cli)?;
    assemble_file(&config.input, &config.output, Some(config.input_name))
}

/// Assemble `input` and write the raw image to `output`.
///
/// Nothing is written unless every line assembles.
pub fn assemble_file(
    input: &Path,
    output: &Path,
    display_name: Option<String>,
) -> Result<AsmRunReport, AsmRunError> {
    let source = fs::read_to_string(input).map_err(|err| {
        AsmRunError::from(AsmError::new(
            AsmErrorKind::Io,
            "Error opening file",
            Some(&format!("{}: {err}", input.display())),
        ))
    })?;

    let assembly = assemble_source(&source).map_err(|err| attach_file(err, display_name))?;

    tracing::debug!(output = %output.display(), bytes = assembly.image.num_entries(), "writing image");
    assembly.image.write_bin_file(output).map_err(|err| {
        AsmRunError::from(AsmError::new(
            AsmErrorKind::Io,
            "Error writing file",
            Some(&format!("{}: {err}", output.display())),
        ))
    })?;

    Ok(AsmRunReport {
        output: output.to_path_buf(),
        bytes: assembly.image.num_entries(),
        labels: assembly.symbols.len(),
    })
}

/// Assemble source text into an image.
pub fn assemble_source(source: &str) -> Result<Assembly, AsmRunError> {
    let source_lines = || source.lines().map(str::to_string).collect::<Vec<_>>();

    tracing::trace!("starting label pass");
    let pass = scan_labels(source)
        .map_err(|diag| AsmRunError::new(diag.error().clone(), vec![diag], source_lines()))?;
    for entry in pass.symbols.entries() {
        tracing::debug!(label = %entry.name, addr = entry.val, line = entry.line, "label");
    }

    tracing::trace!("starting encoding pass");
    let image = assemble_lines(&pass.lines, &pass.symbols)
        .map_err(|diag| AsmRunError::new(diag.error().clone(), vec![diag], source_lines()))?;

    Ok(Assembly {
        image,
        symbols: pass.symbols,
    })
}

/// Strip comments and labels, recording labels at the running address.
pub fn scan_labels(source: &str) -> Result<LabelPass, Diagnostic> {
    let mut pass = LabelPass::default();
    let mut addr: u32 = 0;

    for (idx, raw) in source.lines().enumerate() {
        let line_num = idx as u32 + 1;
        let (code, _) = split_comment(raw);
        let (label, text) = split_label(code.trim());

        if let Some(label) = label {
            define_label(&mut pass.symbols, label, addr, line_num)?;
        }

        if !text.is_empty() {
            pass.lines.push(SourceLine {
                line_num,
                text: text.to_string(),
                addr,
            });
            addr += LINE_ADDRESS_STEP;
        }
    }

    Ok(pass)
}

fn define_label(
    symbols: &mut SymbolTable,
    label: &str,
    addr: u32,
    line_num: u32,
) -> Result<(), Diagnostic> {
    if label.is_empty() {
        return Err(Diagnostic::new(
            line_num,
            AsmError::new(AsmErrorKind::Symbol, "Missing label name", None),
        ));
    }
    match symbols.add(label, addr, line_num) {
        SymbolTableResult::Ok => Ok(()),
        SymbolTableResult::Duplicate => Err(Diagnostic::new(
            line_num,
            AsmError::new(AsmErrorKind::Symbol, "Label defined more than once", Some(label)),
        )),
    }
}

/// Encode every cleaned line in order. Stops at the first failing line.
pub fn assemble_lines(lines: &[SourceLine], symbols: &SymbolTable) -> Result<ImageStore, Diagnostic> {
    let mut image = ImageStore::new();
    for line in lines {
        let bytes =
            encode_line(&line.text, symbols).map_err(|err| Diagnostic::new(line.line_num, err))?;
        image.store_slice(&bytes);
    }
    Ok(image)
}

/// Encode one instruction line (no label, no comment).
pub fn encode_line(text: &str, symbols: &SymbolTable) -> Result<Vec<u8>, AsmError> {
    let normalized = normalize_instruction(text);
    let Some((mnemonic, tokens)) = split_instruction(&normalized) else {
        return Ok(Vec::new());
    };

    let operands = tokens
        .iter()
        .map(|token| classify(token, symbols))
        .collect::<Result<Vec<Operand>, AsmError>>()?;

    let format = match_format(mnemonic, &operands)
        .ok_or_else(|| AsmError::unknown_instruction(mnemonic, operands.len()))?;
    let bytes = encode(format, &operands)?;

    tracing::debug!(
        instruction = %mnemonic,
        operands = %format_operands(&operands),
        shape = ?format.shape,
        bytes = %hex_bytes(&bytes),
        "encoded"
    );
    Ok(bytes)
}

fn attach_file(err: AsmRunError, file: Option<String>) -> AsmRunError {
    if file.is_none() {
        return err;
    }
    let diagnostics = err
        .diagnostics()
        .iter()
        .cloned()
        .map(|diag| diag.with_file(file.clone()))
        .collect();
    AsmRunError::new(err.error().clone(), diagnostics, err.source_lines().to_vec())
}

fn format_operands(operands: &[Operand]) -> String {
    operands
        .iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
