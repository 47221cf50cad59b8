// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::core::assembler::error::{AsmError, AsmErrorKind, AsmRunError};

pub const VERSION: &str = "0.1";

const LONG_ABOUT: &str = "Game Boy (SM83) assembler producing raw binary images.

Reads INPUT, assembles every line and writes the machine code to OUTPUT with
no header. Operands are registers, conditions, $-prefixed hex literals
($nn for bytes, $nnnn for words, ($nn)/($nnnn) for memory) and bit indices.
OUTPUT is only written when the whole file assembles.
Set RUST_LOG=debug to trace labels and encoded instructions.";

#[derive(Parser, Debug)]
#[command(
    name = "gbasm",
    version = VERSION,
    about = "Game Boy (SM83) assembler producing raw binary images",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(value_name = "INPUT", help = "Assembly source file")]
    pub input: PathBuf,
    #[arg(value_name = "OUTPUT", help = "Binary image to write")]
    pub output: PathBuf,
}

/// Validated command-line configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Input path as shown in diagnostics.
    pub input_name: String,
}

pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmRunError> {
    if !cli.input.is_file() {
        return Err(cli_error(
            "Input file not found",
            Some(&cli.input.to_string_lossy()),
        ));
    }
    if cli.output.as_os_str().is_empty() || cli.output.is_dir() {
        return Err(cli_error(
            "Output must be a file path",
            Some(&cli.output.to_string_lossy()),
        ));
    }
    if same_path(&cli.input, &cli.output) {
        return Err(cli_error("Output would overwrite the input file", None));
    }

    Ok(CliConfig {
        input: cli.input.clone(),
        output: cli.output.clone(),
        input_name: cli.input.to_string_lossy().to_string(),
    })
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn cli_error(msg: &str, param: Option<&str>) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(AsmErrorKind::Cli, msg, param),
        Vec::new(),
        Vec::new(),
    )
}
