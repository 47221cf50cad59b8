// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-agnostic assembler core.
//!
//! # Components
//!
//! - [`text_utils`] - Line cleanup (comments, labels, hex prefixes, operand splitting)
//! - [`symbol_table`] - Label management
//! - [`imagestore`] - Binary image output
//! - [`assembler`] - Errors and diagnostics

pub mod assembler;
pub mod imagestore;
pub mod symbol_table;
pub mod text_utils;

// Re-exports for convenience
pub use assembler::error::{AsmError, AsmErrorKind, AsmRunError, Diagnostic};
pub use imagestore::ImageStore;
pub use symbol_table::SymbolTable;
