// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Symbol table for labels.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTableEntry {
    pub name: String,
    pub val: u32,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SymbolTableResult {
    Ok,
    Duplicate,
}

/// Labels in definition order. Names are case-sensitive.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolTableEntry>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, name: &str, val: u32, line: u32) -> SymbolTableResult {
        if self.entry(name).is_some() {
            return SymbolTableResult::Duplicate;
        }
        self.entries.push(SymbolTableEntry {
            name: name.to_string(),
            val,
            line,
        });
        SymbolTableResult::Ok
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entry(name).map(|entry| entry.val)
    }

    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SymbolTableEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[SymbolTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
