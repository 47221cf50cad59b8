// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Program image with binary output helper.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only program image, addressed from zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageStore {
    bytes: Vec<u8>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn num_entries(&self) -> usize {
        self.bytes.len()
    }

    pub fn store_slice(&mut self, values: &[u8]) {
        self.bytes.extend_from_slice(values);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_bin<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(&self.bytes)?;
        out.flush()
    }

    /// Write the image to `path`, replacing it only once all bytes are out.
    pub fn write_bin_file(&self, path: &Path) -> io::Result<()> {
        let tmp = staging_path(path);
        let result = File::create(&tmp)
            .and_then(|file| self.write_bin(file))
            .and_then(|()| fs::rename(&tmp, path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
