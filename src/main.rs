// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for gbasm.

use std::io;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match gbasm::assembler::run() {
        Ok(report) => {
            tracing::info!(
                output = %report.output.display(),
                bytes = report.bytes,
                labels = report.labels,
                "image written"
            );
        }
        Err(err) => {
            for diag in err.diagnostics() {
                eprintln!("{}", diag.format_with_context(Some(err.source_lines())));
            }
            if err.diagnostics().is_empty() {
                eprintln!("{err}");
            }
            std::process::exit(1);
        }
    }
}
