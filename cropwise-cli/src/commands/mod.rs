//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// `detect`: runs detection through an editing session and prints the result.
pub mod detect;

/// `tracks`: lists the selectable tracks of a source.
pub mod tracks;

use anyhow::{Context, Result, bail};
use cropwise_core::Source;
use std::path::Path;

/// Probes `input` after checking that it exists.
pub(crate) fn load_input(input: &Path) -> Result<Source> {
    if !input.is_file() {
        bail!("Input file not found: {}", input.display());
    }
    cropwise_core::load_source(input)
        .with_context(|| format!("Failed to probe input '{}'", input.display()))
}
