// cropwise-cli/src/lib.rs
//
// Library portion of the Cropwise CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, DetectArgs, TracksArgs};
pub use commands::detect::run_detect;
pub use commands::tracks::run_tracks;
