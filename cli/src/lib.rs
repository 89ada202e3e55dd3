//! Shared pieces of the `fathom-test-api` and `fathom-test-filters` binaries.

pub mod display;
pub mod logging;

use clap::Args;

/// Flags every binary accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Log outgoing HTTP requests (credentials truncated) to stderr
    #[arg(long)]
    pub debug: bool,
}
