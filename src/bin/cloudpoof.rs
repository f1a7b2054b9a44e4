//! CloudPoof Omega command-line binary.
//!
//! ```bash
//! cargo run --bin cloudpoof -- awaken --interactive
//! cargo run --bin cloudpoof -- manifest "deploy to production" -c precognitive
//! ```

use clap::Parser;
use cloudpoof::cli::{self, Cli};
use cloudpoof::telemetry;

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing(telemetry::CLI_FILTER);
    cli::run(Cli::parse())
}
