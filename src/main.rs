//! `pds` binary entry point.

use clap::Parser;

use ppe_drift_sentinel::cli_app::{Cli, run};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("pds: {err}");
        std::process::exit(1);
    }
}
