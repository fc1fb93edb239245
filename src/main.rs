// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Command-line entry point: recover a secret from a share file.
//!
//! Run with:
//!   sss-recover shares.json
//!   sss-recover --format json --check-unused shares.json
//!   RUST_LOG=debug sss-recover shares.json

use clap::Parser;
use sss_recover::{
  recover::{RecoverOptions, recover},
  report::{ReportFormat, write_report},
  share_file::ShareFile,
};
use std::{error::Error, io, path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Recover a Shamir secret from a threshold of base-encoded shares
#[derive(Parser, Debug)]
#[command(name = "sss-recover", version, about)]
struct Args {
  /// Path to the JSON share file
  path: PathBuf,

  /// Output format
  #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
  format: ReportFormat,

  /// Check whether shares beyond the threshold agree with the recovered polynomial
  #[arg(long)]
  check_unused: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
  let file = ShareFile::load(&args.path)?;
  let options = RecoverOptions {
    check_unused: args.check_unused,
  };
  let recovery = recover(&file, &options)?;
  info!(secret_digits = recovery.secret().to_string().len(), "secret recovered");

  let stdout = io::stdout();
  write_report(&recovery, args.format, &mut stdout.lock())?;
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_target(false)
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}
