//! dcmfind CLI: find DICOM files under a directory whose metadata matches every --query.

use anyhow::Result;
use clap::Parser;
use dcmfind::engine::arg_parser::Cli;
use dcmfind::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
