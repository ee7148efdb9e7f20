use anyhow::Result;
use clap::Parser;
use coverage_reporter::app::{self, Args, CoverageConfig};

fn main() -> Result<()> {
    let args = Args::parse();
    report_core::init_tracing();
    let config = CoverageConfig::from(args);
    app::run(config)?;
    Ok(())
}
