use anyhow::Result;
use clap::Parser;
use test_reporter::app::{self, Args, TestConfig};

fn main() -> Result<()> {
    let args = Args::parse();
    report_core::init_tracing();
    let config = TestConfig::from(args);
    app::run(config)?;
    Ok(())
}
