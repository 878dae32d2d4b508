use anyhow::Result;
use clap::Parser;
use newsprep::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_writer(std::io::stderr).with_env_filter(EnvFilter::from_default_env()).init();
    run(Cli::parse())
}
