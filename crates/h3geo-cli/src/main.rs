use clap::Parser;
use std::time::Instant;
mod cli;
mod commands;
mod utils;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start = Instant::now();
    let cli = cli::Cli::parse();
    cli.execute()?;
    log::info!("Finished in {}", utils::time_diff(start.elapsed()));
    Ok(())
}
