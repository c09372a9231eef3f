use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sirsim::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    sim_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a config file with the default parameters.
    Create,

    /// Simulate the configured outbreak and save its trajectory.
    Run,

    /// Summarize the saved trajectory.
    Analyze,

    /// Remove every generated file.
    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.sim_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Create => mgr.create_config()?,
        Command::Run => mgr.run_simulation()?,
        Command::Analyze => mgr.analyze_run()?,
        Command::Clean => mgr.clean_sim()?,
    }

    Ok(())
}
