use anyhow::Result;
use clap::{Parser, Subcommand};
use momentum::cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so rendered frames on stdout stay parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => args.run(),
        Command::Replay(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "momentum", about = "Inertial fling tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a fling from a given position and release velocity.
    Simulate(cli::simulate::SimulateArgs),
    /// Estimate the release velocity of a recorded gesture and fling from it.
    Replay(cli::replay::ReplayArgs),
}
