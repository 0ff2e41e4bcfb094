use crate::demo::{run_dataset_export, run_dataset_show, run_demo, DatasetArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_routing::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Routing",
    about = "Run the fleet routing service or inspect vehicle routing datasets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect or normalise YAML datasets
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },
    /// Seed an in-memory fleet, exercise it, and print the resulting dataset
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DatasetCommand {
    /// Print a summary of a dataset
    Show(DatasetArgs),
    /// Re-emit a dataset in canonical form
    Export(DatasetArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the fleet from this YAML dataset on startup
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dataset {
            command: DatasetCommand::Show(args),
        } => run_dataset_show(args),
        Command::Dataset {
            command: DatasetCommand::Export(args),
        } => run_dataset_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
