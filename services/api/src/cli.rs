use crate::assess::{run_assess, run_jobs, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use diy_assess::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "DIY Assess",
    about = "Serve or run home-repair risk assessments from the command line",
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
    /// Assess a single job description and print the result
    Assess(AssessArgs),
    /// List the jobs the offline catalog can recognise
    Jobs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args).await,
        Command::Jobs => run_jobs(),
    }
}
