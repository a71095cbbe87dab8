use crate::scoring::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mfd_crm::config::AppConfig;
use mfd_crm::error::AppError;
use mfd_crm::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "MFD Risk Profiler",
    about = "Serve and exercise risk profiling for mutual fund distributor leads",
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
    /// Score a single questionnaire against a framework file and print the result
    Score(ScoreArgs),
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
        Command::Score(args) => {
            let config = AppConfig::load()?;
            telemetry::init(&config.telemetry)?;
            run_score(args)
        }
    }
}
