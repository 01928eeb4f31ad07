use crate::report::{run_history, run_report, HistoryArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rapture_gauge::config::AppConfig;
use rapture_gauge::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rapture Readiness Gauge",
    about = "Serve or inspect the readiness score from the command line",
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
    /// Offline views of the gauge
    Gauge {
        #[command(subcommand)]
        command: GaugeCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GaugeCommand {
    /// Print the score, category breakdown and prediction
    Report(ReportArgs),
    /// Print the yearly historical series
    History(HistoryArgs),
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
        Command::Gauge { command } => {
            let config = AppConfig::load()?;
            match command {
                GaugeCommand::Report(args) => run_report(&config.gauge, args),
                GaugeCommand::History(args) => run_history(&config.gauge, args),
            }
        }
    }
}
