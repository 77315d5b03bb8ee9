use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contractor_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contractor Intake",
    about = "Run the contractor intake service or evaluate applicants from the command line",
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
    /// Evaluate a single applicant stored as compressed JSON
    Evaluate(EvaluateArgs),
    /// Run sample applicants through intake, evaluation, and enrichment
    Demo(DemoArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["contractor-intake-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "contractor-intake-api",
            "evaluate",
            "--file",
            "applicant.json",
            "--today",
            "2024-03-01",
            "--enrich",
            "--seed",
            "7",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.file.to_string_lossy(), "applicant.json");
                assert_eq!(args.today.map(|date| date.to_string()).as_deref(), Some("2024-03-01"));
                assert!(args.enrich);
                assert_eq!(args.seed, Some(7));
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result =
            Cli::try_parse_from(["contractor-intake-api", "demo", "--today", "03/01/2024"]);
        assert!(result.is_err());
    }
}
