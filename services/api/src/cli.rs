use crate::commands::{
    run_audit, run_compare, run_generate, run_score, ApplicantArgs, AuditArgs, GenerateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fair_tenant::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Fair Tenant Screening",
    about = "Score tenant applications, compare against the legacy model and audit disparities",
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
    /// Score one applicant with the feature-based model
    Score(ApplicantArgs),
    /// Score one applicant with both models and estimate the rent at risk
    Compare(ApplicantArgs),
    /// Run a disparity audit over a CSV batch or a synthetic population
    Audit(AuditArgs),
    /// Write a synthetic legacy training table
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Train the legacy model from this CSV instead of APP_TRAINING_DATA
    #[arg(long)]
    pub(crate) training_data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Compare(args) => run_compare(args),
        Command::Audit(args) => run_audit(args),
        Command::Generate(args) => run_generate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["fair-tenant-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_comma_separated_history() {
        let cli = Cli::try_parse_from([
            "fair-tenant-api",
            "score",
            "--income",
            "3000",
            "--rent",
            "1000",
            "--history",
            "2900,3000,3100",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                let record = args.record();
                assert_eq!(record.monthly_income, 3000.0);
                assert_eq!(record.liquid_savings, 0.0);
                assert_eq!(record.income_history, Some(vec![2900.0, 3000.0, 3100.0]));
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn audit_requires_a_source() {
        assert!(Cli::try_parse_from(["fair-tenant-api", "audit"]).is_err());
        assert!(
            Cli::try_parse_from(["fair-tenant-api", "audit", "--synthetic", "200"]).is_ok()
        );
    }
}
