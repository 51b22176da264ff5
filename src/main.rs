use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = cattery_site::cli::Cli::parse();
    cattery_site::logging::init(cli.default_log_directive()).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        cattery_site::cli::Command::Generate(args) => {
            cattery_site::snapshot::run(args).context("generate")?;
        }
        cattery_site::cli::Command::Check(args) => {
            cattery_site::snapshot::check(args).context("check")?;
        }
        cattery_site::cli::Command::Query(args) => {
            cattery_site::query::run(args).context("query")?;
        }
    }

    Ok(())
}
