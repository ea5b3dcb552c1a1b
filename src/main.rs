use anyhow::Result;
use clap::Parser;
use orlem::{
    app,
    cli::{handle_ask_command, handle_logs_command, handle_meetings_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Orlem {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Meetings(args)) => {
            handle_meetings_command(args)?;
            return Ok(());
        }
        Some(CliCommand::Logs(args)) => {
            handle_logs_command(args)?;
            return Ok(());
        }
        Some(CliCommand::Ask(args)) => {
            handle_ask_command(args).await?;
            return Ok(());
        }
        None => {}
    }

    app::run_service().await
}
