use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratemail::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Print the current exchange rate
    Rate,
    /// Subscribe an email address to rate notifications
    Subscribe {
        /// Address to notify
        email: String,
    },
    /// List subscribed email addresses
    Subscribers,
    /// Mail the current exchange rate to every subscriber
    Send,
}

impl From<Commands> for ratemail::AppCommand {
    fn from(cmd: Commands) -> ratemail::AppCommand {
        match cmd {
            Commands::Rate => ratemail::AppCommand::Rate,
            Commands::Subscribe { email } => ratemail::AppCommand::Subscribe(email),
            Commands::Subscribers => ratemail::AppCommand::Subscribers,
            Commands::Send => ratemail::AppCommand::Send,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ratemail::cli::setup::setup(),
        Some(cmd) => ratemail::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
