use std::io::{self, Write};

use app_token_cli::{
    commands::{
        action_cmd::{self, ActionArgs},
        token_cmd,
    },
    config::TokenArgs,
    errors::Error,
};
use auth_handler::TokenExchanger;
use clap::{Parser, Subcommand};
use github_client::GitHubClient;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// get-app-token: Generate a GitHub App installation access token
#[derive(Parser)]
#[command(name = "get-app-token")]
#[command(
    about = "Generate a GitHub App installation token and print the value",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    token: TokenArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a GitHub App token for use in a GitHub action and set the
    /// "app_token" step output
    #[command(name = "for-gh-action")]
    ForGhAction(ActionArgs),

    /// Show the CLI version
    Version,
}

async fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), Error> {
    let credentials = cli.token.resolve_credentials()?;
    let exchanger = TokenExchanger::new(GitHubClient::new(cli.token.api_url())?);

    match &cli.command {
        Some(Commands::ForGhAction(args)) => {
            action_cmd::execute(&exchanger, &credentials, args, out).await
        }
        _ => token_cmd::execute(&exchanger, &credentials, out).await,
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout only carries the token
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(io::stderr))
        .with(EnvFilter::from_env("GET_APP_TOKEN_LOG"))
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        println!(
            "get-app-token version {}",
            option_env!("GET_APP_TOKEN_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
        );
        std::process::exit(0);
    }

    let mut stdout = io::stdout();
    if let Err(e) = run(&cli, &mut stdout).await {
        error!("Error: {e}");
        if let Some(Commands::ForGhAction(_)) = cli.command {
            println!("{}", action_cmd::error_command(&e));
        }
        std::process::exit(1);
    }
}
