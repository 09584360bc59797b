mod account;
mod nearby;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vecinos_api::VecinosClient;

use crate::account::ProfileCommands;
use crate::nearby::NearbyArgs;

#[derive(Debug, Parser)]
#[command(name = "vecinos")]
#[command(about = "Find neighbours offering services near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for service providers around the current position
    Nearby(NearbyArgs),
    /// Log in and print the token to export as `VECINOS_TOKEN`
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VECINOS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "VECINOS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in user's profile
    Me,
    /// Edit the signed-in user's profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vecinos: run `vecinos --help` to list commands");
        return Ok(());
    };

    let config = vecinos_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = VecinosClient::new(
        &config.api_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    tracing::debug!(api_url = %client.base_url(), env = %config.env, "starting vecinos");

    match command {
        Commands::Nearby(args) => nearby::run_nearby(&client, &config, args).await,
        Commands::Login { email, password } => {
            account::run_login(&client, &email, &password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => account::run_register(&client, &name, &email, &password).await,
        Commands::Me => account::run_me(&client, &config).await,
        Commands::Profile { command } => account::run_profile(&client, &config, command).await,
    }
}

#[cfg(test)]
mod tests;
