//! Command-line account client
//!
//! Drives the client session layer against a CloudApex server, falling back
//! to a local account store when the server cannot be reached. The session
//! token and local accounts are kept under `--data-dir`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudapex::client::{
    AuthProvider, DynStorage, FallbackStore, FileStorage, LocalStore, RemoteStore,
};
use cloudapex::models::UserProfileUpdate;

#[derive(Parser)]
#[command(name = "cloudapex-account")]
#[command(about = "Manage a CloudApex account from the command line")]
#[command(version)]
struct Cli {
    /// Base URL of the CloudApex server
    #[arg(long, default_value = "http://localhost:8080")]
    api_url: String,

    /// Directory for the session token and offline accounts
    #[arg(long, default_value = ".cloudapex")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the logged-in user
    Me,
    /// Discard the saved session
    Logout,
    /// Update profile fields; omitted fields are left unchanged
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Change the account password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// List blog posts (server only)
    Blogs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudapex=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let storage: DynStorage = Arc::new(FileStorage::new(cli.data_dir.clone())?);
    let remote = Arc::new(RemoteStore::new(&cli.api_url)?);
    let store = FallbackStore::boxed(remote.clone(), Arc::new(LocalStore::new(storage.clone())));
    let provider = AuthProvider::new(store, storage);

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let session = provider.signup(&name, &email, &password).await?;
            print_json(&json!({ "token": session.token, "user": session.user }))?;
        }
        Commands::Login { email, password } => {
            let session = provider.login(&email, &password).await?;
            print_json(&json!({ "token": session.token, "user": session.user }))?;
        }
        Commands::Me => {
            let session = provider
                .restore()
                .await?
                .context("Not logged in")?;
            print_json(&session.user)?;
        }
        Commands::Logout => {
            provider.logout().await?;
            print_json(&json!({ "message": "Logged out" }))?;
        }
        Commands::UpdateProfile {
            name,
            bio,
            location,
            avatar,
        } => {
            provider.restore().await?.context("Not logged in")?;
            let update = UserProfileUpdate {
                name,
                bio,
                location,
                avatar,
            };
            let user = provider.update_profile(&update).await?;
            print_json(&user)?;
        }
        Commands::ChangePassword { current, new } => {
            provider.restore().await?.context("Not logged in")?;
            provider.change_password(&current, &new).await?;
            print_json(&json!({ "message": "Password updated" }))?;
        }
        Commands::Blogs => {
            let posts = remote.list_blogs().await?;
            print_json(&posts)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
