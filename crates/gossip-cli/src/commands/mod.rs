//! CLI command definitions and dispatch.

pub mod auth;
pub mod chats;
pub mod connections;
pub mod presence;
pub mod users;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gossip_auth::SessionStore;
use gossip_client::{ApiClient, RetryPolicy, select_gateway};
use gossip_core::config::AppConfig;
use gossip_core::config::session::GatewayKind;
use gossip_core::error::AppError;
use gossip_core::traits::KeyValueStore;
use gossip_entity::user::User;

use crate::output::OutputFormat;

/// GossipGo command-line client
#[derive(Debug, Parser)]
#[command(name = "gossip", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and per-environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to load
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in
    Login(auth::LoginArgs),
    /// Create an account and sign in
    Signup(auth::SignupArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change the display name
    Profile(auth::ProfileArgs),
    /// Change the password
    Password(auth::PasswordArgs),
    /// Browse the user directory
    Users(users::UsersArgs),
    /// Manage connection requests
    Connections(connections::ConnectionsArgs),
    /// Browse chats
    Chats(chats::ChatsArgs),
    /// Watch the presence channel
    Presence(presence::PresenceArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let ctx = Context::open(self).await?;
        match &self.command {
            Commands::Login(args) => auth::login(&ctx, args).await,
            Commands::Signup(args) => auth::signup(&ctx, args).await,
            Commands::Logout => auth::logout(&ctx).await,
            Commands::Whoami => auth::whoami(&ctx).await,
            Commands::Profile(args) => auth::profile(&ctx, args).await,
            Commands::Password(args) => auth::password(&ctx, args).await,
            Commands::Users(args) => users::execute(&ctx, args).await,
            Commands::Connections(args) => connections::execute(&ctx, args).await,
            Commands::Chats(args) => chats::execute(&ctx, args).await,
            Commands::Presence(args) => presence::execute(&ctx, args).await,
        }
    }
}

/// Everything a command needs, built once per invocation.
pub struct Context {
    pub config: AppConfig,
    pub format: OutputFormat,
    pub store: Arc<dyn KeyValueStore>,
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
}

impl Context {
    async fn open(cli: &Cli) -> Result<Self, AppError> {
        let config = AppConfig::load_from(std::path::Path::new(&cli.config), &cli.env)?;
        let store = gossip_storage::build_store(&config.session).await?;

        let mut api = ApiClient::new(&config.api)?;
        if config.session.gateway == GatewayKind::Mock {
            // No backend in demo mode; fail over to local data at once.
            api = api.with_retry(RetryPolicy::none());
        }
        let api = Arc::new(api);

        let session = SessionStore::new(
            select_gateway(config.session.gateway, &api),
            Arc::clone(&store),
            config.session.storage_key.clone(),
        );
        if let Some(restored) = session.restore().await? {
            api.set_token(restored.token);
        }

        Ok(Self {
            config,
            format: cli.format,
            store,
            api,
            session,
        })
    }

    /// The signed-in user, or an `Authentication` error.
    pub async fn require_user(&self) -> Result<User, AppError> {
        self.session
            .current_user()
            .await
            .ok_or_else(|| AppError::authentication("Not signed in; run `gossip login` first"))
    }

    /// Whether remote calls go to a real backend.
    pub fn online(&self) -> bool {
        self.config.session.gateway == GatewayKind::Http
    }

    /// Fail for commands that only exist on the backend.
    pub fn require_online(&self) -> Result<(), AppError> {
        if self.online() {
            Ok(())
        } else {
            Err(AppError::configuration(
                "This command needs session.gateway = \"http\"",
            ))
        }
    }
}

/// Map a dialoguer failure onto the error type.
pub fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
