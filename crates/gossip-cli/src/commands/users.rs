//! User directory commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gossip_core::error::AppError;
use gossip_entity::user::User;
use gossip_service::UserDirectory;
use gossip_service::directory::{Listing, Origin};
use gossip_service::seed;

use super::Context;
use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UsersArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UsersCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List every user
    List,
    /// Search users by name
    Search {
        /// Part of the name, any case
        query: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Display name
    name: String,
    /// Presence
    status: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            status: if user.is_online { "online" } else { "offline" }.to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(ctx: &Context, args: &UsersArgs) -> Result<(), AppError> {
    let mut directory = UserDirectory::new(ctx.api.clone(), seed::users());
    if let Some(me) = ctx.session.current_user().await {
        directory = directory.for_user(me.id);
    }

    let listing = match &args.command {
        UsersCommand::List => directory.list_users().await,
        UsersCommand::Search { query } => directory.search(query).await,
    };
    print_listing(ctx, &listing);
    Ok(())
}

fn print_listing(ctx: &Context, listing: &Listing) {
    if listing.origin == Origin::Fallback {
        let reason = listing
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_default();
        output::print_warning(&format!("Backend unavailable ({reason}); showing sample users"));
    }
    let rows: Vec<UserRow> = listing.users.iter().map(UserRow::from).collect();
    output::print_list(&rows, ctx.format);
}

/// Shared with other commands that show users by id.
pub fn name_lookup(users: &[User]) -> impl Fn(&str) -> String + '_ {
    move |id| {
        users
            .iter()
            .find(|u| u.id.as_str() == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

