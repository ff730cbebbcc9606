//! Connection request commands.
//!
//! The graph lives in the local store under `session.connections_key`.
//! With the HTTP gateway every change is confirmed by the backend first.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gossip_core::error::AppError;
use gossip_core::types::UserId;
use gossip_entity::connection::Connection;
use gossip_service::seed;
use gossip_service::{ConnectionBook, SyncedConnectionBook};

use super::Context;
use super::users::name_lookup;
use crate::output;

/// Arguments for connection commands
#[derive(Debug, Args)]
pub struct ConnectionsArgs {
    /// Connection subcommand
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

/// Connection subcommands
#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List accepted connections
    List,
    /// List requests waiting for your answer
    Pending,
    /// Ask a user to connect
    Request {
        /// Target user id
        user: String,
    },
    /// Accept a request
    Accept {
        /// Requesting user id
        user: String,
    },
    /// Decline a request
    Decline {
        /// Requesting user id
        user: String,
    },
    /// Withdraw a request you sent
    Cancel {
        /// Target user id
        user: String,
    },
}

/// Connection display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ConnectionRow {
    /// Record ID
    id: String,
    /// The other user
    with: String,
    /// Who asked
    direction: String,
    /// Status
    status: String,
    /// Requested at
    created_at: String,
}

/// Execute connection commands
pub async fn execute(ctx: &Context, args: &ConnectionsArgs) -> Result<(), AppError> {
    let me = ctx.require_user().await?;
    let key = ctx.config.session.connections_key.as_str();
    let book = Arc::new(ConnectionBook::load(ctx.store.as_ref(), key, me.id.clone()).await?);
    let synced = ctx
        .online()
        .then(|| SyncedConnectionBook::new(Arc::clone(&book), ctx.api.clone()));

    if let Some(synced) = &synced {
        if let Err(e) = synced.refresh().await {
            output::print_warning(&format!("Could not refresh from backend: {}", e.message));
        }
    }

    match &args.command {
        ConnectionsCommand::List => print_rows(ctx, &me.id, &book.connected_users()),
        ConnectionsCommand::Pending => print_rows(ctx, &me.id, &book.pending_requests()),
        ConnectionsCommand::Request { user } => {
            let other = UserId::new(user.trim());
            match &synced {
                Some(s) => s.send_connection_request(&other).await?,
                None => book.send_connection_request(&other)?,
            };
            output::print_success(&format!("Connection request sent to {other}"));
        }
        ConnectionsCommand::Accept { user } => {
            let other = UserId::new(user.trim());
            match &synced {
                Some(s) => s.accept_connection_request(&other).await?,
                None => book.accept_connection_request(&other)?,
            };
            output::print_success(&format!("You are now connected with {other}"));
        }
        ConnectionsCommand::Decline { user } => {
            let other = UserId::new(user.trim());
            match &synced {
                Some(s) => s.decline_connection_request(&other).await?,
                None => book.decline_connection_request(&other)?,
            };
            output::print_success(&format!("Declined request from {other}"));
        }
        ConnectionsCommand::Cancel { user } => {
            let other = UserId::new(user.trim());
            match &synced {
                Some(s) => s.cancel_connection_request(&other).await?,
                None => book.cancel_connection_request(&other)?,
            };
            output::print_success(&format!("Cancelled request to {other}"));
        }
    }

    book.save(ctx.store.as_ref(), key).await
}

fn print_rows(ctx: &Context, me: &UserId, records: &[Connection]) {
    let users = seed::users();
    let name_of = name_lookup(&users);
    let rows: Vec<ConnectionRow> = records
        .iter()
        .map(|c| ConnectionRow {
            id: c.id.to_string(),
            with: c
                .counterpart(me)
                .map(|id| name_of(id.as_str()))
                .unwrap_or_default(),
            direction: if &c.from_user_id == me { "sent" } else { "received" }.to_string(),
            status: c.status.to_string(),
            created_at: c.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();
    output::print_list(&rows, ctx.format);
}
