//! Presence channel commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};

use gossip_core::error::AppError;
use gossip_core::types::UserId;
use gossip_entity::message::Message;
use gossip_entity::user::User;
use gossip_realtime::{EventKind, PresenceEvent, PresenceRoster, build_channel};
use gossip_service::seed;

use super::Context;
use super::users::name_lookup;
use crate::output::{self, OutputFormat};

/// Arguments for presence commands
#[derive(Debug, Args)]
pub struct PresenceArgs {
    /// Presence subcommand
    #[command(subcommand)]
    pub command: PresenceCommand,
}

/// Presence subcommands
#[derive(Debug, Subcommand)]
pub enum PresenceCommand {
    /// Print presence events until Ctrl-C
    Watch {
        /// Stop after this many seconds
        #[arg(short, long)]
        seconds: Option<u64>,
        /// Send one message after connecting
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Execute presence commands
pub async fn execute(ctx: &Context, args: &PresenceArgs) -> Result<(), AppError> {
    let PresenceCommand::Watch { seconds, message } = &args.command;

    let channel = build_channel(&ctx.config.presence);
    let roster = Arc::new(PresenceRoster::new());
    let users = seed::users();
    roster.seed(&users);
    roster.attach(channel.listeners());

    let format = ctx.format;
    for kind in [
        EventKind::Connect,
        EventKind::Disconnect,
        EventKind::NewMessage,
        EventKind::UserStatus,
    ] {
        let users = users.clone();
        channel.listeners().on(kind, move |event| print_event(event, &users, format));
    }

    channel.connect().await?;
    println!("Watching {} presence channel, Ctrl-C to stop", channel.transport_name());

    if let Some(text) = message {
        let author = ctx
            .session
            .current_user()
            .await
            .map(|u| u.id)
            .unwrap_or_else(|| seed::current_user().id);
        if let Err(e) = channel.send_message(Message::new(author, text.clone())).await {
            output::print_warning(&format!("Message not sent: {}", e.message));
        }
    }

    let stop = async {
        match seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(*secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| AppError::internal(format!("Failed to listen for Ctrl-C: {e}")))?;
        }
        _ = stop => {}
    }

    channel.disconnect().await?;
    let online: Vec<String> = roster
        .online_ids()
        .iter()
        .map(UserId::to_string)
        .collect();
    output::print_kv("Online at exit", &online.join(", "));
    Ok(())
}

fn print_event(event: &PresenceEvent, users: &[User], format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_json(event);
        return;
    }
    let name_of = name_lookup(users);
    match event {
        PresenceEvent::Connect => output::print_success("Connected"),
        PresenceEvent::Disconnect => output::print_warning("Disconnected"),
        PresenceEvent::NewMessage(m) => {
            println!(
                "[{}] {}: {}",
                m.timestamp.format("%H:%M:%S"),
                name_of(m.user_id.as_str()),
                m.text
            );
        }
        PresenceEvent::UserStatus(update) => {
            let state = if update.is_online { "online" } else { "offline" };
            println!("{} is now {state}", name_of(update.user_id.as_str()));
        }
    }
}
