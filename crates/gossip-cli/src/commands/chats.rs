//! Chat commands. Chats come from the sample data; with the HTTP gateway
//! the backend's archived chats are merged in and history, blocking and
//! group membership go to the backend.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gossip_core::error::AppError;
use gossip_core::types::ChatId;
use gossip_entity::chat::ChatSummary;
use gossip_entity::message::Message;
use gossip_service::chat::relative_time_label;
use gossip_service::seed;
use gossip_service::{ChatFilter, ChatList, MessageLog};

use super::Context;
use crate::output;

/// Arguments for chat commands
#[derive(Debug, Args)]
pub struct ChatsArgs {
    /// Chat subcommand
    #[command(subcommand)]
    pub command: ChatsCommand,
}

/// Chat subcommands
#[derive(Debug, Subcommand)]
pub enum ChatsCommand {
    /// List chats, unread first
    List {
        /// Match on chat name or last message
        #[arg(short, long, default_value = "")]
        query: String,
        /// `all` or `groups`
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// List archived chats
    Archived,
    /// Move an archived chat back to the main list
    Unarchive {
        /// Chat id
        id: String,
    },
    /// Delete a chat
    Delete {
        /// Chat id
        id: String,
    },
    /// Show the most recent messages of a chat
    History {
        /// Chat id
        id: String,
        /// How many messages to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Block the other participant of a direct chat
    Block {
        /// Chat id
        id: String,
    },
    /// Leave a group chat
    Leave {
        /// Chat id
        id: String,
    },
}

/// Chat display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ChatRow {
    /// Chat ID
    id: String,
    /// Name
    name: String,
    /// Last message preview
    last_message: String,
    /// Relative time
    time: String,
    /// Unread count
    unread: u32,
    /// Direct or group
    kind: String,
}

/// Message display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MessageRow {
    /// Sent at
    time: String,
    /// Author
    from: String,
    /// Body
    text: String,
}

impl ChatRow {
    fn new(chat: &ChatSummary, now: DateTime<Utc>) -> Self {
        Self {
            id: chat.id.to_string(),
            name: chat.name.clone(),
            last_message: chat.last_message.clone(),
            time: relative_time_label(chat.timestamp, now),
            unread: chat.unread_count,
            kind: if chat.is_group { "group" } else { "direct" }.to_string(),
        }
    }
}

/// Execute chat commands
pub async fn execute(ctx: &Context, args: &ChatsArgs) -> Result<(), AppError> {
    let now = Utc::now();
    let mut chats = ChatList::new(seed::chats(now));
    if ctx.online() {
        if let Err(e) = chats.sync_archived(ctx.api.as_ref()).await {
            output::print_warning(&format!("Could not load archived chats: {}", e.message));
        }
    }

    match &args.command {
        ChatsCommand::List { query, filter } => {
            let filter: ChatFilter = filter.parse()?;
            print_rows(ctx, &chats.visible(query, filter), now);
        }
        ChatsCommand::Archived => print_rows(ctx, &chats.archived(), now),
        ChatsCommand::Unarchive { id } => {
            let id = ChatId::new(id.trim());
            if ctx.online() {
                chats.unarchive_remote(ctx.api.as_ref(), &id).await?;
            } else {
                chats.unarchive(&id)?;
            }
            output::print_success(&format!("Chat {id} unarchived"));
        }
        ChatsCommand::Delete { id } => {
            let id = ChatId::new(id.trim());
            let removed = if ctx.online() {
                chats.delete_remote(ctx.api.as_ref(), &id).await?
            } else {
                chats.delete(&id)?
            };
            output::print_success(&format!("Chat '{}' deleted", removed.name));
        }
        ChatsCommand::History { id, limit } => {
            let id = ChatId::new(id.trim());
            let log = if ctx.online() {
                MessageLog::with_messages(ctx.api.list_messages(&id).await?)
            } else {
                MessageLog::with_messages(seed::messages())
            };
            print_history(ctx, &log.history(&id, *limit));
        }
        ChatsCommand::Block { id } => {
            let chat = group_check(&chats, id, false)?;
            ctx.require_online()?;
            ctx.api.block_chat(&chat.id).await?;
            output::print_success(&format!("{} has been blocked", chat.name));
        }
        ChatsCommand::Leave { id } => {
            let chat = group_check(&chats, id, true)?;
            ctx.require_online()?;
            ctx.api.leave_group(&chat.id).await?;
            output::print_success(&format!("Left {}", chat.name));
        }
    }
    Ok(())
}

/// Blocking applies to direct chats, leaving to groups.
fn group_check(chats: &ChatList, id: &str, group: bool) -> Result<ChatSummary, AppError> {
    let id = ChatId::new(id.trim());
    let chat = chats
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Chat {id} not found")))?;
    match (group, chat.is_group) {
        (true, false) => Err(AppError::validation("Can only leave group chats")),
        (false, true) => Err(AppError::validation("Cannot block in group chats")),
        _ => Ok(chat),
    }
}

fn print_history(ctx: &Context, messages: &[Message]) {
    let mut users = seed::users();
    users.push(seed::current_user());
    let name_of = super::users::name_lookup(&users);
    let rows: Vec<MessageRow> = messages
        .iter()
        .map(|m| MessageRow {
            time: m.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            from: name_of(m.user_id.as_str()),
            text: m.text.clone(),
        })
        .collect();
    output::print_list(&rows, ctx.format);
}

fn print_rows(ctx: &Context, chats: &[ChatSummary], now: DateTime<Utc>) {
    let rows: Vec<ChatRow> = chats.iter().map(|c| ChatRow::new(c, now)).collect();
    output::print_list(&rows, ctx.format);
}
