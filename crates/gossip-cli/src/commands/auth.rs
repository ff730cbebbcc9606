//! Session and account commands: login, signup, logout, whoami, profile,
//! password.

use clap::Args;

use gossip_core::error::AppError;

use super::{Context, input_error};
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email or user id (will prompt if not provided)
    #[arg(short, long)]
    pub identifier: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `signup`
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Display name (will prompt if not provided)
    #[arg(short, long)]
    pub name: Option<String>,
    /// Email or user id (will prompt if not provided)
    #[arg(short, long)]
    pub identifier: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `profile`
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// New display name (will prompt if not provided)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for `password`
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Current password (will prompt if not provided)
    #[arg(long)]
    pub current: Option<String>,
    /// New password (will prompt if not provided)
    #[arg(long)]
    pub new: Option<String>,
}

fn ask(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(input_error),
    }
}

fn ask_password(value: &Option<String>, confirm: bool) -> Result<String, AppError> {
    ask_secret(value, "Password", confirm)
}

fn ask_secret(value: &Option<String>, label: &str, confirm: bool) -> Result<String, AppError> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    let prompt = dialoguer::Password::new().with_prompt(label);
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };
    prompt.interact().map_err(input_error)
}

/// `login`
pub async fn login(ctx: &Context, args: &LoginArgs) -> Result<(), AppError> {
    let identifier = ask(&args.identifier, "Email or user id")?;
    let password = ask_password(&args.password, false)?;

    let session = ctx.session.try_login(&identifier, &password).await?;
    output::print_success(&format!(
        "Signed in as {} (id: {})",
        session.user.name, session.user.id
    ));
    Ok(())
}

/// `signup`
pub async fn signup(ctx: &Context, args: &SignupArgs) -> Result<(), AppError> {
    let name = ask(&args.name, "Display name")?;
    let identifier = ask(&args.identifier, "Email or user id")?;
    let password = ask_password(&args.password, true)?;

    let session = ctx.session.try_signup(&name, &identifier, &password).await?;
    output::print_success(&format!(
        "Account created for {} (id: {})",
        session.user.name, session.user.id
    ));
    Ok(())
}

/// `logout`
pub async fn logout(ctx: &Context) -> Result<(), AppError> {
    if !ctx.session.is_authenticated().await {
        output::print_warning("Not signed in");
        return Ok(());
    }
    ctx.session.logout().await;
    ctx.api.clear_token();
    output::print_success("Signed out");
    Ok(())
}

/// `whoami`
pub async fn whoami(ctx: &Context) -> Result<(), AppError> {
    let Some(session) = ctx.session.snapshot().await else {
        output::print_warning("Not signed in");
        return Ok(());
    };

    match ctx.format {
        OutputFormat::Json => output::print_json(&session.user),
        OutputFormat::Table => {
            output::print_kv("Id", session.user.id.as_str());
            output::print_kv("Name", &session.user.name);
            output::print_kv("Avatar", session.user.avatar.as_deref().unwrap_or("-"));
            output::print_kv(
                "Signed in at",
                &session.authenticated_at.format("%Y-%m-%d %H:%M").to_string(),
            );
        }
    }
    Ok(())
}

/// `profile`
pub async fn profile(ctx: &Context, args: &ProfileArgs) -> Result<(), AppError> {
    ctx.require_user().await?;
    ctx.require_online()?;
    let name = ask(&args.name, "Display name")?;

    let user = ctx.api.update_profile(&name).await?;
    output::print_success(&format!("Profile updated: {}", user.name));
    Ok(())
}

/// `password`
pub async fn password(ctx: &Context, args: &PasswordArgs) -> Result<(), AppError> {
    ctx.require_user().await?;
    ctx.require_online()?;
    let current = ask_secret(&args.current, "Current password", false)?;
    let new = ask_secret(&args.new, "New password", true)?;

    ctx.api.change_password(&current, &new).await?;
    output::print_success("Password changed");
    Ok(())
}
