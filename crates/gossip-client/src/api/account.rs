//! Account settings: profile and password.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use gossip_core::error::AppError;
use gossip_core::result::AppResult;
use gossip_core::types::decode_item;
use gossip_entity::user::User;

use super::paths;
use crate::client::ApiClient;

/// Shortest password the backend accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Rename the signed-in user and return the updated record.
    pub async fn update_profile(&self, name: &str) -> AppResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }
        let user: User = decode_item(self.put(paths::USER_PROFILE, &json!({ "name": name })).await?)?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Replace the signed-in user's password.
    ///
    /// Passwords shorter than [`MIN_PASSWORD_LEN`] are rejected without a
    /// request.
    pub async fn change_password(&self, current: &str, new: &str) -> AppResult<()> {
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let body = PasswordChange {
            current_password: current,
            new_password: new,
        };
        self.post(paths::USER_CHANGE_PASSWORD, &body).await?;
        info!("Password changed");
        Ok(())
    }
}
