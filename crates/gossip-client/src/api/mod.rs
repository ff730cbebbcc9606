//! Endpoint groups. Each module implements one backend seam on
//! [`ApiClient`](crate::ApiClient).

pub mod account;
pub mod auth;
pub mod chats;
pub mod connections;
pub mod messages;
pub mod users;

/// Backend routes, relative to the base URL.
pub mod paths {
    pub const AUTH_LOGIN: &str = "/api/auth/login";
    pub const AUTH_REGISTER: &str = "/api/auth/register";
    pub const AUTH_LOGOUT: &str = "/api/auth/logout";
    pub const USERS: &str = "/api/users";
    pub const USERS_SEARCH: &str = "/api/users/search";
    pub const USERS_BATCH: &str = "/api/users/batch";
    pub const CONNECTIONS: &str = "/api/connections";
    pub const CONNECTIONS_REQUEST: &str = "/api/connections/request";
    pub const CONNECTIONS_ACCEPT: &str = "/api/connections/accept";
    pub const CONNECTIONS_DECLINE: &str = "/api/connections/decline";
    pub const CONNECTIONS_CANCEL: &str = "/api/connections/cancel";
    pub const MESSAGES: &str = "/api/messages";
    pub const CALLS_START: &str = "/api/calls/start";
    pub const CHATS: &str = "/api/chats";
    pub const CHATS_ARCHIVED: &str = "/api/chats/archived";
    pub const GROUPS: &str = "/api/groups";
    pub const USER_PROFILE: &str = "/api/user/profile";
    pub const USER_CHANGE_PASSWORD: &str = "/api/user/change-password";
}
