//! Chat list: search, filtering, ordering, archiving.

pub mod label;
pub mod list;

pub use label::relative_time_label;
pub use list::{ChatFilter, ChatList};
