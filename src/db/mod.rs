//! SQLite persistence for workspaces, meetings and messages.

mod init;
pub mod meetings;
mod store;

pub use init::{init_db, migrate};
pub use store::SqliteMeetingStore;
