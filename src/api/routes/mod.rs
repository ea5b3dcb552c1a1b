//! API route modules.

pub mod logs;
pub mod meetings;
pub mod speech;
pub mod ws;
