pub mod api;
pub mod app;
pub mod brain;
pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod global;
pub mod logs;
pub mod meeting;
pub mod session;
pub mod speech;

#[cfg(test)]
pub(crate) mod test_utils;
