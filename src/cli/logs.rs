//! CLI handler for conversation logs.
//!
//! This module handles terminal presentation.
//! Core logic lives in the `logs` module.

use crate::config::Config;
use crate::logs::{JsonlLogStore, LogStore};
use anyhow::Result;

use super::args::LogsCliArgs;

pub fn handle_logs_command(args: LogsCliArgs) -> Result<()> {
    let config = Config::load()?;
    let store = JsonlLogStore::new(config.storage.logs_dir()?)?;

    match (args.name, args.rename) {
        (Some(name), Some(new_name)) => {
            let renamed = store.rename(&name, &new_name)?;
            println!("Renamed {} -> {}", name, renamed);
        }
        (Some(name), None) => {
            let transcript = store.read_transcript(&name)?;
            if transcript.is_empty() {
                println!("Log {} has no entries.", name);
            } else {
                println!("{}", transcript);
            }
        }
        (None, _) => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No logs found in {:?}.", store.dir());
                return Ok(());
            }

            println!("=== Conversation logs ({}) ===\n", names.len());
            for name in names {
                println!("{}", name);
            }
            println!("\nTo print one, use: orlem logs --name <NAME>");
        }
    }

    Ok(())
}
