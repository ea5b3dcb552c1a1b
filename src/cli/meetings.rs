use crate::config::Config;
use crate::db::SqliteMeetingStore;
use crate::meeting::MeetingStore;
use anyhow::{anyhow, Result};

use super::args::MeetingsCliArgs;

pub fn handle_meetings_command(args: MeetingsCliArgs) -> Result<()> {
    let config = Config::load()?;
    let store = SqliteMeetingStore::open(&config.storage.db_path()?)?;

    if let Some(id) = args.id {
        let meeting = store
            .get_meeting(id)?
            .ok_or_else(|| anyhow!("Meeting with ID {} not found", id))?;

        println!("Meeting #{}: {}", meeting.id, meeting.title);
        println!("Status: {} | Created: {}", meeting.status.as_str(), meeting.created_at);
        println!("\n=== Transcript ===\n");

        let transcript = store.transcript(id)?;
        if transcript.is_empty() {
            println!("(no messages)");
        } else {
            println!("{}", transcript);
        }

        if let Some(archive) = store.get_archive(id)? {
            println!("\n=== Closing summary ===\n");
            println!("{}", archive.summary);
        }
        return Ok(());
    }

    let owner = if args.all {
        None
    } else {
        Some(args.owner.unwrap_or_else(|| config.assistant.owner.clone()))
    };
    let meetings = store.list_meetings(owner.as_deref(), args.limit)?;

    if meetings.is_empty() {
        println!("No meetings found.");
        return Ok(());
    }

    println!("Found {} meeting(s):\n", meetings.len());
    for meeting in meetings {
        println!("ID: {}", meeting.id);
        println!("Title: {}", meeting.title);
        println!("Status: {}", meeting.status.as_str());
        println!("Created: {}", meeting.created_at);
        println!("---");
    }

    println!("\nTo print a transcript, use: orlem meetings --id <ID>");

    Ok(())
}
