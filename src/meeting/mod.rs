//! Live meeting records.
//!
//! A meeting is opened lazily by the first substantive utterance of a
//! session and owns an append-only list of messages. The transcript is
//! never stored; it is rebuilt from the messages when needed.

pub mod status;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use status::{MeetingStatus, MessageRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub workspace_id: i64,
    pub title: String,
    pub source: String,
    pub status: MeetingStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub meeting_id: i64,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub created_at: String,
}

/// Closing snapshot stored when a meeting ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingArchive {
    pub meeting_id: i64,
    pub summary: String,
    pub transcript: String,
    pub created_at: String,
}

/// `role: content` lines in message order.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Relational storage for meetings and their messages.
pub trait MeetingStore: Send + Sync {
    /// Creates an open meeting in the owner's workspace, creating the
    /// workspace first when the owner has none.
    fn create_meeting(&self, owner: &str, title: &str, source: &str) -> Result<Meeting>;

    /// Fails when `meeting_id` does not exist.
    fn add_message(
        &self,
        meeting_id: i64,
        role: MessageRole,
        content: &str,
        meta: Option<&Value>,
    ) -> Result<i64>;

    fn get_messages(&self, meeting_id: i64) -> Result<Vec<Message>>;

    fn get_meeting(&self, meeting_id: i64) -> Result<Option<Meeting>>;

    /// Newest first. `None` lists every owner.
    fn list_meetings(&self, owner: Option<&str>, limit: usize) -> Result<Vec<Meeting>>;

    /// Stores the closing snapshot and marks the meeting closed.
    fn close_meeting(&self, meeting_id: i64, summary: &str, transcript: &str) -> Result<()>;

    fn get_archive(&self, meeting_id: i64) -> Result<Option<MeetingArchive>>;

    fn transcript(&self, meeting_id: i64) -> Result<String> {
        Ok(transcript(&self.get_messages(meeting_id)?))
    }
}
