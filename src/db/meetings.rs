//! Meeting record persistence.
//!
//! Raw SQL with rusqlite, no ORM. Each repository is a namespace of
//! functions over a borrowed connection.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::meeting::{Meeting, MeetingArchive, MeetingStatus, Message, MessageRole};

pub struct WorkspaceRepository;

impl WorkspaceRepository {
    /// Returns the owner's workspace id, creating it on first use.
    pub fn get_or_create(conn: &Connection, owner: &str) -> Result<i64> {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM workspaces WHERE owner = ?1",
                params![owner],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query workspace")?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO workspaces (owner, name) VALUES (?1, ?2)",
            params![owner, format!("Workspace de {}", owner)],
        )
        .context("Failed to insert workspace")?;

        Ok(conn.last_insert_rowid())
    }
}

const MEETING_COLUMNS: &str =
    "m.id, m.workspace_id, m.title, m.source, m.status, m.created_at, m.updated_at";

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    let status: String = row.get(4)?;
    Ok(Meeting {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        title: row.get(2)?,
        source: row.get(3)?,
        status: MeetingStatus::parse(&status).unwrap_or(MeetingStatus::Open),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Repository for meeting records.
pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a new open meeting. Returns the new meeting ID.
    pub fn insert(conn: &Connection, workspace_id: i64, title: &str, source: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO meetings (workspace_id, title, source, status) VALUES (?1, ?2, ?3, ?4)",
            params![workspace_id, title, source, MeetingStatus::Open.as_str()],
        )
        .context("Failed to insert meeting")?;

        Ok(conn.last_insert_rowid())
    }

    pub fn update_status(conn: &Connection, id: i64, status: MeetingStatus) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE meetings SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                params![status.as_str(), id],
            )
            .context("Failed to update meeting status")?;

        if changed == 0 {
            return Err(anyhow!("Meeting {} not found", id));
        }
        Ok(())
    }

    /// Bumps `updated_at` so recently active meetings sort first.
    pub fn touch(conn: &Connection, id: i64) -> Result<()> {
        conn.execute(
            "UPDATE meetings SET updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
            params![id],
        )
        .context("Failed to touch meeting")?;
        Ok(())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Meeting>> {
        let sql = format!("SELECT {} FROM meetings m WHERE m.id = ?1", MEETING_COLUMNS);
        conn.query_row(&sql, params![id], meeting_from_row)
            .optional()
            .context("Failed to query meeting")
    }

    /// List meetings, newest first, optionally restricted to one owner.
    pub fn list(conn: &Connection, owner: Option<&str>, limit: usize) -> Result<Vec<Meeting>> {
        let mut meetings = Vec::new();

        match owner {
            Some(owner) => {
                let sql = format!(
                    "SELECT {} FROM meetings m JOIN workspaces w ON w.id = m.workspace_id \
                     WHERE w.owner = ?1 ORDER BY m.created_at DESC, m.id DESC LIMIT ?2",
                    MEETING_COLUMNS
                );
                let mut stmt = conn
                    .prepare(&sql)
                    .context("Failed to prepare meetings list query")?;
                let rows = stmt
                    .query_map(params![owner, limit as i64], meeting_from_row)
                    .context("Failed to list meetings")?;
                for row in rows {
                    meetings.push(row?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM meetings m ORDER BY m.created_at DESC, m.id DESC LIMIT ?1",
                    MEETING_COLUMNS
                );
                let mut stmt = conn
                    .prepare(&sql)
                    .context("Failed to prepare meetings list query")?;
                let rows = stmt
                    .query_map(params![limit as i64], meeting_from_row)
                    .context("Failed to list meetings")?;
                for row in rows {
                    meetings.push(row?);
                }
            }
        }

        Ok(meetings)
    }
}

/// Repository for meeting messages. Messages are never updated.
pub struct MessageRepository;

impl MessageRepository {
    pub fn insert(
        conn: &Connection,
        meeting_id: i64,
        role: MessageRole,
        content: &str,
        meta: Option<&Value>,
    ) -> Result<i64> {
        let meta = meta.map(serde_json::to_string).transpose()?;
        conn.execute(
            "INSERT INTO messages (meeting_id, role, content, meta) VALUES (?1, ?2, ?3, ?4)",
            params![meeting_id, role.as_str(), content, meta],
        )
        .with_context(|| format!("Failed to insert message for meeting {}", meeting_id))?;

        Ok(conn.last_insert_rowid())
    }

    /// Messages in creation order.
    pub fn list_for_meeting(conn: &Connection, meeting_id: i64) -> Result<Vec<Message>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, meeting_id, role, content, meta, created_at FROM messages \
                 WHERE meeting_id = ?1 ORDER BY created_at ASC, id ASC",
            )
            .context("Failed to prepare messages query")?;

        let rows = stmt
            .query_map(params![meeting_id], |row| {
                let role: String = row.get(2)?;
                let meta: Option<String> = row.get(4)?;
                Ok(Message {
                    id: row.get(0)?,
                    meeting_id: row.get(1)?,
                    role: MessageRole::parse(&role).unwrap_or(MessageRole::System),
                    content: row.get(3)?,
                    meta: meta.and_then(|m| serde_json::from_str(&m).ok()),
                    created_at: row.get(5)?,
                })
            })
            .context("Failed to query messages")?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    pub fn count_for_meeting(conn: &Connection, meeting_id: i64) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE meeting_id = ?1",
            params![meeting_id],
            |row| row.get(0),
        )
        .context("Failed to count messages")
    }
}

pub struct ArchiveRepository;

impl ArchiveRepository {
    /// Replaces any earlier snapshot for the same meeting.
    pub fn upsert(conn: &Connection, meeting_id: i64, summary: &str, transcript: &str) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO meeting_archives (meeting_id, summary, transcript) \
             VALUES (?1, ?2, ?3)",
            params![meeting_id, summary, transcript],
        )
        .context("Failed to store meeting archive")?;
        Ok(())
    }

    pub fn get(conn: &Connection, meeting_id: i64) -> Result<Option<MeetingArchive>> {
        conn.query_row(
            "SELECT meeting_id, summary, transcript, created_at FROM meeting_archives \
             WHERE meeting_id = ?1",
            params![meeting_id],
            |row| {
                Ok(MeetingArchive {
                    meeting_id: row.get(0)?,
                    summary: row.get(1)?,
                    transcript: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()
        .context("Failed to query meeting archive")
    }
}
