use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use super::meetings::{ArchiveRepository, MeetingRepository, MessageRepository, WorkspaceRepository};
use super::{init_db, migrate};
use crate::meeting::{Meeting, MeetingArchive, MeetingStatus, MeetingStore, Message, MessageRole};

/// [`MeetingStore`] over a single SQLite connection.
pub struct SqliteMeetingStore {
    conn: Mutex<Connection>,
}

impl SqliteMeetingStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = init_db(path)?;
        info!("Opened meeting database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Meeting database lock poisoned"))
    }
}

impl MeetingStore for SqliteMeetingStore {
    fn create_meeting(&self, owner: &str, title: &str, source: &str) -> Result<Meeting> {
        let conn = self.conn()?;
        let workspace_id = WorkspaceRepository::get_or_create(&conn, owner)?;
        let id = MeetingRepository::insert(&conn, workspace_id, title, source)?;
        MeetingRepository::get(&conn, id)?.ok_or_else(|| anyhow!("Meeting {} vanished after insert", id))
    }

    fn add_message(
        &self,
        meeting_id: i64,
        role: MessageRole,
        content: &str,
        meta: Option<&Value>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let id = MessageRepository::insert(&conn, meeting_id, role, content, meta)?;
        MeetingRepository::touch(&conn, meeting_id)?;
        Ok(id)
    }

    fn get_messages(&self, meeting_id: i64) -> Result<Vec<Message>> {
        MessageRepository::list_for_meeting(&*self.conn()?, meeting_id)
    }

    fn get_meeting(&self, meeting_id: i64) -> Result<Option<Meeting>> {
        MeetingRepository::get(&*self.conn()?, meeting_id)
    }

    fn list_meetings(&self, owner: Option<&str>, limit: usize) -> Result<Vec<Meeting>> {
        MeetingRepository::list(&*self.conn()?, owner, limit)
    }

    fn close_meeting(&self, meeting_id: i64, summary: &str, transcript: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().context("Failed to start transaction")?;
        ArchiveRepository::upsert(&tx, meeting_id, summary, transcript)?;
        MeetingRepository::update_status(&tx, meeting_id, MeetingStatus::Closed)?;
        tx.commit().context("Failed to commit meeting close")?;
        Ok(())
    }

    fn get_archive(&self, meeting_id: i64) -> Result<Option<MeetingArchive>> {
        ArchiveRepository::get(&*self.conn()?, meeting_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_meeting_opens_default_workspace() {
        let store = SqliteMeetingStore::in_memory().unwrap();

        let first = store.create_meeting("Ana", "Reunião 1", "live").unwrap();
        let second = store.create_meeting("Ana", "Reunião 2", "live").unwrap();

        assert_eq!(first.workspace_id, second.workspace_id);
        assert_eq!(first.status, MeetingStatus::Open);
    }

    #[test]
    fn test_transcript_is_rebuilt_from_messages() {
        let store = SqliteMeetingStore::in_memory().unwrap();
        let meeting = store.create_meeting("Ana", "Reunião", "live").unwrap();

        store
            .add_message(meeting.id, MessageRole::User, "vamos revisar o deploy", None)
            .unwrap();
        store
            .add_message(meeting.id, MessageRole::Assistant, "bora", None)
            .unwrap();

        assert_eq!(
            store.transcript(meeting.id).unwrap(),
            "user: vamos revisar o deploy\nassistant: bora"
        );
    }

    #[test]
    fn test_close_meeting_stores_snapshot() {
        let store = SqliteMeetingStore::in_memory().unwrap();
        let meeting = store.create_meeting("Ana", "Reunião", "live").unwrap();

        store
            .close_meeting(meeting.id, "Resumo rápido:\n- ok", "user: ok")
            .unwrap();

        let closed = store.get_meeting(meeting.id).unwrap().unwrap();
        assert_eq!(closed.status, MeetingStatus::Closed);
        let archive = store.get_archive(meeting.id).unwrap().unwrap();
        assert_eq!(archive.summary, "Resumo rápido:\n- ok");
        assert_eq!(archive.transcript, "user: ok");
    }

    #[test]
    fn test_close_unknown_meeting_writes_nothing() {
        let store = SqliteMeetingStore::in_memory().unwrap();
        assert!(store.close_meeting(77, "x", "y").is_err());
        assert!(store.get_archive(77).unwrap().is_none());
    }

    #[test]
    fn test_add_message_to_unknown_meeting_fails() {
        let store = SqliteMeetingStore::in_memory().unwrap();
        assert!(store.add_message(5, MessageRole::User, "oi", None).is_err());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orlem.db");

        {
            let store = SqliteMeetingStore::open(&path).unwrap();
            store.create_meeting("Ana", "Reunião", "live").unwrap();
        }

        let reopened = SqliteMeetingStore::open(&path).unwrap();
        assert_eq!(reopened.list_meetings(Some("Ana"), 10).unwrap().len(), 1);
    }
}
