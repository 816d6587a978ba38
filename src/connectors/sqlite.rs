use std::path::Path;

use rusqlite::params_from_iter;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::StoreError,
    models::{Event, EventId},
};

/// Local `events` table, used for development without a hosted store.
pub struct SqliteConnection {
    connection: Mutex<rusqlite::Connection>,
}

impl SqliteConnection {
    pub fn open(database_path: &Path) -> Result<Self, StoreError> {
        debug!("Using database at {}", database_path.display());
        Self::init(rusqlite::Connection::open(database_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(rusqlite::Connection::open_in_memory()?)
    }

    fn init(connection: rusqlite::Connection) -> Result<Self, StoreError> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    end_datetime TEXT NOT NULL,
                    is_expired INTEGER NOT NULL DEFAULT 0
                )",
            (),
        )?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub async fn expirable_events(&self, now: &str) -> Result<Vec<Event>, StoreError> {
        let connection = self.connection.lock().await;
        let mut stmt = connection.prepare(
            "SELECT id, title, end_datetime FROM events
                WHERE is_expired = 0 AND julianday(end_datetime) < julianday(?1)
                ORDER BY id",
        )?;
        let events = stmt
            .query_map([now], |row| {
                Ok(Event {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    end_datetime: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    pub async fn mark_expired(&self, ids: &[EventId]) -> Result<usize, StoreError> {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let connection = self.connection.lock().await;
        let num_updated = connection.execute(
            &format!("UPDATE events SET is_expired = 1 WHERE id IN ({placeholders})"),
            params_from_iter(ids.iter()),
        )?;
        Ok(num_updated)
    }
}

#[cfg(test)]
impl SqliteConnection {
    pub async fn insert_event(&self, title: &str, end_datetime: &str) -> Result<EventId, StoreError> {
        let connection = self.connection.lock().await;
        connection.execute(
            "INSERT INTO events (title, end_datetime) VALUES (?, ?)",
            (title, end_datetime),
        )?;
        Ok(EventId::Integer(connection.last_insert_rowid()))
    }

    pub async fn is_expired(&self, id: &EventId) -> Result<bool, StoreError> {
        let connection = self.connection.lock().await;
        let is_expired = connection.query_row(
            "SELECT is_expired FROM events WHERE id = ?",
            [id],
            |row| row.get(0),
        )?;
        Ok(is_expired)
    }
}
