use crate::{
    error::StoreError,
    models::{Event, EventId},
};

use super::{http::HttpConnection, sqlite::SqliteConnection};

pub enum Connection {
    Http(HttpConnection),
    Sqlite(SqliteConnection),
}

impl Connection {
    /// Events with `is_expired = false` and `end_datetime < now`.
    pub async fn expirable_events(&self, now: &str) -> Result<Vec<Event>, StoreError> {
        match self {
            Connection::Http(http) => http.expirable_events(now).await,
            Connection::Sqlite(sqlite) => sqlite.expirable_events(now).await,
        }
    }

    pub async fn mark_expired(&self, ids: &[EventId]) -> Result<(), StoreError> {
        match self {
            Connection::Http(http) => http.mark_expired(ids).await,
            Connection::Sqlite(sqlite) => sqlite.mark_expired(ids).await.map(|_| ()),
        }
    }
}
