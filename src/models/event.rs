use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier. Never interpreted, only echoed back to the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EventId {
    Integer(i64),
    Text(String),
}

impl EventId {
    /// Literal form accepted inside a PostgREST `in.(...)` filter.
    pub fn to_filter_value(&self) -> String {
        match self {
            EventId::Integer(id) => id.to_string(),
            EventId::Text(id) => format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Integer(id) => write!(f, "{id}"),
            EventId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Integer(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(id.to_string())
    }
}

impl ToSql for EventId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            EventId::Integer(id) => Ok(ToSqlOutput::from(*id)),
            EventId::Text(id) => Ok(ToSqlOutput::from(id.as_str())),
        }
    }
}

impl FromSql for EventId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(id) => Ok(EventId::Integer(id)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|id| EventId::Text(id.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// The projection of an event row read when discovering expiration candidates.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: Option<String>,
    pub end_datetime: String,
}

impl Event {
    pub fn expired(&self) -> ExpiredEvent {
        ExpiredEvent {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpiredEvent {
    pub id: EventId,
    pub title: Option<String>,
}
