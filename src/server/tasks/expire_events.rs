use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    api::{ExpireFailure, ExpireSummary},
    configuration::Configuration,
    connectors::connection::Connection,
    error::ExpireError,
    models::{iso_timestamp, EventId, ExpiredEvent},
};

/// One invocation: a fresh client and a single `now` shared by the read, the write and
/// the reported timestamp.
pub async fn invoke(config: &Configuration) -> Result<ExpireSummary, ExpireError> {
    let now = Utc::now();
    let connection = config.connect()?;
    run(&connection, now).await
}

/// One invocation rendered as the JSON body the HTTP handler would answer with, plus
/// the failure when there was one.
pub async fn invoke_rendered(
    config: &Configuration,
) -> serde_json::Result<(String, Option<ExpireError>)> {
    match invoke(config).await {
        Ok(summary) => Ok((serde_json::to_string_pretty(&summary)?, None)),
        Err(e) => {
            let failure = ExpireFailure::new(&e, Utc::now());
            Ok((serde_json::to_string_pretty(&failure)?, Some(e)))
        }
    }
}

/// Invokes forever, `interval` apart. A failed invocation is logged and the next one
/// still runs.
pub async fn run_every(config: &Configuration, interval: Duration) {
    loop {
        if let Err(e) = invoke(config).await {
            warn!("Scheduled expiration failed: {}", e);
        }
        sleep(interval).await;
    }
}

pub async fn run(connection: &Connection, now: DateTime<Utc>) -> Result<ExpireSummary, ExpireError> {
    let now_timestamp = iso_timestamp(now);
    let events = connection
        .expirable_events(&now_timestamp)
        .await
        .map_err(ExpireError::Query)?;

    if events.is_empty() {
        return Ok(ExpireSummary::nothing_to_expire(now));
    }

    let ids: Vec<EventId> = events.iter().map(|event| event.id.clone()).collect();
    connection
        .mark_expired(&ids)
        .await
        .map_err(ExpireError::Update)?;

    info!("Auto-expired {} events", ids.len());
    for event in &events {
        info!(
            "  - {} (ID: {}, ended: {})",
            event.title.as_deref().unwrap_or("(untitled)"),
            event.id,
            event.end_datetime
        );
    }

    let expired: Vec<ExpiredEvent> = events.iter().map(|event| event.expired()).collect();
    Ok(ExpireSummary::expired(expired, now))
}
