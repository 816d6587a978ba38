use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::StoreError,
    models::{Event, EventId},
};

/// PostgREST connection to the `events` table, authenticated with a service role key.
pub struct HttpConnection {
    events_url: url::Url,
    service_role_key: String,
    client: reqwest::Client,
}

impl HttpConnection {
    pub fn new(
        url: url::Url,
        service_role_key: String,
        timeout: Duration,
    ) -> Result<HttpConnection, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpConnection {
            events_url: events_url(url)?,
            service_role_key,
            client,
        })
    }

    pub async fn expirable_events(&self, now: &str) -> Result<Vec<Event>, StoreError> {
        let end_filter = format!("lt.{now}");
        debug!("Fetching unexpired events ending before {} from {}", now, self.events_url);
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", "id,title,end_datetime"),
                ("is_expired", "eq.false"),
                ("end_datetime", end_filter.as_str()),
            ])
            .send()
            .await?;
        let response = accepted(response).await?;
        Ok(response.json().await?)
    }

    pub async fn mark_expired(&self, ids: &[EventId]) -> Result<(), StoreError> {
        debug!("Marking {} events expired on {}", ids.len(), self.events_url);
        let response = self
            .request(Method::PATCH)
            .query(&[("id", in_filter(ids))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "is_expired": true }))
            .send()
            .await?;
        accepted(response).await?;
        Ok(())
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.events_url.clone())
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }
}

fn events_url(mut base: url::Url) -> Result<url::Url, url::ParseError> {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("rest/v1/events")
}

fn in_filter(ids: &[EventId]) -> String {
    let values: Vec<String> = ids.iter().map(EventId::to_filter_value).collect();
    format!("in.({})", values.join(","))
}

#[derive(Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

async fn accepted(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status,
        message: rejection_message(status, &body),
    })
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<PostgrestError>(body)
        .ok()
        .and_then(|error| error.message)
    {
        return message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
