use std::{path::PathBuf, time::Duration};

use crate::{
    connectors::{connection::Connection, http::HttpConnection, sqlite::SqliteConnection},
    error::ExpireError,
};

/// Store settings injected into every invocation. Nothing is validated until
/// [`Configuration::connect`] runs, so a server with missing settings still answers
/// each call with a configuration error.
#[derive(Clone, bon::Builder)]
pub struct Configuration {
    #[builder(into)]
    store_url: Option<String>,
    #[builder(into)]
    service_role_key: Option<String>,
    #[builder(default = Duration::from_secs(30))]
    request_timeout: Duration,
}

impl Configuration {
    /// Builds a fresh store client for one invocation.
    pub fn connect(&self) -> Result<Connection, ExpireError> {
        let store_url = non_empty(&self.store_url).ok_or_else(|| {
            ExpireError::Configuration(
                "Store URL is not configured (set SUPABASE_URL or --store-url)".to_string(),
            )
        })?;
        let url = url::Url::parse(store_url).map_err(|e| {
            ExpireError::Configuration(format!("Invalid store URL {store_url:?}: {e}"))
        })?;

        match url.scheme() {
            "http" | "https" => {
                let service_role_key = non_empty(&self.service_role_key).ok_or_else(|| {
                    ExpireError::Configuration(
                        "Service credential is not configured (set SUPABASE_SERVICE_ROLE_KEY or --service-role-key)"
                            .to_string(),
                    )
                })?;
                let connection =
                    HttpConnection::new(url, service_role_key.to_string(), self.request_timeout)
                        .map_err(anyhow::Error::from)?;
                Ok(Connection::Http(connection))
            }
            "sqlite" => {
                let database_path = sqlite_path(&url)?;
                let connection = SqliteConnection::open(&database_path)
                    .map_err(|e| ExpireError::Unknown(e.into()))?;
                Ok(Connection::Sqlite(connection))
            }
            scheme => Err(ExpireError::Configuration(format!(
                "Unsupported store URL scheme {scheme:?}"
            ))),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

// `sqlite:///abs/path.db` or `sqlite://relative/path.db`
fn sqlite_path(url: &url::Url) -> Result<PathBuf, ExpireError> {
    let path = match url.host_str() {
        Some(host) => format!("{host}{}", url.path()),
        None => url.path().to_string(),
    };
    if path.is_empty() || path == "/" {
        return Err(ExpireError::Configuration(
            "SQLite store URL has no database path".to_string(),
        ));
    }
    Ok(PathBuf::from(path))
}
