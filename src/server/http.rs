use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    extract::{Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{configuration::Configuration, server::tasks::expire_events};

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Clone)]
pub struct AppState {
    config: Arc<Configuration>,
}

pub fn router(config: Arc<Configuration>) -> Router {
    let state = AppState { config };
    Router::new()
        .route("/", any(handle_expire))
        .route("/auto-expire-events", any(handle_expire))
        .route("/version", get(version))
        .layer(middleware::from_fn(cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_http_server(
    config: Configuration,
    bind_address: &str,
    interval: Option<Duration>,
) -> Result<()> {
    let config = Arc::new(config);

    if let Some(interval) = interval {
        let config = config.clone();
        info!("Expiring events every {} seconds", interval.as_secs());
        tokio::spawn(async move {
            expire_events::run_every(&config, interval).await;
        });
    }

    let app = router(config);

    info!("{} listening on {}", version_string(), bind_address);
    let listener = TcpListener::bind(bind_address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_expire(method: Method, State(state): State<AppState>) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, "ok").into_response();
    }

    match expire_events::invoke(&state.config).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Auto-expire function error: {:?}", e);
            e.into_response()
        }
    }
}

async fn version() -> impl IntoResponse {
    (StatusCode::OK, version_string())
}

fn version_string() -> String {
    let git_version = crate::built_info::GIT_VERSION.unwrap_or("unknown");
    format!(
        "{} {} (git:{})",
        crate::built_info::PKG_NAME,
        crate::built_info::PKG_VERSION,
        git_version
    )
}

async fn cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}
