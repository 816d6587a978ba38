use std::time::Duration;

use anyhow::Result;
use clap::{command, Args, Parser, Subcommand};
use event_expiry::{
    configuration::Configuration,
    server::{http::start_http_server, tasks::expire_events},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct StoreArgs {
    #[arg(long, env = "SUPABASE_URL", global = true)]
    store_url: Option<String>,
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true, global = true)]
    service_role_key: Option<String>,
    #[arg(long, default_value_t = 30, global = true)]
    request_timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the expiration handler over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
        /// Also expire events in the background every N seconds
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Expire events once and print the result
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    let cli = Cli::parse();
    let config = Configuration::builder()
        .maybe_store_url(cli.store.store_url)
        .maybe_service_role_key(cli.store.service_role_key)
        .request_timeout(Duration::from_secs(cli.store.request_timeout_secs))
        .build();

    match cli.command {
        Commands::Serve {
            bind,
            interval_secs,
        } => start_http_server(config, &bind, interval_secs.map(Duration::from_secs)).await?,
        Commands::Run => {
            let (body, failure) = expire_events::invoke_rendered(&config).await?;
            println!("{body}");
            if let Some(e) = failure {
                return Err(e.into());
            }
        }
    }
    Ok(())
}
