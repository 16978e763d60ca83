//! CLI entry point for the QUICC alerts service.
//!
//! `serve` runs the HTTP API; the other subcommands run a single query
//! against the configured services and print the JSON:API document.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use quicc_alerts::alerts::{AlertResult, AlertsService, QueryOptions};
use quicc_alerts::config::Config;
use quicc_alerts::fetch::auth::UrlParam;
use quicc_alerts::fetch::{BasicClient, HttpClient};
use quicc_alerts::infra::cartodb::CartoDbClient;
use quicc_alerts::infra::geostore::GeostoreClient;
use quicc_alerts::serializer::{serialize_alerts, serialize_latest};
use quicc_alerts::server::{self, AppState};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quicc_alerts")]
#[command(about = "Deforestation alert statistics served from CartoDB", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    /// Date range as `begin,end` (defaults to yesterday,today)
    #[arg(short, long)]
    period: Option<String>,

    /// Also return the earliest and latest alert dates
    #[arg(short, long, default_value_t = false)]
    alert_query: bool,
}

impl QueryArgs {
    fn options(&self) -> QueryOptions {
        QueryOptions {
            alert_query: self.alert_query,
            period: self.period.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Alerts in a country, or in one of its provinces with --id1
    Admin {
        /// ISO 3166 country code
        iso: String,

        /// GADM level-1 id
        #[arg(long)]
        id1: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Alerts in a land-use polygon (mining, oilpalm, fiber, logging)
    Use {
        name: String,
        id: String,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Alerts in a WDPA protected area
    Wdpa {
        id: String,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Alerts in a geostore polygon
    World {
        /// Geostore hash
        geostore: String,

        /// Key forwarded to the geostore service as x-api-key
        #[arg(long)]
        api_key: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Most recent distinct alert dates
    Latest {
        /// Number of dates (default 3)
        #[arg(short, long)]
        limit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quicc_alerts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quicc_alerts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let service = Arc::new(build_service(&config)?);

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            info!(
                sql_url = %config.cartodb_sql_url,
                geostore_url = %config.geostore_url,
                "Starting server"
            );
            server::serve(AppState::new(service), &addr).await?;
        }
        Commands::Admin { iso, id1, query } => {
            let result = match id1 {
                Some(id1) => service.by_province(&iso, &id1, &query.options()).await?,
                None => service.by_admin(&iso, &query.options()).await?,
            };
            print_alerts(result.as_ref())?;
        }
        Commands::Use { name, id, query } => {
            let result = service.by_use_table(&name, &id, &query.options()).await?;
            print_alerts(result.as_ref())?;
        }
        Commands::Wdpa { id, query } => {
            let result = service.by_protected_area(&id, &query.options()).await?;
            print_alerts(result.as_ref())?;
        }
        Commands::World {
            geostore,
            api_key,
            query,
        } => {
            let result = service
                .by_polygon(Some(geostore.as_str()), &query.options(), api_key.as_deref())
                .await?;
            print_alerts(result.as_ref())?;
        }
        Commands::Latest { limit } => {
            let dates = service.latest(limit.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&serialize_latest(&dates))?);
        }
    }

    Ok(())
}

/// Wires the CartoDB and geostore clients into an [`AlertsService`].
fn build_service(config: &Config) -> Result<AlertsService> {
    let http = BasicClient::with_timeouts(config.request_timeout, config.connect_timeout)?;

    let sql_http: Arc<dyn HttpClient> = match &config.cartodb_api_key {
        Some(key) => Arc::new(UrlParam::new(http.clone(), "api_key", key.as_str())),
        None => Arc::new(http.clone()),
    };

    let sql = CartoDbClient::new(sql_http, &config.cartodb_sql_url)?;
    let geostore = GeostoreClient::new(Arc::new(http), config.geostore_url.clone());

    Ok(AlertsService::new(
        Arc::new(sql),
        Arc::new(geostore),
        config.cartodb_api_url.clone(),
    ))
}

fn print_alerts(result: Option<&AlertResult>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&serialize_alerts(result))?);
    Ok(())
}
