use clap::Parser;
use jarvis_core::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Jarvis relay: authenticated command dispatch plus a chat fallback.
#[derive(Debug, Parser)]
#[command(name = "jarvis-relay", version)]
struct Cli {
    /// Bind host, overrides APP_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides APP_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Emit JSON log lines instead of human-readable ones
    #[arg(long, env = "JARVIS_LOG_JSON", default_value_t = false)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(true)
                    .with_file(false),
            )
            .init();
    }
}

/// Command-line flags win over the environment.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    apply_overrides(&mut config, &cli);

    tracing::info!(?config, "Configuration loaded");

    web_service::run(config).await
}
