use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use warden::auth::{AuthPipeline, CredentialStore, PolicyEngine};
use warden::web::handlers::AppState;
use warden::web::WebServer;
use warden::{Config, MemoryCounter};

/// Access gatekeeper for an HTTP resource server.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about)]
struct Cli {
    /// Config file (default: server.toml in . or ./config)
    #[arg(short, long, env = "SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SERVER_ADDRESS")]
    address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Casbin model document
    #[arg(long, env = "SERVER_AUTH_MODEL")]
    auth_model: Option<String>,

    /// Casbin policy document
    #[arg(long, env = "SERVER_AUTH_POLICY")]
    auth_policy: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.server.host = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = &self.auth_model {
            config.auth.model_path = model.clone();
        }
        if let Some(policy) = &self.auth_policy {
            config.auth.policy_path = policy.clone();
        }
    }
}

fn load_config(cli: &Cli) -> warden::Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)?;
            config.apply_env_overrides();
            (config, Some(path.clone()))
        }
        None => Config::discover()?,
    };
    cli.apply(&mut config);
    config.validate()?;
    Ok((config, source))
}

async fn run(config: Config) -> warden::Result<()> {
    let policy = Arc::new(
        PolicyEngine::load(
            &config.auth.model_path,
            &config.auth.policy_path,
            config.auth.policy_reload,
        )
        .await?,
    );
    #[cfg(unix)]
    let _reload_task = Arc::clone(&policy).watch_hangup();

    let pipeline = Arc::new(AuthPipeline::new(Arc::new(CredentialStore::new()), policy));
    let app_state = AppState::new(pipeline)
        .with_counter(Arc::new(MemoryCounter::new()))
        .with_hash_params(config.auth.hash)
        .with_token_length(config.auth.token_length);

    let server = WebServer::new(&config.server, Arc::new(app_state))?;
    server.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    if let Err(e) = warden::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        warden::logging::init_console_only(&config.logging.level);
    }

    info!("Warden {}", env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = run(config).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
