//! `filiald`: the filial directory server.
//!
//! Usage:
//!   filiald -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/filial/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use filial_core::Module;
use tracing::info;

use config::ServerConfig;

/// Filial directory server.
#[derive(Parser, Debug)]
#[command(name = "filiald", about = "Organizational directory server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    server_config.verify()?;

    let core_config = server_config.service_config(cli.listen.as_deref());
    if let Some(dir) = &core_config.data_dir {
        std::fs::create_dir_all(dir)?;
    }

    let sqlite_path = core_config.resolve_sqlite_path();
    let sql: Arc<dyn filial_sql::SQLStore> = Arc::new(
        filial_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQLite store at {}", sqlite_path.display());

    let directory_module = directory::DirectoryModule::new(sql)
        .map_err(|e| anyhow::anyhow!("failed to initialize directory: {}", e))?;
    info!("{} module initialized", directory_module.name());

    let modules: Vec<Box<dyn Module>> = vec![Box::new(directory_module)];
    let app = routes::build_router(&modules);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("filiald listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
