use clap::Parser;
use flashdeck::config::{self, CliArgs, Config};
use flashdeck::{create_app, db, run_migrations};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber: human output on stdout, plus a daily
/// rolling JSON file when a log directory is configured
///
/// The returned guard flushes the file writer when dropped, so it must live
/// as long as the server.
fn init_tracing(config: &Config, debug: bool) -> Option<WorkerGuard> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "flashdeck.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let debug_mode = args.debug;
    let config = config::get_config(args);
    let _guard = init_tracing(&config, debug_mode);
    info!("Starting flashdeck on port {} (debug: {})", config.port, debug_mode);

    let pool = db::init_pool(&config.database_url)?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }
    info!("Database ready at {}", config.database_url);

    let app = create_app(Arc::new(pool));

    let ip = if debug_mode { [127, 0, 0, 1] } else { [0, 0, 0, 0] };
    let addr = SocketAddr::from((ip, config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        warn!("Server stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}
