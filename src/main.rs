//! LMS API Gateway
//!
//! A table-driven reverse proxy in front of the LMS backend services.
//!
//! # Architecture Overview
//!
//! ```text
//! Client Request
//!     → http::server (request id, trace, CORS, security headers)
//!     → http::request (route table lookup on the first path segment,
//!                      outbound headers with the route's API key)
//!     → routing::rewrite (upstream path from the route's target)
//!     → http::forward (single upstream call, streamed bodies)
//!     → Client Response (upstream status verbatim, or JSON envelope:
//!                        404 no route, 502 upstream failure, 500 fault)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use lms_gateway::config::{env::NODE_ENV, load_from_env, Environment};
use lms_gateway::lifecycle::{signals, startup, Shutdown};
use lms_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "lms-gateway")]
#[command(about = "API gateway for the LMS backend services", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve the configuration, print the route table and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let environment = std::env::var(NODE_ENV)
        .map(|value| Environment::from_node_env(&value))
        .unwrap_or_default();
    logging::init(environment);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("lms-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_from_env(cli.config.as_deref())?;
    let server = startup::build(config)?;

    if cli.check {
        for line in startup::describe_routes(server.routes()) {
            println!("{}", line);
        }
        return Ok(());
    }

    if let Some(addr) = server.config().observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let listener = startup::bind(server.config()).await?;
    startup::announce(server.config(), server.routes(), listener.local_addr()?);

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
