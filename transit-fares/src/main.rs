use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_fares::fares::{FareCalculator, FareError, FarePolicy};
use transit_fares::network::{NetworkError, TransitNetwork};
use transit_fares::web::{AppState, create_router};

/// Listen address when `FARES_ADDR` is not set.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Fare(#[from] FareError),

    #[error("invalid listen address {addr}: {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn required_path(var: &'static str) -> Result<PathBuf, StartupError> {
    std::env::var_os(var)
        .map(PathBuf::from)
        .ok_or(StartupError::MissingVar(var))
}

async fn run() -> Result<(), StartupError> {
    let network_path = required_path("FARES_NETWORK")?;
    let policy_path = required_path("FARES_POLICY")?;
    let addr = std::env::var("FARES_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = addr
        .parse()
        .map_err(|source| StartupError::Addr { addr, source })?;

    let network = TransitNetwork::load(&network_path)?;
    info!(
        routes = network.routes().len(),
        patterns = network.patterns().len(),
        "loaded network"
    );

    let policy = FarePolicy::load(&network, &policy_path)?;
    let policy_name = policy.policy_name().to_string();

    let app = create_router(AppState::new(policy));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, policy = %policy_name, "fare service listening");
    info!("GET  /health       - Health check");
    info!("GET  /fare/policy  - Configured fare policy");
    info!("POST /fare/quote   - Price a sequence of rides");

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
