//! # Charcoal Site CMS Runtime
//!
//! The main entry point for the CMS back end.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging and metrics)
//! 2. Load configuration from the environment
//! 3. Refuse an insecure media secret in production
//! 4. Open stores and initialize subsystems
//! 5. Start the API gateway
//! 6. Wait for Ctrl+C, then drain in-flight requests

use std::net::SocketAddr;

use anyhow::{Context, Result};
use cms_04_api_gateway::ApiGatewayService;
use cms_runtime::{CmsContainer, RuntimeConfig};
use cms_telemetry::TelemetryConfig;
use tracing::{info, warn};

/// The CMS runtime owning the container and the gateway.
struct CmsRuntime {
    container: CmsContainer,
    gateway: ApiGatewayService,
}

impl CmsRuntime {
    /// Build every subsystem and the gateway from configuration.
    fn new(config: RuntimeConfig) -> Result<Self> {
        info!("Creating Charcoal CMS runtime");

        let container =
            CmsContainer::new(&config).context("failed to initialize subsystems")?;
        let gateway = ApiGatewayService::new(config.gateway, container.rpc_handlers())
            .context("failed to create API gateway")?;

        Ok(Self { container, gateway })
    }

    /// Start serving requests.
    async fn start(&mut self) -> Result<SocketAddr> {
        info!("===========================================");
        info!("  Charcoal Site CMS v{}", cms_04_api_gateway::VERSION);
        info!("===========================================");

        if !self.container.is_persistent() {
            warn!("CMS_DATABASE_PATH is not set; content will be lost on restart");
        }

        let addr = self
            .gateway
            .start()
            .await
            .context("failed to start API gateway")?;
        info!(addr = %addr, "CMS is ready");
        Ok(addr)
    }

    /// Stop accepting requests and wait for in-flight ones.
    async fn shutdown(&mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");
        self.gateway
            .shutdown()
            .await
            .context("API gateway did not shut down cleanly")?;
        info!("Shutdown complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    cms_telemetry::init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("invalid configuration")?;
    if let Err(e) = config.validate_for_production() {
        if telemetry.environment == "production" {
            return Err(e).context("refusing to start in production");
        }
        warn!("{}", e);
    }

    let mut runtime = CmsRuntime::new(config)?;
    runtime.start().await?;

    info!("CMS is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    runtime.shutdown().await
}
