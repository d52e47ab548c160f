//! `didgate server`: run the enrollment and relay service.

use anyhow::{Context, Result};
use clap::Args;
use dg_03_relay_gateway::{GatewayConfig, RelayGatewayService};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct ServerArgs {
    /// TOML configuration file
    #[arg(long, env = "SUSS_SERVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listening port, overrides the configuration file
    #[arg(long, env = "SUSS_SERVER_PORT")]
    pub port: Option<u16>,
}

impl ServerArgs {
    /// Resolve the effective gateway configuration.
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => GatewayConfig::default(),
        };
        if let Some(port) = self.port {
            config.http.port = port;
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let config = args.gateway_config()?;
    let service = RelayGatewayService::from_config(config)?;
    let listener = service.bind().await?;
    let port = listener.local_addr()?.port();

    println!("server ready");
    println!("waiting for connections at port: {port}");

    service
        .serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Received shutdown signal");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("didgate.toml");
        std::fs::write(&path, "[http]\nport = 7000\n\n[timeouts]\nrequest = \"5s\"\n").unwrap();

        let args = ServerArgs {
            config: Some(path.clone()),
            port: None,
        };
        let config = args.gateway_config().unwrap();
        assert_eq!(config.http.port, 7000);
        assert_eq!(config.timeouts.request.as_secs(), 5);

        let args = ServerArgs {
            config: Some(path),
            port: Some(9191),
        };
        assert_eq!(args.gateway_config().unwrap().http.port, 9191);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ServerArgs { config: None, port: None }.gateway_config().unwrap();
        assert_eq!(config.http.port, dg_03_relay_gateway::DEFAULT_PORT);
    }
}
