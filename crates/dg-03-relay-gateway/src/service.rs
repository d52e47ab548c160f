//! Relay gateway service - binds the HTTP surface and owns the hub task.

use crate::api::{router, AppState};
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::hub::{Hub, HubHandle};
use axum::Router;
use dg_01_identity::{HttpDidResolver, IdentityVerifier};
use dg_02_certificate_issuer::{CertificateIssuer, LocalCa};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Relay gateway service state
pub struct RelayGatewayService {
    config: GatewayConfig,
    state: AppState,
    hub_task: JoinHandle<()>,
}

impl RelayGatewayService {
    /// Create the service and start its hub.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        config: GatewayConfig,
        verifier: IdentityVerifier,
        issuer: CertificateIssuer,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let (hub, hub_task) = Hub::spawn(config.hub.control_buffer);
        let state = AppState {
            verifier,
            issuer,
            hub,
            outbound_capacity: config.hub.outbound_capacity,
            banner: Arc::from(config.service.banner.as_str()),
        };

        Ok(Self {
            config,
            state,
            hub_task,
        })
    }

    /// Wire the HTTP resolver and the on-disk CA described by `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let resolver = HttpDidResolver::new(config.resolver.endpoint.clone(), config.resolver.timeout)
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        let ca = LocalCa::load(
            &config.ca.cert_path,
            &config.ca.key_path,
            &config.ca.config_path,
        )
        .map_err(|e| GatewayError::Config(e.to_string()))?;

        Self::new(
            config,
            IdentityVerifier::new(Arc::new(resolver)),
            CertificateIssuer::new(Arc::new(ca)),
        )
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Handle to the running hub
    pub fn hub(&self) -> HubHandle {
        self.state.hub.clone()
    }

    /// Build the router over this service's state.
    pub fn router(&self) -> Router {
        router(self.state.clone(), &self.config)
    }

    /// Bind the configured HTTP address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))
    }

    /// Serve on `listener` until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(addr = %addr, "Relay gateway listening");

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()));

        self.hub_task.abort();
        info!("Relay gateway stopped");
        result
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), GatewayError> {
        let listener = self.bind().await?;
        self.serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Received shutdown signal");
        })
        .await
    }
}
