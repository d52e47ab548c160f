//! `didgate connect`: join the relay with a previously enrolled certificate.

use crate::session::CallerSession;
use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Timelike;
use clap::Args;
use dg_03_relay_gateway::CERTIFICATE_HEADER;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::info;

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Service address, `host:port`
    pub endpoint: Option<String>,

    /// Certificate to access the service
    #[arg(long, env = "SUSS_CONNECT_CERT")]
    pub cert: Option<PathBuf>,

    /// Alias for the session
    #[arg(long, env = "SUSS_CONNECT_ALIAS")]
    pub alias: Option<String>,

    /// Disable colored output
    #[arg(long, env = "SUSS_CONNECT_NO_COLOR")]
    pub no_color: bool,
}

pub async fn run(args: ConnectArgs) -> Result<()> {
    let endpoint = args
        .endpoint
        .filter(|e| !e.is_empty())
        .ok_or_else(|| anyhow!("you need to specify the service endpoint"))?;
    let cert_path = args
        .cert
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| anyhow!("you need to provide your user certificate"))?;

    let cert = std::fs::read(&cert_path)
        .with_context(|| format!("failed to read {}", cert_path.display()))?;

    let url = format!("ws://{endpoint}/connect");
    let mut request = url.as_str().into_client_request()?;
    request.headers_mut().insert(
        CERTIFICATE_HEADER,
        HeaderValue::from_str(&STANDARD.encode(cert))?,
    );

    let (socket, _) = connect_async(request)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    let alias = args.alias.unwrap_or_else(default_alias);
    info!(alias = %alias, url = %url, "Session established");

    let colors = !args.no_color && std::io::stdout().is_terminal();
    CallerSession::new(alias, colors)
        .run(socket, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}

/// Host name of this machine, or `user-<seconds>` when the OS cannot report one.
pub fn default_alias() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("user-{}", chrono::Local::now().second()))
}
