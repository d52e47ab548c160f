//! Running gateway with in-memory DID documents and on-disk CA material.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dg_01_identity::{DidDocument, IdentityVerifier, MemoryDidResolver, PublicKeyEntry, SignatureLd};
use dg_02_certificate_issuer::{CaConfig, CertificateIssuer, CsrRequest, KeySpec, LocalCa};
use dg_03_relay_gateway::{GatewayConfig, HubHandle, RelayGatewayService, CERTIFICATE_HEADER};
use ed25519_dalek::{Signer, SigningKey};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const ALICE: &str = "did:bryk:abc123";
pub const BOB: &str = "did:bryk:bob456";

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Deterministic master key for a test DID.
pub fn master_key(did: &str) -> SigningKey {
    let seed = if did == BOB { 0xb0 } else { 0xa1 };
    SigningKey::from_bytes(&[seed; 32])
}

pub fn sign(did: &str, challenge: &str) -> SignatureLd {
    SignatureLd::ed25519(format!("{did}#master"), &master_key(did).sign(challenge.as_bytes()))
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: HubHandle,
    pub issuer: CertificateIssuer,
    pub verifier: IdentityVerifier,
    pub root_pem: String,
    pub dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with the default test config adjusted by `configure`.
    pub async fn start_with(configure: impl FnOnce(&mut GatewayConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let root = LocalCa::generate_root(&CsrRequest {
            cn: "didgate E2E Root".into(),
            hosts: Vec::new(),
            key: KeySpec::default(),
            names: Vec::new(),
            ca: None,
        })
        .unwrap();
        let (cert_path, key_path, conf_path) = (
            dir.path().join("root-ca.crt"),
            dir.path().join("root-ca.pem"),
            dir.path().join("ca_conf.json"),
        );
        std::fs::write(&cert_path, root.cert_pem()).unwrap();
        std::fs::write(&key_path, root.key_pem()).unwrap();
        std::fs::write(&conf_path, CaConfig::default().to_json_pretty().unwrap()).unwrap();
        let ca = LocalCa::load(&cert_path, &key_path, &conf_path).unwrap();

        let resolver = MemoryDidResolver::new();
        for did in [ALICE, BOB] {
            resolver.insert(DidDocument::new(did).with_key(PublicKeyEntry::ed25519(
                format!("{did}#master"),
                did,
                &master_key(did).verifying_key(),
            )));
        }

        let mut config = GatewayConfig::default();
        config.http.host = "127.0.0.1".parse().unwrap();
        config.http.port = 0;
        configure(&mut config);

        let verifier = IdentityVerifier::new(Arc::new(resolver));
        let issuer = CertificateIssuer::new(Arc::new(ca));
        let service = RelayGatewayService::new(config, verifier.clone(), issuer.clone()).unwrap();
        let hub = service.hub();
        let listener = service.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(service.serve_with_shutdown(listener, async {
            let _ = signal.await;
        }));

        Self {
            addr,
            hub,
            issuer,
            verifier,
            root_pem: root.cert_pem().to_string(),
            dir,
            shutdown: Some(shutdown),
        }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST a raw body to `/enroll`.
    pub async fn post_enroll(&self, body: String) -> (u16, serde_json::Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/enroll", self.http_url()))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Enroll `did` and return the base64 certificate from the response.
    pub async fn enroll(&self, did: &str) -> String {
        let body = serde_json::json!({
            "did": did,
            "challenge": "xyz",
            "signature": sign(did, "xyz"),
        });
        let (status, json) = self.post_enroll(body.to_string()).await;
        assert_eq!(status, 200, "enrollment failed: {json}");
        json["response"]["cert"].as_str().unwrap().to_string()
    }

    /// Open `/connect` presenting `certificate` (base64), if any.
    pub async fn dial(
        &self,
        certificate: Option<&str>,
    ) -> Result<Socket, tokio_tungstenite::tungstenite::Error> {
        let mut request = format!("ws://{}/connect", self.addr).into_client_request()?;
        if let Some(cert) = certificate {
            request
                .headers_mut()
                .insert(CERTIFICATE_HEADER, HeaderValue::from_str(cert).unwrap());
        }
        connect_async(request).await.map(|(socket, _)| socket)
    }

    /// Enroll and connect in one step.
    pub async fn join(&self, did: &str) -> Socket {
        let cert = self.enroll(did).await;
        self.dial(Some(&cert)).await.unwrap()
    }

    /// Wait until the hub reports `expected` sessions.
    pub async fn wait_for_sessions(&self, expected: usize) {
        for _ in 0..100 {
            if self.hub.stats().await.unwrap().sessions == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("hub never reached {expected} sessions");
    }

    pub fn root_certificate_b64(&self) -> String {
        STANDARD.encode(&self.root_pem)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
