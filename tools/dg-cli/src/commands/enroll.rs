//! `didgate enroll`: obtain a user certificate for a DID.

use super::write_read_only;
use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;
use dg_01_identity::{HttpDidResolver, IdentityVerifier, SignatureLd, DEFAULT_RESOLVER_ENDPOINT};
use dg_03_relay_gateway::{EnrollmentRequest, EnrollmentResponse, ServiceResponse};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// DID to enroll with the service
    #[arg(long, env = "SUSS_ENROLL_DID")]
    pub did: Option<String>,

    /// Challenge value used for authentication during enrollment
    #[arg(long, env = "SUSS_ENROLL_CHALLENGE")]
    pub challenge: Option<String>,

    /// Signature produced for authentication (JSON file)
    #[arg(long, env = "SUSS_ENROLL_SIGNATURE")]
    pub signature: Option<PathBuf>,

    /// Service endpoint to send the enrollment request to
    #[arg(long, env = "SUSS_ENROLL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// DID resolution endpoint
    #[arg(long, env = "SUSS_ENROLL_RESOLVER", default_value = DEFAULT_RESOLVER_ENDPOINT)]
    pub resolver: String,

    /// Directory receiving `<subject>.crt` and `<subject>.pem`
    #[arg(long, env = "SUSS_ENROLL_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Validated enrollment parameters.
#[derive(Debug, Clone)]
pub struct EnrollParams {
    pub did: String,
    pub challenge: String,
    pub signature: PathBuf,
    pub endpoint: String,
    pub out_dir: PathBuf,
}

/// Files written by a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCredential {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl EnrollArgs {
    pub fn validate(&self) -> Result<EnrollParams> {
        let did = non_empty(&self.did).ok_or_else(|| anyhow!("DID value is required"))?;
        let challenge =
            non_empty(&self.challenge).ok_or_else(|| anyhow!("a challenge value is required"))?;
        let signature = self
            .signature
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| anyhow!("a signature file is required"))?;
        let endpoint = non_empty(&self.endpoint)
            .ok_or_else(|| anyhow!("you need to specify the service endpoint to use"))?;

        Ok(EnrollParams {
            did,
            challenge,
            signature,
            endpoint,
            out_dir: self.out_dir.clone(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

pub async fn run(args: EnrollArgs) -> Result<SavedCredential> {
    info!("Validating parameters");
    let params = args.validate()?;

    let resolver = HttpDidResolver::new(args.resolver, Duration::from_secs(10))?;
    enroll(&IdentityVerifier::new(Arc::new(resolver)), &params).await
}

/// Resolve, verify locally, submit, and store the issued credential.
pub async fn enroll(verifier: &IdentityVerifier, params: &EnrollParams) -> Result<SavedCredential> {
    info!(did = %params.did, "Retrieving DID");
    let identity = verifier.resolve(&params.did).await?;

    info!(path = %params.signature.display(), "Loading challenge signature");
    let raw = std::fs::read(&params.signature)
        .with_context(|| format!("failed to read {}", params.signature.display()))?;
    let signature: SignatureLd =
        serde_json::from_slice(&raw).context("invalid signature file")?;

    info!("Verifying challenge signature");
    verifier.verify(&identity, &params.challenge, &signature)?;

    info!(endpoint = %params.endpoint, "Submitting enrollment request");
    let request = EnrollmentRequest {
        did: identity.to_string(),
        challenge: params.challenge.clone(),
        signature,
    };
    let body = serde_json::to_string_pretty(&request)?;
    println!("{body}");

    let response = reqwest::Client::new()
        .post(format!("{}/enroll", params.endpoint.trim_end_matches('/')))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .context("enrollment request failed")?;

    info!(status = %response.status(), "Inspecting service response");
    let envelope: ServiceResponse<serde_json::Value> = response
        .json()
        .await
        .context("invalid service response")?;
    if !envelope.ok {
        bail!(
            "{}",
            envelope.response.as_str().unwrap_or("enrollment rejected")
        );
    }

    let issued: EnrollmentResponse =
        serde_json::from_value(envelope.response).context("invalid service response")?;
    let cert = STANDARD.decode(issued.cert).context("invalid certificate encoding")?;
    let key = STANDARD.decode(issued.key).context("invalid key encoding")?;

    info!("Saving obtained certificate");
    let saved = SavedCredential {
        cert_path: params.out_dir.join(format!("{}.crt", identity.subject())),
        key_path: params.out_dir.join(format!("{}.pem", identity.subject())),
    };
    write_read_only(&saved.cert_path, &cert)?;
    write_read_only(&saved.key_path, &key)?;

    info!(cert = %saved.cert_path.display(), "Certificate saved successfully");
    Ok(saved)
}
