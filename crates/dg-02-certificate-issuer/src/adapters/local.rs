//! # Local Certificate Authority
//!
//! A single-root CA held in memory. Signing is done with `rcgen`; verification
//! uses the `rustls` webpki client verifier, which checks the chain to the
//! root, the validity window and the client-auth usage.

use crate::domain::certificate::decode_certificate;
use crate::domain::credential::Credential;
use crate::domain::csr::{CsrRequest, KeySpec};
use crate::domain::errors::CaError;
use crate::domain::profile::{CaConfig, SigningProfile, Usage};
use crate::ports::outbound::CertificateAuthority;
use rcgen::Ia5String;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyPair, KeyUsagePurpose, SanType, SignatureAlgorithm,
    PKCS_ECDSA_P256_SHA256, PKCS_ECDSA_P384_SHA384, PKCS_ED25519,
};
use rustls::pki_types::{CertificateDer, UnixTime};
use rustls::server::danger::ClientCertVerifier;
use rustls::server::WebPkiClientVerifier;
use rustls::RootCertStore;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Default lifetime of a generated root.
const DEFAULT_ROOT_EXPIRY: Duration = Duration::from_secs(5 * 365 * 24 * 3600);

/// Issued certificates are valid from slightly before signing to absorb
/// clock skew between hosts.
const BACKDATE: time::Duration = time::Duration::minutes(5);

const OID_STREET_ADDRESS: [u64; 4] = [2, 5, 4, 9];
const OID_POSTAL_CODE: [u64; 4] = [2, 5, 4, 17];

/// Certificate authority backed by a root certificate and key in memory.
pub struct LocalCa {
    issuer: Certificate,
    issuer_key: KeyPair,
    root_pem: String,
    config: CaConfig,
    verifier: Arc<dyn ClientCertVerifier>,
}

impl LocalCa {
    /// Build a CA from PEM root material and a signing configuration.
    pub fn new(cert_pem: &str, key_pem: &str, config: CaConfig) -> Result<Self, CaError> {
        config.validate()?;

        let root_der = decode_certificate(cert_pem.as_bytes())
            .map_err(|e| CaError::InvalidRoot(e.to_string()))?;
        let issuer_key =
            KeyPair::from_pem(key_pem).map_err(|e| CaError::InvalidRoot(format!("key: {e}")))?;
        let issuer = CertificateParams::from_ca_cert_pem(cert_pem)
            .and_then(|params| params.self_signed(&issuer_key))
            .map_err(|e| CaError::InvalidRoot(format!("certificate: {e}")))?;

        let mut roots = RootCertStore::empty();
        roots
            .add(CertificateDer::from(root_der))
            .map_err(|e| CaError::InvalidRoot(format!("trust anchor: {e}")))?;
        let verifier = WebPkiClientVerifier::builder_with_provider(
            Arc::new(roots),
            Arc::new(rustls::crypto::ring::default_provider()),
        )
        .build()
        .map_err(|e| CaError::InvalidRoot(format!("verifier: {e}")))?;

        Ok(Self {
            issuer,
            issuer_key,
            root_pem: cert_pem.to_string(),
            config,
            verifier,
        })
    }

    /// Load `root-ca.crt`, `root-ca.pem` and `ca_conf.json` style files.
    pub fn load(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        config_path: impl AsRef<Path>,
    ) -> Result<Self, CaError> {
        let config = CaConfig::from_json(read_file(config_path.as_ref())?.as_bytes())?;
        let cert_pem = read_file(cert_path.as_ref())?;
        let key_pem = read_file(key_path.as_ref())?;

        let ca = Self::new(&cert_pem, &key_pem, config)?;
        info!(path = %cert_path.as_ref().display(), "Loaded certificate authority");
        Ok(ca)
    }

    /// Create a new self-signed root from `request`.
    ///
    /// The root is valid for `request.ca.expiry`, or five years when the
    /// request carries no CA section.
    pub fn generate_root(request: &CsrRequest) -> Result<Credential, CaError> {
        let key_pair = generate_key(&request.key)?;
        let expiry = request
            .ca
            .as_ref()
            .map(|ca| ca.expiry)
            .unwrap_or(DEFAULT_ROOT_EXPIRY);

        let mut params = base_params(request, expiry)?;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];

        let cert = params
            .self_signed(&key_pair)
            .map_err(|e| CaError::Signing(e.to_string()))?;

        info!(cn = %request.cn, "Generated root certificate");
        Ok(Credential::new(cert.pem(), key_pair.serialize_pem()))
    }

    /// Root certificate in PEM form.
    pub fn root_pem(&self) -> &str {
        &self.root_pem
    }

    pub fn config(&self) -> &CaConfig {
        &self.config
    }
}

impl CertificateAuthority for LocalCa {
    fn sign(&self, request: &CsrRequest, profile: &str) -> Result<Credential, CaError> {
        let profile_config = self.config.profile(profile)?;
        let key_pair = generate_key(&request.key)?;

        let mut params = base_params(request, profile_config.expiry)?;
        params.is_ca = IsCa::ExplicitNoCa;
        params.use_authority_key_identifier_extension = true;
        apply_usages(&mut params, profile_config);

        let cert = params
            .signed_by(&key_pair, &self.issuer, &self.issuer_key)
            .map_err(|e| CaError::Signing(e.to_string()))?;

        debug!(cn = %request.cn, profile, "Signed certificate");
        Ok(Credential::new(cert.pem(), key_pair.serialize_pem()))
    }

    fn verify(&self, cert_der: &[u8], profile: &str) -> Result<(), CaError> {
        let profile_config = self.config.profile(profile)?;
        if !profile_config.allows(Usage::ClientAuth) {
            return Err(CaError::Verification(format!(
                "profile '{profile}' does not permit client authentication"
            )));
        }

        self.verifier
            .verify_client_cert(&CertificateDer::from(cert_der), &[], UnixTime::now())
            .map(|_| ())
            .map_err(|e| CaError::Verification(e.to_string()))
    }
}

impl fmt::Debug for LocalCa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCa")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn read_file(path: &Path) -> Result<String, CaError> {
    std::fs::read_to_string(path).map_err(|e| CaError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn key_algorithm(spec: &KeySpec) -> Result<&'static SignatureAlgorithm, CaError> {
    match (spec.algo.as_str(), spec.size) {
        ("ecdsa", 0 | 256) => Ok(&PKCS_ECDSA_P256_SHA256),
        // P-521 keys are served by P-384, the largest curve the ring backend signs with.
        ("ecdsa", 384 | 521) => Ok(&PKCS_ECDSA_P384_SHA384),
        ("ed25519", _) => Ok(&PKCS_ED25519),
        (algo, size) => Err(CaError::InvalidRequest(format!(
            "unsupported key algorithm {algo}/{size}"
        ))),
    }
}

fn generate_key(spec: &KeySpec) -> Result<KeyPair, CaError> {
    KeyPair::generate_for(key_algorithm(spec)?).map_err(|e| CaError::Signing(e.to_string()))
}

fn base_params(request: &CsrRequest, expiry: Duration) -> Result<CertificateParams, CaError> {
    if request.cn.trim().is_empty() {
        return Err(CaError::InvalidRequest("common name is required".into()));
    }

    let now = OffsetDateTime::now_utc();
    let mut params = CertificateParams::default();
    params.not_before = now - BACKDATE;
    params.not_after = now + expiry;
    params.distinguished_name = distinguished_name(request);
    params.subject_alt_names = request
        .hosts
        .iter()
        .map(String::as_str)
        .map(subject_alt_name)
        .collect::<Result<_, _>>()?;
    Ok(params)
}

fn distinguished_name(request: &CsrRequest) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    for name in &request.names {
        let entries = [
            (DnType::CountryName, &name.c),
            (DnType::StateOrProvinceName, &name.st),
            (DnType::LocalityName, &name.l),
            (DnType::OrganizationName, &name.o),
            (DnType::OrganizationalUnitName, &name.ou),
            (DnType::CustomDnType(OID_STREET_ADDRESS.to_vec()), &name.sa),
            (DnType::CustomDnType(OID_POSTAL_CODE.to_vec()), &name.pc),
        ];
        for (kind, value) in entries {
            if !value.is_empty() {
                dn.push(kind, value.as_str());
            }
        }
    }
    dn.push(DnType::CommonName, request.cn.as_str());
    dn
}

/// IP literals become IP SANs, values containing `:` (such as DIDs) become
/// URI SANs, everything else is a DNS name.
fn subject_alt_name(host: &str) -> Result<SanType, CaError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SanType::IpAddress(ip));
    }

    let value = Ia5String::try_from(host.to_string())
        .map_err(|e| CaError::InvalidRequest(format!("invalid host {host:?}: {e}")))?;
    if host.contains(':') {
        Ok(SanType::URI(value))
    } else {
        Ok(SanType::DnsName(value))
    }
}

fn apply_usages(params: &mut CertificateParams, profile: &SigningProfile) {
    for usage in &profile.usages {
        match usage {
            Usage::Signing => params.key_usages.push(KeyUsagePurpose::DigitalSignature),
            Usage::KeyEncipherment => params.key_usages.push(KeyUsagePurpose::KeyEncipherment),
            Usage::CertSign => params.key_usages.push(KeyUsagePurpose::KeyCertSign),
            Usage::CrlSign => params.key_usages.push(KeyUsagePurpose::CrlSign),
            Usage::ClientAuth => params
                .extended_key_usages
                .push(ExtendedKeyUsagePurpose::ClientAuth),
            Usage::ServerAuth => params
                .extended_key_usages
                .push(ExtendedKeyUsagePurpose::ServerAuth),
        }
    }
}
