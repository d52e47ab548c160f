//! `didgate root-ca` and `didgate user-cert`: local CA tooling.

use super::write_read_only;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use dg_02_certificate_issuer::{
    CaConfig, CertificateAuthority, Credential, CsrRequest, LocalCa, USER_PROFILE,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct RootCaArgs {
    /// CSR JSON file describing the root
    pub csr: Option<PathBuf>,

    /// Directory receiving `root-ca.crt` and `root-ca.pem`
    #[arg(long, env = "SUSS_ROOT_CA_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct UserCertArgs {
    /// CSR JSON file to sign
    pub csr: Option<PathBuf>,

    /// Root certificate
    #[arg(long, env = "SUSS_CA_CERT", default_value = "root-ca.crt")]
    pub ca_cert: PathBuf,

    /// Root private key
    #[arg(long, env = "SUSS_CA_KEY", default_value = "root-ca.pem")]
    pub ca_key: PathBuf,

    /// CA signing configuration
    #[arg(long, env = "SUSS_CA_CONFIG", default_value = "ca_conf.json")]
    pub ca_config: PathBuf,

    /// Directory receiving `user.crt` and `user.pem`
    #[arg(long, env = "SUSS_USER_CERT_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn root_ca(args: RootCaArgs) -> Result<()> {
    let csr = load_csr(args.csr.as_deref())?;
    let credential = LocalCa::generate_root(&csr)?;

    save(&credential, &args.out_dir, "root-ca")?;
    println!("root-ca created");
    Ok(())
}

pub fn user_cert(args: UserCertArgs) -> Result<()> {
    let csr = load_csr(args.csr.as_deref())?;
    let ca = open_ca(&args.ca_cert, &args.ca_key, &args.ca_config)?;
    let credential = ca.sign(&csr, USER_PROFILE)?;

    save(&credential, &args.out_dir, "user")?;
    println!("user certificate created");
    Ok(())
}

fn load_csr(path: Option<&Path>) -> Result<CsrRequest> {
    let path = path.ok_or_else(|| anyhow!("you need to provide the CSR json file"))?;
    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    CsrRequest::from_json(&raw).with_context(|| format!("invalid CSR in {}", path.display()))
}

fn open_ca(cert: &Path, key: &Path, config: &Path) -> Result<LocalCa> {
    let raw = std::fs::read(config).map_err(|_| {
        anyhow!(
            "failed to read CA configuration file '{}'",
            config.display()
        )
    })?;
    let config = CaConfig::from_json(&raw)?;

    let cert_pem = std::fs::read_to_string(cert)
        .with_context(|| format!("failed to read {}", cert.display()))?;
    let key_pem = std::fs::read_to_string(key)
        .with_context(|| format!("failed to read {}", key.display()))?;

    Ok(LocalCa::new(&cert_pem, &key_pem, config)?)
}

fn save(credential: &Credential, dir: &Path, stem: &str) -> Result<()> {
    let cert_path = dir.join(format!("{stem}.crt"));
    write_read_only(&cert_path, credential.cert_pem().as_bytes())?;
    write_read_only(&dir.join(format!("{stem}.pem")), credential.key_pem().as_bytes())?;

    info!(path = %cert_path.display(), "Certificate written");
    Ok(())
}
