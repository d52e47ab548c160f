//! # Enrollment Scenarios
//!
//! `POST /enroll` over a real listener, and the `enroll` command driving the
//! same endpoint.

use super::fixtures::{sign, TestServer, ALICE, BOB};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dg_cli::commands::enroll::{enroll, EnrollParams};

#[tokio::test]
async fn test_enroll_issues_certificate_for_did() {
    let server = TestServer::start().await;
    let cert_b64 = server.enroll(ALICE).await;

    let pem = STANDARD.decode(cert_b64).unwrap();
    assert!(String::from_utf8_lossy(&pem).starts_with("-----BEGIN CERTIFICATE-----"));

    let verified = server.issuer.verify_user_certificate(&pem).unwrap();
    assert_eq!(verified.common_name.as_deref(), Some(ALICE));
}

#[tokio::test]
async fn test_enroll_unsupported_method() {
    let server = TestServer::start().await;
    let body = serde_json::json!({
        "did": "did:other:abc123",
        "challenge": "xyz",
        "signature": sign(ALICE, "xyz"),
    });

    let (status, json) = server.post_enroll(body.to_string()).await;
    assert_eq!(status, 400);
    assert_eq!(json, serde_json::json!({"ok": false, "response": "failed to resolve DID"}));
}

#[tokio::test]
async fn test_enroll_signature_from_other_identity() {
    let server = TestServer::start().await;
    let mut signature = sign(BOB, "xyz");
    signature.creator.clear();
    let body = serde_json::json!({ "did": ALICE, "challenge": "xyz", "signature": signature });

    let (status, json) = server.post_enroll(body.to_string()).await;
    assert_eq!(status, 400);
    assert_eq!(json["response"], "invalid signature/challenge");
}

#[tokio::test]
async fn test_enroll_malformed_bodies() {
    let server = TestServer::start().await;

    let (status, json) = server.post_enroll(String::new()).await;
    assert_eq!((status, json["response"].as_str()), (400, Some("empty request")));

    let (status, json) = server.post_enroll("[1, 2, 3]".into()).await;
    assert_eq!((status, json["response"].as_str()), (400, Some("invalid request contents")));
}

#[tokio::test]
async fn test_enroll_command_saves_credential() {
    let server = TestServer::start().await;
    let signature = server.dir.path().join("signature.json");
    std::fs::write(&signature, serde_json::to_vec(&sign(ALICE, "xyz")).unwrap()).unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    let params = EnrollParams {
        did: ALICE.into(),
        challenge: "xyz".into(),
        signature,
        endpoint: server.http_url(),
        out_dir: out_dir.path().to_path_buf(),
    };
    let saved = enroll(&server.verifier, &params).await.unwrap();

    assert_eq!(saved.cert_path, out_dir.path().join("abc123.crt"));
    assert_eq!(saved.key_path, out_dir.path().join("abc123.pem"));
    let cert = std::fs::read(&saved.cert_path).unwrap();
    assert!(server.issuer.verify_user_certificate(&cert).is_ok());
}

#[tokio::test]
async fn test_enroll_command_rejects_bad_signature_locally() {
    let server = TestServer::start().await;
    let signature = server.dir.path().join("signature.json");
    std::fs::write(&signature, serde_json::to_vec(&sign(ALICE, "other")).unwrap()).unwrap();

    let params = EnrollParams {
        did: ALICE.into(),
        challenge: "xyz".into(),
        signature,
        endpoint: server.http_url(),
        out_dir: server.dir.path().to_path_buf(),
    };
    let err = enroll(&server.verifier, &params).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid signature/challenge");
}
