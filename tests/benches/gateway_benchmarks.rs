//! # didgate Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | dg-01 | ed25519 challenge verification |
//! | dg-02 | user certificate issuance and verification |
//! | dg-03 | hub fan-out to N sessions |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dg_01_identity::{verify_challenge, Did, DidDocument, Identity, PublicKeyEntry, SignatureLd};
use dg_02_certificate_issuer::{CaConfig, CertificateIssuer, CsrRequest, KeySpec, LocalCa};
use dg_03_relay_gateway::{Hub, SessionHandle, SessionId};
use ed25519_dalek::{Signer, SigningKey};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const DID: &str = "did:bryk:abc123";

fn bench_challenge_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("dg-01-identity");

    let signing = SigningKey::from_bytes(&[7u8; 32]);
    let key = PublicKeyEntry::ed25519(format!("{DID}#master"), DID, &signing.verifying_key());
    let signature = SignatureLd::ed25519(key.id.clone(), &signing.sign(b"xyz"));

    group.bench_function("verify_challenge", |b| {
        b.iter(|| black_box(verify_challenge(&key, b"xyz", &signature).is_ok()))
    });

    group.finish();
}

fn bench_certificate_issuance(c: &mut Criterion) {
    let mut group = c.benchmark_group("dg-02-certificate-issuer");
    group.measurement_time(Duration::from_secs(10));

    let root = LocalCa::generate_root(&CsrRequest {
        cn: "Bench Root".into(),
        hosts: Vec::new(),
        key: KeySpec::default(),
        names: Vec::new(),
        ca: None,
    })
    .unwrap();
    let ca = LocalCa::new(root.cert_pem(), root.key_pem(), CaConfig::default()).unwrap();
    let issuer = CertificateIssuer::new(Arc::new(ca));

    let identity = Identity::from_document(Did::parse(DID).unwrap(), DidDocument::new(DID)).unwrap();

    group.bench_function("issue_user_certificate", |b| {
        b.iter(|| black_box(issuer.issue_user_certificate(&identity).unwrap()))
    });

    let credential = issuer.issue_user_certificate(&identity).unwrap();
    group.bench_function("verify_user_certificate", |b| {
        b.iter(|| black_box(issuer.verify_user_certificate(credential.cert_pem().as_bytes()).is_ok()))
    });

    group.finish();
}

fn bench_hub_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("dg-03-hub");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    for sessions in [2usize, 16, 128] {
        let (hub, queues) = runtime.block_on(async {
            let (hub, _task) = Hub::spawn(1024);
            let mut queues = Vec::with_capacity(sessions);
            for i in 0..sessions {
                let (handle, rx) = SessionHandle::new(format!("peer-{i}"), 256);
                hub.register(handle).await.unwrap();
                queues.push(rx);
            }
            (hub, Arc::new(Mutex::new(queues)))
        });

        group.throughput(Throughput::Elements(sessions as u64));
        group.bench_with_input(BenchmarkId::new("broadcast", sessions), &sessions, |b, _| {
            b.to_async(&runtime).iter(|| {
                let hub = hub.clone();
                let queues = Arc::clone(&queues);
                async move {
                    hub.broadcast(SessionId::new(), "peer: payload".to_string())
                        .await
                        .unwrap();
                    for rx in queues.lock().await.iter_mut() {
                        black_box(rx.recv().await);
                    }
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_challenge_verification,
    bench_certificate_issuance,
    bench_hub_fanout
);
criterion_main!(benches);
