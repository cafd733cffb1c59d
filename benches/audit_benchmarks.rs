//! Performance benchmarks for the fiscal document auditor.
//!
//! Covers the per-document pipeline (extraction plus evaluation), batch
//! aggregation at several sizes and the HTTP endpoint.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use fiscal_audit::api::{AppState, create_router};
use fiscal_audit::batch::audit_batch;
use fiscal_audit::calculation::evaluate;
use fiscal_audit::config::{RateTable, RateTableLoader};
use fiscal_audit::extraction::extract;
use fiscal_audit::models::DocumentPayload;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const RATES_PATH: &str = "./data/aliquotas.json";

fn load_rates(rt: &tokio::runtime::Runtime) -> RateTable {
    rt.block_on(RateTableLoader::new().with_file(RATES_PATH).load())
        .expect("Failed to load rate table")
}

/// Creates an NF-e payload; every third document overdeclares PIS.
fn create_nfe(i: usize) -> DocumentPayload {
    let ufs = ["SP", "RJ", "MG", "PR", "BA", "RS"];
    let base = 1000 + (i % 50) * 10;
    let pis = if i % 3 == 0 {
        format!("{}.00", base / 40)
    } else {
        format!("{:.2}", base as f64 * 0.0165)
    };

    DocumentPayload::named(
        format!("nfe_{:04}.xml", i),
        format!(
            r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe>
                <ide><nNF>{i}</nNF><dhEmi>2025-08-15T10:00:00-03:00</dhEmi></ide>
                <emit><enderEmit><UF>{uf}</UF></enderEmit></emit>
                <total><ICMSTot><vProd>{base}.00</vProd><vPIS>{pis}</vPIS></ICMSTot></total>
            </infNFe></NFe></nfeProc>"#,
            uf = ufs[i % ufs.len()],
        ),
    )
}

/// Benchmark: extraction and evaluation of one document.
fn bench_single_document(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rates = load_rates(&rt);
    let payload = create_nfe(3);

    c.bench_function("single_document", |b| {
        b.iter(|| {
            let doc = extract(black_box(&payload.content)).unwrap();
            black_box(evaluate(&doc, &rates))
        })
    });
}

/// Benchmark: batch aggregation at increasing sizes.
fn bench_batch_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rates = load_rates(&rt);

    let mut group = c.benchmark_group("batch");

    for size in [10usize, 100, 1000] {
        let payloads: Vec<DocumentPayload> = (0..size).map(create_nfe).collect();

        group.throughput(Throughput::Elements(size as u64));
        if size >= 1000 {
            group.sample_size(10);
        }
        group.bench_with_input(BenchmarkId::new("documents", size), &payloads, |b, payloads| {
            b.iter(|| black_box(audit_batch(payloads, &rates)))
        });
    }

    group.finish();
}

/// Benchmark: POST /audit with 100 documents, including the per-request rate load.
fn bench_http_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(RateTableLoader::new().with_file(RATES_PATH)));

    let documents: Vec<DocumentPayload> = (0..100).map(create_nfe).collect();
    let body = serde_json::json!({ "documents": documents }).to_string();

    let mut group = c.benchmark_group("http");
    group.throughput(Throughput::Elements(100));

    group.bench_function("audit_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/audit")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_document,
    bench_batch_scaling,
    bench_http_batch_100,
);
criterion_main!(benches);
