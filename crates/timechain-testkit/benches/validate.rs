use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use timechain_core::{ChainConfig, ChainValidator, HashMode, SignatureVerifier};
use timechain_testkit::{RsaTestAuthority, TestFixture};

fn payloads(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("transfer #{i}")).collect()
}

fn bench_unsigned(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_unsigned");
    for len in [10usize, 100, 1000] {
        let chain = TestFixture::new().chain_of(payloads(len));
        let validator = ChainValidator::default();
        group.bench_with_input(BenchmarkId::from_parameter(len), &chain, |b, chain| {
            b.iter(|| validator.validate(black_box(chain.as_slice())))
        });
    }
    group.finish();
}

fn bench_signed(c: &mut Criterion) {
    let authority = RsaTestAuthority::generate();
    let fixture =
        TestFixture::with_config(ChainConfig::default().hash_mode(HashMode::SignatureBound));
    let validator = ChainValidator::signed(
        fixture.config.hasher(),
        SignatureVerifier::new(authority.key().clone()),
    );

    let mut group = c.benchmark_group("validate_signed");
    for len in [10usize, 100] {
        let chain = fixture.signed_chain_of(&authority, payloads(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &chain, |b, chain| {
            b.iter(|| validator.validate(black_box(chain.as_slice())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unsigned, bench_signed);
criterion_main!(benches);
