use std::hint::black_box;
use std::time::{Duration, UNIX_EPOCH};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tokenseal::{Role, SymmetricKey, TokenCodec, generate_cursor, parse_cursor};

const USER: &str = "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01";
const ORG: &str = "7d2c3b4a-1e0f-4a9b-8c7d-6e5f4a3b2c1d";

fn bench_token_issue(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_issue");

    for len in [16, 24, 32] {
        let codec = TokenCodec::new(SymmetricKey::generate(len).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(len * 8), &codec, |b, codec| {
            b.iter(|| {
                codec
                    .issue(black_box(USER), black_box(ORG), Role::Publisher)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_token_validate(c: &mut Criterion) {
    let codec = TokenCodec::new(SymmetricKey::generate(32).unwrap());
    let issued = codec.issue(USER, ORG, Role::Publisher).unwrap();

    c.bench_function("token_validate", |b| {
        b.iter(|| codec.validate(black_box(&issued.token)).unwrap())
    });
}

fn bench_token_reject_forged(c: &mut Criterion) {
    let codec = TokenCodec::new(SymmetricKey::generate(32).unwrap());
    let forged = TokenCodec::new(SymmetricKey::generate(32).unwrap())
        .issue(USER, ORG, Role::SysAdmin)
        .unwrap();

    c.bench_function("token_reject_forged", |b| {
        b.iter(|| codec.validate(black_box(&forged.token)).is_err())
    });
}

fn bench_cursor_roundtrip(c: &mut Criterion) {
    let ts = UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789);

    c.bench_function("cursor_generate", |b| {
        b.iter(|| generate_cursor(black_box(Some(ts)), black_box(USER)).unwrap())
    });

    let token = generate_cursor(Some(ts), USER).unwrap();
    c.bench_function("cursor_parse", |b| {
        b.iter(|| parse_cursor(black_box(&token)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_token_issue,
    bench_token_validate,
    bench_token_reject_forged,
    bench_cursor_roundtrip
);
criterion_main!(benches);
