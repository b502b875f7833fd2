// Criterion benchmarks for Recruiter Rater

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recruiter_rater::core::{bind, check};
use recruiter_rater::models::{GetReviewsParams, RatingAggregate, ReviewPayload};
use std::collections::HashMap;

fn reviews_query() -> HashMap<String, String> {
    HashMap::from([
        ("recruiterId".to_string(), "8b5d4a36-3f0e-4a8e-9b7c-2f1f3c7f9a10".to_string()),
        ("limit".to_string(), "25".to_string()),
        ("unused".to_string(), "ignored".to_string()),
    ])
}

fn bench_bind(c: &mut Criterion) {
    let query = reviews_query();

    c.bench_function("bind_reviews_params", |b| {
        b.iter(|| bind::<GetReviewsParams>(black_box(&query)))
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_review_payload");

    for len in [0usize, 100, 500, 501] {
        let payload = ReviewPayload {
            recruiter_id: "8b5d4a36-3f0e-4a8e-9b7c-2f1f3c7f9a10".to_string(),
            rating: Some(4),
            description: "x".repeat(len),
        };

        group.bench_with_input(BenchmarkId::from_parameter(len), &payload, |b, payload| {
            b.iter(|| check(black_box(payload)))
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    c.bench_function("fold_1000_scores", |b| {
        b.iter(|| {
            (0..1000).fold(RatingAggregate::default(), |agg, i| {
                agg.with_score(black_box(i % 6))
            })
        })
    });
}

criterion_group!(benches, bench_bind, bench_validate, bench_aggregate);
criterion_main!(benches);
