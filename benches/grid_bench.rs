//! Criterion benchmarks for the heatmap grid and tooltip placement

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use radquiz::services::activity_grid::{build_month_labels, build_weeks};
use radquiz::services::tooltip::{compute_position, TooltipOptions};
use radquiz::types::{ActivityDay, Placement, Rect};
use std::hint::black_box;

/// `len` consecutive days ending 2024-12-31, with a few idle days
fn sample_days(len: i64) -> Vec<ActivityDay> {
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");
    (0..len)
        .map(|i| ActivityDay::new(end - Duration::days(i), (i % 7) as u32 * 3))
        .collect()
}

fn bench_build_weeks(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");

    let mut group = c.benchmark_group("grid");
    for len in [30_i64, 365, 365 * 5] {
        let days = sample_days(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("build_weeks", len), &days, |b, days| {
            b.iter(|| build_weeks(black_box(days), today));
        });
    }

    let weeks = build_weeks(&sample_days(365), today);
    group.bench_function("build_month_labels", |b| {
        b.iter(|| build_month_labels(black_box(&weeks)));
    });

    group.finish();
}

fn bench_compute_position(c: &mut Criterion) {
    let tooltip = Rect::sized(100.0, 50.0);
    let container = Rect::new(0.0, 0.0, 500.0, 500.0);
    let default_options = TooltipOptions::default();
    let reversed = TooltipOptions::default().with_order([
        Placement::TopLeft,
        Placement::BottomLeft,
        Placement::TopRight,
        Placement::BottomRight,
    ]);

    let mut group = c.benchmark_group("tooltip");

    group.bench_function("first_fit", |b| {
        let anchor = Rect::new(10.0, 10.0, 20.0, 20.0);
        b.iter(|| compute_position(black_box(anchor), tooltip, container, &default_options));
    });

    group.bench_function("fallback_clamped", |b| {
        let narrow = Rect::new(0.0, 0.0, 60.0, 500.0);
        let anchor = Rect::new(10.0, 10.0, 20.0, 20.0);
        b.iter(|| compute_position(black_box(anchor), tooltip, narrow, &default_options));
    });

    group.bench_function("custom_order", |b| {
        let anchor = Rect::new(250.0, 250.0, 20.0, 20.0);
        b.iter(|| compute_position(black_box(anchor), tooltip, container, &reversed));
    });

    group.finish();
}

criterion_group!(benches, bench_build_weeks, bench_compute_position);
criterion_main!(benches);
