use cems_chart::api::{ChartSeries, RenderOptions, build_chart_frame};
use cems_chart::core::{BufferPolicy, CanvasSurface, LinearScale, Sample, SampleBuffer};
use cems_chart::interaction::HoverLocator;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn wave(count: i64) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample::new(i * 5_000, 50.0 + ((i % 40) as f64 - 20.0).abs()))
        .collect()
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::new(0.0, 10_000.0, 60.0, 1_850.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.to_pixel(black_box(4_321.123));
            let _ = scale.to_domain(px).expect("from pixel");
        })
    });
}

fn bench_prune_10k(c: &mut Criterion) {
    let samples = wave(10_000);
    let now_ms = 10_000 * 5_000;

    c.bench_function("sample_buffer_prune_10k", |b| {
        b.iter(|| {
            let mut buffer = SampleBuffer::with_samples(BufferPolicy::default(), samples.clone());
            let _ = buffer.prune(black_box(now_ms), black_box(1_200_000), black_box(260));
        })
    });
}

fn bench_build_expanded_frame(c: &mut Criterion) {
    let samples = wave(2_000);
    let series = [ChartSeries::new("SO2", &samples)];
    let options = RenderOptions::expanded();
    let surface = CanvasSurface::new(1_200.0, 600.0, 2.0);

    c.bench_function("build_expanded_frame_2k", |b| {
        b.iter(|| {
            let _ = build_chart_frame(black_box(surface), black_box(&series), black_box(&options));
        })
    });
}

fn bench_hover_lookup_10k(c: &mut Criterion) {
    let samples = wave(10_000);

    c.bench_function("hover_nearest_10k", |b| {
        b.iter(|| {
            let _ = HoverLocator::nearest_to_time(black_box(&samples), black_box(24_998_100.0));
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_prune_10k,
    bench_build_expanded_frame,
    bench_hover_lookup_10k
);
criterion_main!(benches);
