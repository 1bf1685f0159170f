use criterion::{Criterion, criterion_group, criterion_main};
use indexmap::IndexMap;
use iterplot::core::{LinearScale, PixelRange};
use iterplot::plot::IterationStatisticsPlotter;
use iterplot::render::NullRenderer;
use iterplot::stats::{IterationSample, IterationStatistics};
use iterplot::PlotConfig;
use std::hint::black_box;

fn long_run(records: u32) -> IterationStatistics {
    let mut stats = IterationStatistics::new(Some("bench run".to_owned()))
        .with_categories(["PRE", "STM", "SUF", "ZZZ"])
        .with_word_tokens(250_000.0);
    for index in 0..records {
        let step = f64::from(index);
        let cost = 1_000_000.0 / (1.0 + step * 0.01);
        stats
            .record(IterationSample {
                epoch: index / 300,
                operation: (index / 100) % 3,
                iteration: index % 100,
                cost,
                cost_parts: IndexMap::from([
                    ("lexicon".to_owned(), cost * 0.3),
                    ("corpus".to_owned(), cost * 0.7),
                ]),
                tag_counts: vec![1_000.0 + step, 20_000.0 - step, 4_000.0, 300.0],
                morph_types: 30_000 - u64::from(index),
                morph_tokens: 600_000 + u64::from(index) * 3,
                duration_secs: 1.5 + (step * 0.1).sin().abs(),
                average_morph_length: 5.0 - step * 0.0001,
                changes: u64::from(index % 50),
                changes_op: u64::from(index % 7),
                ..IterationSample::default()
            })
            .expect("valid generated sample");
    }
    stats
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let range = PixelRange::new(1_080.0, 0.0);
    let scale = LinearScale::new(0.0, 10_000.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale
                .domain_to_pixel(black_box(4_321.123), range)
                .expect("to pixel");
            let _ = scale.pixel_to_domain(px, range).expect("from pixel");
        })
    });
}

fn bench_stacked_surface_3k(c: &mut Criterion) {
    let plotter = IterationStatisticsPlotter::new(long_run(3_000), PlotConfig::default());

    c.bench_function("stacked_surface_3k", |b| {
        b.iter(|| {
            let mut renderer = NullRenderer::default();
            plotter
                .render_with(black_box("stacked"), &mut renderer)
                .expect("stacked surface")
        })
    });
}

fn bench_statistics_json_3k(c: &mut Criterion) {
    let stats = long_run(3_000);
    let json = stats.to_json_contract_v1_pretty().expect("serialize");

    c.bench_function("statistics_json_decode_3k", |b| {
        b.iter(|| {
            IterationStatistics::from_json_compat_slice(black_box(json.as_bytes()))
                .expect("decode")
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_stacked_surface_3k,
    bench_statistics_json_3k
);
criterion_main!(benches);
