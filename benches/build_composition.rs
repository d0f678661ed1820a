//! Benchmarks for composition building
//!
//! Measures planning, full builds and debug harvesting for edits of
//! increasing length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crossfader_common::{MediaTime, TimeRange};
use crossfader_composition::{
    ClipInfo, CompositionDebugInfo, TransitionCompositionBuilder,
};

/// `count` clips of 4 to 9 seconds, each fully selected
fn edit(count: usize) -> (Vec<ClipInfo>, Vec<TimeRange>) {
    let clips: Vec<ClipInfo> = (0..count)
        .map(|i| ClipInfo::new(format!("clip{i}.mov"), MediaTime::from_secs(4 + (i % 6) as i64)))
        .collect();
    let ranges = clips
        .iter()
        .map(|clip| TimeRange::new(MediaTime::ZERO, clip.duration))
        .collect();
    (clips, ranges)
}

fn builder() -> TransitionCompositionBuilder {
    TransitionCompositionBuilder::new().transition_duration(MediaTime::from_secs(2))
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    let builder = builder();

    for count in [2, 10, 100] {
        let (clips, ranges) = edit(count);
        group.bench_with_input(
            BenchmarkId::new("clips", count),
            &(&clips, &ranges),
            |b, (clips, ranges)| {
                b.iter(|| builder.plan(black_box(clips.as_slice()), black_box(ranges.as_slice())));
            },
        );
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let builder = builder();

    for count in [2, 10, 100] {
        let (clips, ranges) = edit(count);
        group.bench_with_input(
            BenchmarkId::new("clips", count),
            &(&clips, &ranges),
            |b, (clips, ranges)| {
                b.iter(|| builder.build(black_box(clips.as_slice()), black_box(ranges.as_slice())));
            },
        );
    }

    group.finish();
}

fn bench_debug_info(c: &mut Criterion) {
    let mut group = c.benchmark_group("debug_info");

    for count in [2, 10, 100] {
        let (clips, ranges) = edit(count);
        let Ok(built) = builder().build(&clips, &ranges) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("clips", count), &built, |b, built| {
            b.iter(|| CompositionDebugInfo::from_composition(black_box(built)).render_text());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_build, bench_debug_info);
criterion_main!(benches);
