//! Full frame benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench frame
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench frame -- planar

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lustre::ShadowTechnique;
use lustre_bench::*;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn bench_frames(c: &mut Criterion) {
    for technique in [
        ShadowTechnique::None,
        ShadowTechnique::ShadowMap,
        ShadowTechnique::Planar,
    ] {
        let mut group = c.benchmark_group(format!("frame/{}", technique.name()));
        group.sample_size(10);
        let camera = showcase_camera(WIDTH, HEIGHT);
        let mut renderer = renderer(WIDTH, HEIGHT, technique);

        for (name, light) in lights() {
            let scene = showcase_scene(light);
            group.bench_with_input(BenchmarkId::from_parameter(name), &scene, |b, scene| {
                b.iter(|| renderer.render(scene, &camera));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
