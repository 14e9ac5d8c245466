use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bm_core::Image;
use bm_profile::{BeamOptions, BeamProfiler};

fn build_disc_frame(width: usize, height: usize, radius: f64) -> Image<f32> {
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let mut img = Image::new_fill(width, height, 0.0f32);
    let data = img.data_mut();
    let r2 = radius * radius;
    for y in 0..height {
        let dy = (y + 1) as f64 - cy;
        for x in 0..width {
            let dx = (x + 1) as f64 - cx;
            if dx * dx + dy * dy <= r2 {
                data[y * width + x] = 100.0;
            }
        }
    }
    img
}

fn bench_beam_parameters(c: &mut Criterion) {
    let mut profiler =
        BeamProfiler::new(build_disc_frame(1024, 1024, 180.0)).expect("valid frame");
    let opts = BeamOptions::default();

    c.bench_function("bm_profile_report_1024x1024", |b| {
        b.iter(|| {
            let report = profiler
                .beam_parameters(black_box(&opts))
                .expect("valid report");
            black_box(report.diameter);
        });
    });
}

criterion_group!(benches, bench_beam_parameters);
criterion_main!(benches);
