use criterion::{black_box, criterion_group, criterion_main, Criterion};
use superscs_kernels::blas::gemm::gemm_cp;

fn bench_gemm_cp(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm_cp");
    for &size in &[16usize, 64, 128, 256] {
        let a = vec![0.37_f64; size * size];
        let b = vec![-0.21_f64; size * size];
        let mut out = vec![0.0_f64; size * size];
        group.bench_function(format!("{size}x{size}"), |bencher| {
            bencher.iter(|| {
                gemm_cp(size, size, size, 1.0, black_box(&a), 0.0, black_box(&b), &mut out);
                black_box(&out);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gemm_cp);
criterion_main!(benches);
