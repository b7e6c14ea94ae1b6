use criterion::{Criterion, criterion_group, criterion_main};
use lumel_atlas::{PackItem, pack};
use std::hint::black_box;

fn mixed_items(count: usize) -> Vec<PackItem> {
    // Deterministic pseudo-varied sizes without pulling in an RNG.
    (0..count)
        .map(|i| PackItem {
            width: 16 + (i * 37) % 96,
            height: 16 + (i * 53) % 96,
        })
        .collect()
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("atlas_pack");
    for count in [64usize, 512, 2048] {
        let items = mixed_items(count);
        group.bench_function(format!("shelf_{count}"), |b| {
            b.iter(|| pack(black_box(&items), 2048, 2).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack);
criterion_main!(benches);
