use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use swarmshare_primitives::{ChunkId, FileDescriptor, Rank, HASH_SIZE};
use swarmshare_tracker_core::swarm::registry::SwarmRegistry;

fn sample_files(count: usize) -> Vec<FileDescriptor> {
    (0..count)
        .map(|index| {
            let chunks = (0..32u8).map(|fill| ChunkId::from_bytes([fill; HASH_SIZE])).collect();
            FileDescriptor::new(format!("file{index}"), chunks).expect("it should be a valid file name")
        })
        .collect()
}

fn register_owned(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_owned");

    for count in [10, 100, 1_000] {
        let files = sample_files(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &files, |b, files| {
            b.iter(|| {
                let mut registry = SwarmRegistry::default();
                for (index, file) in files.iter().enumerate() {
                    let rank = Rank::new(u32::try_from(index % 16).unwrap_or_default() + 1);
                    registry.register_owned(file.clone(), rank);
                }
                black_box(registry)
            });
        });
    }

    group.finish();
}

fn serve_swarm_requests(c: &mut Criterion) {
    let mut registry = SwarmRegistry::default();
    for file in sample_files(100) {
        registry.register_owned(file, Rank::new(1));
    }

    c.bench_function("lookup_and_mark_peer", |b| {
        b.iter(|| {
            let swarm = registry.lookup(black_box("file42")).cloned();
            registry.mark_peer("file42", Rank::new(2));
            black_box(swarm)
        });
    });

    c.bench_function("membership", |b| {
        b.iter(|| black_box(registry.membership(black_box("file42"))));
    });
}

criterion_group!(benches, register_owned, serve_swarm_requests);
criterion_main!(benches);
