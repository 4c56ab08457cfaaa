use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use swarmshare_configuration::SchedulerPolicy;
use swarmshare_peer_core::scheduler::ChunkScheduler;
use swarmshare_primitives::{Rank, SwarmMembership};

fn membership(size: u32) -> SwarmMembership {
    let mut membership = SwarmMembership::default();
    for rank in 1..=size {
        if rank % 4 == 0 {
            membership.add_seed(Rank::new(rank));
        } else {
            membership.add_peer(Rank::new(rank));
        }
    }
    membership
}

fn policy() -> SchedulerPolicy {
    SchedulerPolicy {
        rng_seed: Some(7),
        ..SchedulerPolicy::default()
    }
}

fn select_and_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_and_record");

    for size in [8, 128, 4_096] {
        let membership = membership(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &membership, |b, membership| {
            let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
            let refused = BTreeSet::new();

            b.iter(|| {
                if let Some(source) = scheduler.select(membership, &refused) {
                    scheduler.record_acquisition(source);
                }
            });
        });
    }

    group.finish();
}

fn select_with_refusals(c: &mut Criterion) {
    let membership = membership(1_024);
    let refused: BTreeSet<Rank> = (2..1_000).map(Rank::new).collect();
    let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());

    c.bench_function("select_with_most_sources_refused", |b| {
        b.iter(|| black_box(scheduler.select(black_box(&membership), &refused)));
    });
}

criterion_group!(benches, select_and_record, select_with_refusals);
criterion_main!(benches);
