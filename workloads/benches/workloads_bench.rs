use arena_core::perf::scenarios::prepare_scenarios;
use arena_workloads::default_dispatcher;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_workload_scenarios(c: &mut Criterion) {
    let dispatcher = default_dispatcher().expect("build default dispatcher for benchmarking");
    let scenarios = prepare_scenarios(dispatcher.registry()).expect("prepare workload scenarios for benchmarking");
    let mut group = c.benchmark_group("workloads");
    group.sample_size(10);
    for scenario in scenarios {
        group.bench_function(scenario.bench_case_name(), |b| {
            b.iter(|| {
                let outcome = scenario
                    .run_with(&dispatcher)
                    .expect("workload failed for benchmarking scenario");
                black_box(outcome.value);
            });
        });
    }
    group.finish();
}

criterion_group!(workloads, bench_workload_scenarios);
criterion_main!(workloads);
