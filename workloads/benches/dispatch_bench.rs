use arena_core::{BenchRegistry, Dispatcher, HostValue};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn trivial_dispatcher() -> Dispatcher {
    let mut registry = BenchRegistry::new();
    registry
        .register("noop.plain", || Ok(HostValue::Nil))
        .expect("register noop workload");
    registry
        .register_alias("noop", "noop.plain")
        .expect("register noop alias");
    Dispatcher::new(registry)
}

fn bench_dispatch_overhead(c: &mut Criterion) {
    let dispatcher = trivial_dispatcher();

    c.bench_function("dispatch_direct", |b| {
        b.iter(|| black_box(dispatcher.call(black_box("noop.plain")).expect("dispatch noop")));
    });

    c.bench_function("dispatch_alias", |b| {
        b.iter(|| black_box(dispatcher.call(black_box("noop")).expect("dispatch noop alias")));
    });

    let args = [HostValue::Int(1), HostValue::Float(2.0)];
    c.bench_function("dispatch_ignored_args", |b| {
        b.iter(|| black_box(dispatcher.dispatch(black_box("noop"), &args).expect("dispatch noop with args")));
    });

    c.bench_function("dispatch_not_found", |b| {
        b.iter(|| black_box(dispatcher.call(black_box("missing")).is_err()));
    });
}

criterion_group!(dispatch, bench_dispatch_overhead);
criterion_main!(dispatch);
