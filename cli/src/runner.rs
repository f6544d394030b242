use anyhow::{Result, bail};
use arena_core::{DispatchError, Dispatcher, HostValue, perf::TimeStats};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::report::BenchMetrics;

/// Reject unknown names before any workload runs.
pub fn check_names(dispatcher: &Dispatcher, names: &[String]) -> Result<()> {
    let unknown: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !dispatcher.registry().contains(name))
        .collect();
    match unknown.as_slice() {
        [] => Ok(()),
        [one] => bail!("unknown benchmark '{one}' (see `arena list`)"),
        many => bail!("unknown benchmarks: {} (see `arena list`)", many.join(", ")),
    }
}

/// Time `iterations` calls of each benchmark after `warmup` untimed calls.
pub fn run_benchmarks(
    dispatcher: &Dispatcher,
    names: &[String],
    iterations: usize,
    warmup: usize,
) -> Result<Vec<BenchMetrics>> {
    check_names(dispatcher, names)?;
    let mut metrics = Vec::with_capacity(names.len());
    for name in names {
        for _ in 0..warmup {
            dispatcher.call(name)?;
        }
        let mut samples = Vec::with_capacity(iterations);
        let mut value = HostValue::Nil;
        for _ in 0..iterations {
            let start = Instant::now();
            value = dispatcher.call(name)?;
            samples.push(start.elapsed());
        }
        let stats = TimeStats::from_durations(&samples);
        info!(
            target: "arena_cli::run",
            benchmark = %name,
            mean_ns = stats.mean_ns,
            p95_ns = stats.p95_ns,
            "benchmark timed"
        );

        let entry = dispatcher.registry().get(name);
        metrics.push(BenchMetrics {
            benchmark: name.clone(),
            entry: entry.map_or_else(|| name.clone(), |e| e.name().to_string()),
            suite: entry.and_then(|e| e.suite()).map(str::to_string),
            value,
            stats,
        });
    }
    Ok(metrics)
}

/// One timed call, for the interactive shell and the worker.
pub fn timed_call(
    dispatcher: &Dispatcher,
    name: &str,
    args: &[HostValue],
) -> Result<(HostValue, Duration), DispatchError> {
    let start = Instant::now();
    let value = dispatcher.dispatch(name, args)?;
    let elapsed = start.elapsed();
    debug!(target: "arena_cli::run", name, elapsed_ns = elapsed.as_nanos() as u64, "timed call");
    Ok((value, elapsed))
}
