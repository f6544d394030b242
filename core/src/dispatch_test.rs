#[cfg(test)]
mod tests {
    use crate::dispatch::Dispatcher;
    use crate::error::DispatchError;
    use crate::registry::BenchRegistry;
    use crate::val::HostValue;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_registry(names: &[&str]) -> (BenchRegistry, Vec<Arc<AtomicUsize>>) {
        let mut registry = BenchRegistry::new();
        let mut counters = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            let counter = Arc::new(AtomicUsize::new(0));
            let hits = Arc::clone(&counter);
            registry
                .register(name, move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(HostValue::Int(idx as i64))
                })
                .unwrap();
            counters.push(counter);
        }
        (registry, counters)
    }

    #[test]
    fn test_dispatch_invokes_exactly_the_named_workload() {
        let names = ["alpha", "beta.one", "beta.two", "gamma"];
        let (mut registry, counters) = counting_registry(&names);
        registry.register_alias("beta", "beta.two").unwrap();
        let dispatcher = Dispatcher::new(registry);

        for (idx, name) in names.iter().enumerate() {
            let before: Vec<usize> = counters.iter().map(|c| c.load(Ordering::SeqCst)).collect();
            let value = dispatcher.call(name).unwrap();
            assert_eq!(value, HostValue::Int(idx as i64));
            for (other, counter) in counters.iter().enumerate() {
                let expected = before[other] + usize::from(other == idx);
                assert_eq!(counter.load(Ordering::SeqCst), expected, "dispatching {name}");
            }
        }

        assert_eq!(dispatcher.call("beta").unwrap(), HostValue::Int(2));
        assert_eq!(counters[2].load(Ordering::SeqCst), 2);
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unknown_name_is_lookup_error() {
        let (registry, counters) = counting_registry(&["alpha"]);
        let dispatcher = Dispatcher::new(registry);
        for name in ["", "Alpha", "alpha.", "beta", "alpha.naive"] {
            let err = dispatcher.call(name).unwrap_err();
            assert!(matches!(err, DispatchError::NotFound(ref n) if n == name));
            assert_eq!(err.status_code(), -1);
        }
        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_surfaces_workload_failure_without_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let mut registry = BenchRegistry::new();
        registry
            .register("broken", move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::anyhow!("cipher setup failed"))
            })
            .unwrap();
        let dispatcher = Dispatcher::new(registry);

        let err = dispatcher.call("broken").unwrap_err();
        assert!(matches!(err, DispatchError::Workload { ref name, .. } if name == "broken"));
        assert!(err.to_string().contains("cipher setup failed"));
        assert_eq!(err.status_code(), -2);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_ignores_host_arguments() {
        let (registry, _) = counting_registry(&["alpha"]);
        let dispatcher = Dispatcher::new(registry);
        let value = dispatcher
            .dispatch("alpha", &[HostValue::Int(128), HostValue::Float(0.5)])
            .unwrap();
        assert_eq!(value, HostValue::Int(0));
    }

    #[test]
    fn test_dispatch_serializes_concurrent_callers() {
        let active = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let (a, o) = (Arc::clone(&active), Arc::clone(&overlaps));
        let mut registry = BenchRegistry::new();
        registry
            .register("busy", move || {
                if a.fetch_add(1, Ordering::SeqCst) != 0 {
                    o.fetch_add(1, Ordering::SeqCst);
                }
                std::thread::sleep(std::time::Duration::from_millis(2));
                a.fetch_sub(1, Ordering::SeqCst);
                Ok(HostValue::Nil)
            })
            .unwrap();
        let dispatcher = Arc::new(Dispatcher::new(registry));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let d = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        d.call("busy").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }
}
