use crate::error::{DispatchError, RegistryError};
use crate::registry::BenchRegistry;
use crate::val::HostValue;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, trace};

/// Routes a host call by name to its registered workload.
///
/// Dispatch is synchronous and run-to-completion. Calls are serialized by an
/// internal guard so at most one workload runs at a time even when several
/// host threads share the dispatcher.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<BenchRegistry>,
    guard: Mutex<()>,
}

impl Dispatcher {
    pub fn new(registry: BenchRegistry) -> Self {
        Self::from_arc(Arc::new(registry))
    }

    pub fn from_arc(registry: Arc<BenchRegistry>) -> Self {
        Self {
            registry,
            guard: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &BenchRegistry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<BenchRegistry> {
        Arc::clone(&self.registry)
    }

    /// Invoke the workload registered as `name`.
    ///
    /// Workloads take no arguments; anything in `args` is ignored. Workload
    /// failures are returned as-is and never retried.
    pub fn dispatch(&self, name: &str, args: &[HostValue]) -> Result<HostValue, DispatchError> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::NotFound(name.to_string()))?;

        if !args.is_empty() {
            debug!(target: "arena::dispatch", name, ignored = args.len(), "ignoring host arguments");
        }

        // The guard protects no data, so a panic in an earlier workload leaves nothing to repair.
        let _serial = self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let start = Instant::now();
        let result = entry.run();
        trace!(
            target: "arena::dispatch",
            name,
            entry = entry.name(),
            elapsed_ns = start.elapsed().as_nanos() as u64,
            ok = result.is_ok(),
            "dispatch"
        );

        result.map_err(|source| DispatchError::Workload {
            name: entry.name().to_string(),
            source,
        })
    }

    pub fn call(&self, name: &str) -> Result<HostValue, DispatchError> {
        self.dispatch(name, &[])
    }
}

static GLOBAL_DISPATCHER: OnceCell<Dispatcher> = OnceCell::new();

/// Build the process-wide dispatcher on first use.
///
/// A failing `init` leaves the slot empty so the error reaches the caller
/// (startup is expected to abort on it).
pub fn install_global<F>(init: F) -> Result<&'static Dispatcher, RegistryError>
where
    F: FnOnce() -> Result<BenchRegistry, RegistryError>,
{
    GLOBAL_DISPATCHER.get_or_try_init(|| {
        let registry = init()?;
        debug!(target: "arena::dispatch", entries = registry.len(), "global dispatcher installed");
        Ok(Dispatcher::new(registry))
    })
}

pub fn global() -> Option<&'static Dispatcher> {
    GLOBAL_DISPATCHER.get()
}
