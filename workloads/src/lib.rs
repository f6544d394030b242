pub mod crypto;
pub mod data;
pub mod graphics;
pub mod host;
pub mod math;
pub mod simulation;
pub mod system;

#[cfg(test)]
mod simulation_test;

use arena_core::{BenchRegistry, Dispatcher, RegistryError, dispatch};

/// Deterministic byte pattern `i % 256` shared by the hashing, cipher and
/// compression workloads.
pub fn pattern_buffer(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Register every workload suite with the given registry.
pub fn register_default_suites(registry: &mut BenchRegistry) -> Result<(), RegistryError> {
    registry.register_suite(&math::MathSuite::new())?;
    registry.register_suite(&simulation::SimulationSuite::new())?;
    registry.register_suite(&crypto::CryptoSuite::new())?;
    registry.register_suite(&data::DataSuite::new())?;
    registry.register_suite(&graphics::GraphicsSuite::new())?;
    registry.register_suite(&system::SystemSuite::new())?;
    Ok(())
}

pub fn default_registry() -> Result<BenchRegistry, RegistryError> {
    let mut registry = BenchRegistry::new();
    register_default_suites(&mut registry)?;
    Ok(registry)
}

pub fn default_dispatcher() -> Result<Dispatcher, RegistryError> {
    Ok(Dispatcher::new(default_registry()?))
}

/// Process-wide dispatcher over the default suites, built on first use.
pub fn global_dispatcher() -> Result<&'static Dispatcher, RegistryError> {
    dispatch::install_global(default_registry)
}
