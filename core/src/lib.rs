pub mod config;
pub mod dispatch;
pub mod error;
pub mod perf;
pub mod registry;
pub mod rng;
pub mod val;

#[cfg(test)]
mod dispatch_test;
#[cfg(test)]
mod registry_test;

pub use dispatch::Dispatcher;
pub use error::{ConfigError, DispatchError, RegistryError};
pub use registry::{BenchEntry, BenchRegistry, Suite};
pub use val::HostValue;
