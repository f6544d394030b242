use crate::error::RegistryError;
use crate::val::HostValue;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Zero-argument workload body. Shared so entries stay cheap to clone.
pub type WorkloadFn = Arc<dyn Fn() -> anyhow::Result<HostValue> + Send + Sync>;

/// Separator between a benchmark and its algorithm variant, e.g.
/// `matrixMultiply.tiled`.
pub const VARIANT_SEPARATOR: char = '.';

/// Split `benchmark.variant` into its parts.
pub fn split_variant(name: &str) -> (&str, Option<&str>) {
    match name.split_once(VARIANT_SEPARATOR) {
        Some((bench, variant)) => (bench, Some(variant)),
        None => (name, None),
    }
}

pub fn variant_name(benchmark: &str, variant: &str) -> String {
    format!("{benchmark}{VARIANT_SEPARATOR}{variant}")
}

/// A named workload. Immutable once registered.
#[derive(Clone)]
pub struct BenchEntry {
    name: String,
    suite: Option<String>,
    workload: WorkloadFn,
}

impl BenchEntry {
    pub fn new<F>(name: impl Into<String>, workload: F) -> Self
    where
        F: Fn() -> anyhow::Result<HostValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            suite: None,
            workload: Arc::new(workload),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn benchmark(&self) -> &str {
        split_variant(&self.name).0
    }

    pub fn variant(&self) -> Option<&str> {
        split_variant(&self.name).1
    }

    pub fn suite(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    pub fn run(&self) -> anyhow::Result<HostValue> {
        (self.workload)()
    }
}

impl fmt::Debug for BenchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchEntry")
            .field("name", &self.name)
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}

/// A family of related workloads registered together, in the spirit of a
/// standard library module: one suite per concern (math, crypto, ...).
pub trait Suite: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn enabled(&self) -> bool {
        true
    }

    /// Insert this suite's entries and aliases into the registry.
    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError>;
}

/// Process-wide table from benchmark name to workload.
///
/// Bare benchmark names (`matrixMultiply`) are aliases that resolve to the
/// authoritative variant (`matrixMultiply.tiled`). Registering a name that is
/// already taken, as an entry or as an alias, is rejected and leaves the
/// existing registration in place. A suite that fails part way through leaves
/// no trace of its entries behind.
#[derive(Default)]
pub struct BenchRegistry {
    entries: FxHashMap<String, BenchEntry>,
    aliases: FxHashMap<String, String>,
    suites: Vec<String>,
    current_suite: Option<String>,
    staged: Vec<String>,
}

impl BenchRegistry {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            aliases: FxHashMap::default(),
            suites: Vec::new(),
            current_suite: None,
            staged: Vec::new(),
        }
    }

    /// Register every entry of `suite` if it is enabled.
    pub fn register_suite(&mut self, suite: &dyn Suite) -> Result<(), RegistryError> {
        if !suite.enabled() {
            debug!(target: "arena::registry", suite = suite.name(), "suite disabled; skipping");
            return Ok(());
        }
        self.current_suite = Some(suite.name().to_string());
        let result = suite.register(self);
        self.current_suite = None;
        let staged = std::mem::take(&mut self.staged);
        if let Err(err) = result {
            for name in &staged {
                self.entries.remove(name);
                self.aliases.remove(name);
            }
            debug!(target: "arena::registry", suite = suite.name(), rolled_back = staged.len(), error = %err, "suite failed");
            return Err(err);
        }
        self.suites.push(suite.name().to_string());
        debug!(target: "arena::registry", suite = suite.name(), entries = self.entries.len(), "suite registered");
        Ok(())
    }

    pub fn register<F>(&mut self, name: &str, workload: F) -> Result<(), RegistryError>
    where
        F: Fn() -> anyhow::Result<HostValue> + Send + Sync + 'static,
    {
        self.register_entry(BenchEntry::new(name, workload))
    }

    pub fn register_entry(&mut self, mut entry: BenchEntry) -> Result<(), RegistryError> {
        if entry.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.is_taken(&entry.name) {
            return Err(RegistryError::Duplicate(entry.name));
        }
        if entry.suite.is_none() {
            entry.suite = self.current_suite.clone();
        }
        if self.current_suite.is_some() {
            self.staged.push(entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Make `alias` resolve to the already registered entry `target`.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<(), RegistryError> {
        if alias.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.is_taken(alias) {
            return Err(RegistryError::Duplicate(alias.to_string()));
        }
        if !self.entries.contains_key(target) {
            return Err(RegistryError::DanglingAlias {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
        if self.current_suite.is_some() {
            self.staged.push(alias.to_string());
        }
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(())
    }

    fn is_taken(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Canonical entry name for `name`, following at most one alias hop.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(name) {
            return Some(key.as_str());
        }
        self.aliases.get(name).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&BenchEntry> {
        self.resolve(name).and_then(|canonical| self.entries.get(canonical))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of concrete entries (aliases not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every concrete entry name, sorted.
    pub fn entry_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every dispatchable name (entries and aliases), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Host-facing benchmark names: aliases plus entries registered without
    /// a variant, sorted.
    pub fn benchmarks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .aliases
            .keys()
            .map(String::as_str)
            .chain(
                self.entries
                    .values()
                    .filter(|entry| entry.variant().is_none())
                    .map(BenchEntry::name),
            )
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Variant labels registered for `benchmark`, sorted.
    pub fn variants_of(&self, benchmark: &str) -> Vec<&str> {
        let mut variants: Vec<&str> = self
            .entries
            .values()
            .filter(|entry| entry.benchmark() == benchmark)
            .filter_map(BenchEntry::variant)
            .collect();
        variants.sort_unstable();
        variants
    }

    /// Variant the bare `benchmark` name resolves to, if it is an alias.
    pub fn default_variant(&self, benchmark: &str) -> Option<&str> {
        self.aliases
            .get(benchmark)
            .and_then(|target| split_variant(target).1)
    }

    pub fn suite_names(&self) -> &[String] {
        &self.suites
    }
}

impl fmt::Debug for BenchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchRegistry")
            .field("entries", &self.entry_names())
            .field("aliases", &self.aliases)
            .field("suites", &self.suites)
            .finish()
    }
}
