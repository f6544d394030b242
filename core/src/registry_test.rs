#[cfg(test)]
mod tests {
    use crate::error::RegistryError;
    use crate::registry::{BenchRegistry, Suite, split_variant, variant_name};
    use crate::val::HostValue;

    #[derive(Debug)]
    struct ToySuite;

    impl Suite for ToySuite {
        fn name(&self) -> &str {
            "toy"
        }

        fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
            registry.register("count.slow", || Ok(HostValue::Int(1)))?;
            registry.register("count.fast", || Ok(HostValue::Int(1)))?;
            registry.register_alias("count", "count.fast")?;
            registry.register("noop", || Ok(HostValue::Nil))?;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct DisabledSuite;

    impl Suite for DisabledSuite {
        fn name(&self) -> &str {
            "disabled"
        }

        fn enabled(&self) -> bool {
            false
        }

        fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
            registry.register("never", || Ok(HostValue::Nil))
        }
    }

    #[derive(Debug)]
    struct HalfBrokenSuite;

    impl Suite for HalfBrokenSuite {
        fn name(&self) -> &str {
            "half"
        }

        fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
            registry.register("digest", || Ok(HostValue::Int(1)))?;
            registry.register("seal.gcm", || Ok(HostValue::Nil))?;
            registry.register_alias("seal", "seal.gcm")?;
            Err(RegistryError::SuiteInit {
                suite: "half".to_string(),
                source: anyhow::anyhow!("no entropy"),
            })
        }
    }

    #[test]
    fn test_split_variant() {
        assert_eq!(split_variant("matrixMultiply.tiled"), ("matrixMultiply", Some("tiled")));
        assert_eq!(split_variant("sha256"), ("sha256", None));
        assert_eq!(variant_name("rayTrace", "pruned"), "rayTrace.pruned");
    }

    #[test]
    fn test_duplicate_entry_rejected_and_original_kept() {
        let mut registry = BenchRegistry::new();
        registry.register("x", || Ok(HostValue::Int(1))).unwrap();
        let err = registry.register("x", || Ok(HostValue::Int(2))).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(ref n) if n == "x"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().run().unwrap(), HostValue::Int(1));
    }

    #[test]
    fn test_alias_collisions_rejected() {
        let mut registry = BenchRegistry::new();
        registry.register("a.one", || Ok(HostValue::Nil)).unwrap();
        registry.register_alias("a", "a.one").unwrap();
        assert!(matches!(
            registry.register("a", || Ok(HostValue::Nil)),
            Err(RegistryError::Duplicate(_))
        ));
        assert!(matches!(
            registry.register_alias("a.one", "a.one"),
            Err(RegistryError::Duplicate(_))
        ));
        assert!(matches!(
            registry.register_alias("b", "b.missing"),
            Err(RegistryError::DanglingAlias { .. })
        ));
        assert!(matches!(
            registry.register("", || Ok(HostValue::Nil)),
            Err(RegistryError::EmptyName)
        ));
    }

    #[test]
    fn test_suite_registration_and_queries() {
        let mut registry = BenchRegistry::new();
        registry.register_suite(&ToySuite).unwrap();
        registry.register_suite(&DisabledSuite).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(!registry.contains("never"));
        assert_eq!(registry.suite_names(), &["toy".to_string()]);
        assert_eq!(registry.resolve("count"), Some("count.fast"));
        assert_eq!(registry.resolve("count.slow"), Some("count.slow"));
        assert_eq!(registry.resolve("missing"), None);
        assert_eq!(registry.variants_of("count"), vec!["fast", "slow"]);
        assert_eq!(registry.default_variant("count"), Some("fast"));
        assert_eq!(registry.default_variant("noop"), None);
        assert_eq!(registry.benchmarks(), vec!["count", "noop"]);
        assert_eq!(registry.names(), vec!["count", "count.fast", "count.slow", "noop"]);
        assert_eq!(registry.get("count").unwrap().suite(), Some("toy"));
    }

    #[test]
    fn test_failed_suite_leaves_no_partial_entries() {
        let mut registry = BenchRegistry::new();
        registry.register_suite(&ToySuite).unwrap();
        let err = registry.register_suite(&HalfBrokenSuite).unwrap_err();
        assert!(matches!(err, RegistryError::SuiteInit { ref suite, .. } if suite == "half"));

        assert_eq!(registry.len(), 3);
        for name in ["digest", "seal", "seal.gcm"] {
            assert!(!registry.contains(name), "{name} should have been rolled back");
        }
        assert_eq!(registry.suite_names(), &["toy".to_string()]);

        // The names are free again once the suite is gone.
        registry.register("digest", || Ok(HostValue::Int(2))).unwrap();
        assert_eq!(registry.get("digest").unwrap().suite(), None);
        assert_eq!(registry.get("count").unwrap().run().unwrap(), HostValue::Int(1));
    }
}
