#[cfg(test)]
mod tests {
    use crate::simulation::*;
    use arena_core::{BenchRegistry, HostValue, rng::Lcg};

    #[test]
    fn test_soa_matches_interleaved_layout() {
        let count = 12;
        let mut rng = Lcg::new(2024);
        let mut pos = vec![0.0; count * 2];
        let mut vel = vec![0.0; count * 2];
        rng.fill_f64(&mut pos);
        for v in vel.iter_mut() {
            *v = rng.next_f64() * 0.01;
        }

        let mut soa = Bodies::from_interleaved(&pos, &vel);
        n_body_interleaved(&mut pos, &mut vel, 25);
        soa.simulate(25);

        assert_eq!(soa, Bodies::from_interleaved(&pos, &vel));
    }

    #[test]
    fn test_zeroed_state_stays_at_rest() {
        let mut bodies = Bodies::zeroed(N_BODY_COUNT);
        bodies.simulate(3);
        assert_eq!(bodies, Bodies::zeroed(N_BODY_COUNT));
        assert_eq!(bodies.len(), N_BODY_COUNT);
    }

    #[test]
    fn test_reset_clears_evolved_state() {
        let mut bodies = Bodies::from_interleaved(&[0.0, 0.0, 1.0, 0.0], &[0.0; 4]);
        bodies.simulate(1);
        assert!(bodies.vx[0] > 0.0);
        assert!(bodies.vx[1] < 0.0);
        bodies.reset();
        assert_eq!(bodies, Bodies::zeroed(2));
    }

    #[test]
    fn test_escape_time_known_points() {
        assert_eq!(escape_time(0.0, 0.0, 50), 50);
        assert_eq!(escape_time(-1.0, 0.0, 50), 50);
        assert_eq!(escape_time(2.0, 2.0, 50), 1);
        assert!(in_main_cardioid(0.0, 0.0));
        assert!(!in_main_cardioid(-1.0, 0.0));
        assert!(in_period2_bulb(-1.0, 0.0));
        assert!(!in_period2_bulb(0.0, 0.0));
    }

    #[test]
    fn test_cardioid_shortcut_changes_no_output() {
        let escape = mandelbrot_escape(MANDELBROT_WIDTH, MANDELBROT_HEIGHT, MANDELBROT_MAX_ITER);
        let shortcut = mandelbrot_cardioid(MANDELBROT_WIDTH, MANDELBROT_HEIGHT, MANDELBROT_MAX_ITER);
        assert_eq!(escape, 2_224_688);
        assert_eq!(shortcut, escape);
    }

    #[test]
    fn test_simulation_suite_registration() {
        let mut registry = BenchRegistry::new();
        registry.register_suite(&SimulationSuite::new()).unwrap();
        assert_eq!(registry.variants_of("nBody"), vec!["interleaved", "soa"]);
        assert_eq!(registry.default_variant("mandelbrot"), Some("cardioid"));
        assert_eq!(registry.get("nBody").unwrap().run().unwrap(), HostValue::Nil);
        assert_eq!(
            registry.get("mandelbrot").unwrap().run().unwrap(),
            HostValue::Int(2_224_688)
        );
    }
}
