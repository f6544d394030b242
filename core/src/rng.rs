/// Linear congruential generator shared by every seeded workload.
///
/// The constants are the Numerical Recipes pair, so the sequence matches the
/// Go and JavaScript ports of the same benchmarks bit for bit.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const SCALE: f64 = 4_294_967_296.0;

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform sample in `[0, 1)`.
    #[inline(always)]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / SCALE
    }

    pub fn fill_f64(&mut self, out: &mut [f64]) {
        for slot in out.iter_mut() {
            *slot = self.next_f64();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_first_steps() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_eq!(rng.next_u32(), 1_196_435_762);
    }

    #[test]
    fn test_lcg_same_seed_same_sequence() {
        let mut a = Lcg::new(12345);
        let mut b = Lcg::new(12345);
        for _ in 0..1000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_lcg_samples_in_unit_interval() {
        let mut rng = Lcg::new(999);
        let mut buf = [0.0f64; 256];
        rng.fill_f64(&mut buf);
        assert!(buf.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
