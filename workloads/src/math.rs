use arena_core::{BenchRegistry, HostValue, RegistryError, Suite, rng::Lcg};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

pub const MATRIX_SIZE: usize = 128;
pub const MATRIX_BLOCK: usize = 32;
pub const MATRIX_SEED: u32 = 12345;
pub const SIEVE_LIMIT: usize = 100_000;
pub const FIB_N: u32 = 30;
pub const MONTE_CARLO_SAMPLES: u32 = 1_000_000;
pub const MONTE_CARLO_SEED: u32 = 12345;

/// Matrix multiply, prime sieve, Fibonacci and Monte Carlo pi.
#[derive(Debug, Default)]
pub struct MathSuite;

impl MathSuite {
    pub fn new() -> Self {
        Self
    }
}

impl Suite for MathSuite {
    fn name(&self) -> &str {
        "math"
    }

    fn description(&self) -> &str {
        "dense linear algebra, integer sieving and scalar loops"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        registry.register("matrixMultiply.naive", || {
            let (a, b) = seeded_matrices(MATRIX_SIZE, MATRIX_SEED);
            let mut out = vec![0.0f64; MATRIX_SIZE * MATRIX_SIZE];
            multiply_naive(&a, &b, &mut out, MATRIX_SIZE);
            Ok(HostValue::Float(checksum(&out)))
        })?;
        let scratch = Mutex::new(MatrixScratch::new(MATRIX_SIZE, MATRIX_SEED));
        registry.register("matrixMultiply.tiled", move || {
            let mut scratch = scratch.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(HostValue::Float(scratch.run(MATRIX_BLOCK)))
        })?;
        registry.register_alias("matrixMultiply", "matrixMultiply.tiled")?;

        registry.register("primeSieve.naive", || {
            let flags = sieve_naive(SIEVE_LIMIT);
            Ok(HostValue::from(flags.iter().filter(|&&p| p).count()))
        })?;
        let odd_flags = Mutex::new(Vec::with_capacity(SIEVE_LIMIT / 2 + 1));
        registry.register("primeSieve.odd", move || {
            let mut flags = odd_flags.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(HostValue::from(sieve_odd(SIEVE_LIMIT, &mut flags)))
        })?;
        registry.register_alias("primeSieve", "primeSieve.odd")?;

        registry.register("fibonacci.recursive", || Ok(HostValue::Int(fib_recursive(FIB_N) as i64)))?;
        registry.register("fibonacci.iterative", || Ok(HostValue::Int(fib_iterative(FIB_N) as i64)))?;
        registry.register_alias("fibonacci", "fibonacci.iterative")?;

        registry.register("monteCarloPi", || {
            Ok(HostValue::Float(monte_carlo_pi(MONTE_CARLO_SAMPLES, MONTE_CARLO_SEED)))
        })?;
        Ok(())
    }
}

/// Two `n x n` row-major matrices filled from one LCG stream, alternating
/// between `a` and `b` element by element.
pub fn seeded_matrices(n: usize, seed: u32) -> (Vec<f64>, Vec<f64>) {
    let mut rng = Lcg::new(seed);
    let mut a = vec![0.0f64; n * n];
    let mut b = vec![0.0f64; n * n];
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        *x = rng.next_f64();
        *y = rng.next_f64();
    }
    (a, b)
}

pub fn multiply_naive(a: &[f64], b: &[f64], out: &mut [f64], n: usize) {
    for i in 0..n {
        let row = &a[i * n..(i + 1) * n];
        for j in 0..n {
            let mut sum = 0.0;
            for (k, &aik) in row.iter().enumerate() {
                sum += aik * b[k * n + j];
            }
            out[i * n + j] = sum;
        }
    }
}

/// Cache-blocked multiply. `out` is overwritten, not accumulated into.
///
/// For a fixed output cell the products are still added in ascending `k`
/// order, so the result is bit-identical to [`multiply_naive`].
pub fn multiply_tiled(a: &[f64], b: &[f64], out: &mut [f64], n: usize, block: usize) {
    out.fill(0.0);
    for ii in (0..n).step_by(block) {
        let i_end = (ii + block).min(n);
        for kk in (0..n).step_by(block) {
            let k_end = (kk + block).min(n);
            for jj in (0..n).step_by(block) {
                let j_end = (jj + block).min(n);
                for i in ii..i_end {
                    let out_row = &mut out[i * n + jj..i * n + j_end];
                    for k in kk..k_end {
                        let aik = a[i * n + k];
                        let b_row = &b[k * n + jj..k * n + j_end];
                        for (o, &bkj) in out_row.iter_mut().zip(b_row) {
                            *o += aik * bkj;
                        }
                    }
                }
            }
        }
    }
}

pub fn checksum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Inputs are generated once; only the result buffer is reset per run.
struct MatrixScratch {
    n: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    out: Vec<f64>,
}

impl MatrixScratch {
    fn new(n: usize, seed: u32) -> Self {
        let (a, b) = seeded_matrices(n, seed);
        trace!(target: "arena::workload", n, "matrix scratch allocated");
        Self {
            n,
            a,
            b,
            out: vec![0.0; n * n],
        }
    }

    fn run(&mut self, block: usize) -> f64 {
        multiply_tiled(&self.a, &self.b, &mut self.out, self.n, block);
        checksum(&self.out)
    }
}

/// Plain Eratosthenes over every integer; `flags[i]` is true when `i` is prime.
pub fn sieve_naive(limit: usize) -> Vec<bool> {
    let mut flags = vec![true; limit + 1];
    flags[0] = false;
    if limit >= 1 {
        flags[1] = false;
    }
    let mut p = 2;
    while p * p <= limit {
        if flags[p] {
            let mut i = p * p;
            while i <= limit {
                flags[i] = false;
                i += p;
            }
        }
        p += 1;
    }
    flags
}

/// Odd-only sieve. `odd[i]` tracks `2 * i + 1`; 2 is counted separately.
/// Returns the number of primes `<= limit`.
pub fn sieve_odd(limit: usize, odd: &mut Vec<bool>) -> usize {
    odd.clear();
    if limit < 2 {
        return 0;
    }
    odd.resize(limit.div_ceil(2), true);
    odd[0] = false;
    let mut i = 1;
    loop {
        let p = 2 * i + 1;
        if p * p > limit {
            break;
        }
        if odd[i] {
            let mut j = (p * p - 1) / 2;
            while j < odd.len() {
                odd[j] = false;
                j += p;
            }
        }
        i += 1;
    }
    1 + odd.iter().filter(|&&is_prime| is_prime).count()
}

/// Primes `<= limit` as found by [`sieve_odd`].
pub fn odd_sieve_primes(limit: usize) -> Vec<usize> {
    let mut odd = Vec::new();
    if sieve_odd(limit, &mut odd) == 0 {
        return Vec::new();
    }
    std::iter::once(2)
        .chain(
            odd.iter()
                .enumerate()
                .filter(|(_, is_prime)| **is_prime)
                .map(|(i, _)| 2 * i + 1),
        )
        .collect()
}

pub fn fib_recursive(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fib_recursive(n - 1) + fib_recursive(n - 2)
}

pub fn fib_iterative(n: u32) -> u64 {
    let (mut prev, mut curr) = (0u64, 1u64);
    if n == 0 {
        return 0;
    }
    for _ in 1..n {
        let next = prev + curr;
        prev = curr;
        curr = next;
    }
    curr
}

pub fn monte_carlo_pi(samples: u32, seed: u32) -> f64 {
    let mut rng = Lcg::new(seed);
    let mut inside = 0u32;
    for _ in 0..samples {
        let x = rng.next_f64();
        let y = rng.next_f64();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }
    4.0 * inside as f64 / samples as f64
}
