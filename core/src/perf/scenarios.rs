use crate::{
    dispatch::Dispatcher,
    registry::BenchRegistry,
    val::HostValue,
};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

pub struct RunOutcome {
    pub value: HostValue,
    pub elapsed: Duration,
}

#[derive(Clone, Copy)]
pub struct PreparedScenario {
    scenario: &'static BenchScenario,
}

impl PreparedScenario {
    pub fn key(&self) -> &'static str {
        self.scenario.key
    }

    pub fn title(&self) -> &'static str {
        self.scenario.title
    }

    pub fn benchmark(&self) -> &'static str {
        self.scenario.benchmark
    }

    pub fn bench_case_name(&self) -> String {
        format!("{}_native", self.scenario.key)
    }

    pub fn run_with(&self, dispatcher: &Dispatcher) -> Result<RunOutcome> {
        let start = Instant::now();
        let value = dispatcher
            .call(self.scenario.benchmark)
            .with_context(|| format!("dispatch failed for scenario {}", self.scenario.key))?;
        let elapsed = start.elapsed();
        self.scenario
            .expected
            .verify(&value)
            .with_context(|| format!("scenario {} returned an unexpected value", self.scenario.key))?;
        Ok(RunOutcome { value, elapsed })
    }
}

struct BenchScenario {
    key: &'static str,
    title: &'static str,
    benchmark: &'static str,
    expected: ExpectedValue,
}

#[derive(Clone, Copy)]
enum ExpectedValue {
    Int(i64),
    Float(f64),
    Approx(f64, f64),
    Nil,
}

impl ExpectedValue {
    fn verify(&self, actual: &HostValue) -> Result<()> {
        let matches = match self {
            ExpectedValue::Int(v) => actual == &HostValue::Int(*v),
            ExpectedValue::Float(v) => match actual {
                HostValue::Float(f) => (f - v).abs() <= f64::EPSILON,
                _ => false,
            },
            ExpectedValue::Approx(v, tolerance) => match actual {
                HostValue::Float(f) => (f - v).abs() <= *tolerance,
                _ => false,
            },
            ExpectedValue::Nil => actual.is_nil(),
        };
        if matches {
            Ok(())
        } else {
            Err(anyhow::anyhow!("expected {:?} but observed {:?}", self, actual))
        }
    }
}

impl std::fmt::Debug for ExpectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedValue::Int(v) => write!(f, "Int({})", v),
            ExpectedValue::Float(v) => write!(f, "Float({})", v),
            ExpectedValue::Approx(v, tol) => write!(f, "Float({} ± {})", v, tol),
            ExpectedValue::Nil => write!(f, "Nil"),
        }
    }
}

const MATRIX_CHECKSUM: ExpectedValue = ExpectedValue::Approx(519_700.341_295_052_5, 1e-6);
const PRIMES_BELOW_LIMIT: ExpectedValue = ExpectedValue::Int(9_592);
const FIB_30: ExpectedValue = ExpectedValue::Int(832_040);
const MANDELBROT_ITERATIONS: ExpectedValue = ExpectedValue::Int(2_224_688);
const JSON_ITEMS: ExpectedValue = ExpectedValue::Int(100);
const RAY_HITS: ExpectedValue = ExpectedValue::Int(5_013);

static SCENARIOS: &[BenchScenario] = &[
    BenchScenario {
        key: "matrix_multiply_naive",
        title: "128x128 matrix multiply, i-j-k",
        benchmark: "matrixMultiply.naive",
        expected: MATRIX_CHECKSUM,
    },
    BenchScenario {
        key: "matrix_multiply_tiled",
        title: "128x128 matrix multiply, 32-blocked",
        benchmark: "matrixMultiply.tiled",
        expected: MATRIX_CHECKSUM,
    },
    BenchScenario {
        key: "prime_sieve_naive",
        title: "Sieve of Eratosthenes to 100k",
        benchmark: "primeSieve.naive",
        expected: PRIMES_BELOW_LIMIT,
    },
    BenchScenario {
        key: "prime_sieve_odd",
        title: "Odd-only sieve to 100k",
        benchmark: "primeSieve.odd",
        expected: PRIMES_BELOW_LIMIT,
    },
    BenchScenario {
        key: "fibonacci_recursive",
        title: "Recursive fib(30)",
        benchmark: "fibonacci.recursive",
        expected: FIB_30,
    },
    BenchScenario {
        key: "fibonacci_iterative",
        title: "Iterative fib(30)",
        benchmark: "fibonacci.iterative",
        expected: FIB_30,
    },
    BenchScenario {
        key: "monte_carlo_pi",
        title: "Monte Carlo pi, 1M LCG samples",
        benchmark: "monteCarloPi",
        expected: ExpectedValue::Float(3.142_656),
    },
    BenchScenario {
        key: "n_body_interleaved",
        title: "N-body 100x1000, interleaved xy",
        benchmark: "nBody.interleaved",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "n_body_soa",
        title: "N-body 100x1000, structure of arrays",
        benchmark: "nBody.soa",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "mandelbrot_escape",
        title: "Mandelbrot 100x100, plain escape time",
        benchmark: "mandelbrot.escape",
        expected: MANDELBROT_ITERATIONS,
    },
    BenchScenario {
        key: "mandelbrot_cardioid",
        title: "Mandelbrot 100x100, cardioid and bulb checks",
        benchmark: "mandelbrot.cardioid",
        expected: MANDELBROT_ITERATIONS,
    },
    BenchScenario {
        key: "sha256",
        title: "SHA-256, 500 x 10KB",
        benchmark: "sha256",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "aes_encrypt",
        title: "AES-256-GCM seal, 500 x 10KB",
        benchmark: "aesEncrypt",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "json_parse_dynamic",
        title: "JSON decode into value tree, 100 passes",
        benchmark: "jsonParse.dynamic",
        expected: JSON_ITEMS,
    },
    BenchScenario {
        key: "json_parse_typed",
        title: "JSON decode into structs, 100 passes",
        benchmark: "jsonParse.typed",
        expected: JSON_ITEMS,
    },
    BenchScenario {
        key: "quick_sort_lomuto",
        title: "Quicksort 10k ints, Lomuto partition",
        benchmark: "quickSort.lomuto",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "quick_sort_std",
        title: "Library unstable sort, 10k ints",
        benchmark: "quickSort.std",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "bubble_sort_classic",
        title: "Bubble sort 1k floats, full passes",
        benchmark: "bubbleSort.classic",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "bubble_sort_early_exit",
        title: "Bubble sort 1k floats, early exit",
        benchmark: "bubbleSort.early_exit",
        expected: ExpectedValue::Nil,
    },
    BenchScenario {
        key: "ray_trace_full",
        title: "Circle hit count over full 100x100 grid",
        benchmark: "rayTrace.full",
        expected: RAY_HITS,
    },
    BenchScenario {
        key: "ray_trace_pruned",
        title: "Circle hit count inside bounding box",
        benchmark: "rayTrace.pruned",
        expected: RAY_HITS,
    },
    BenchScenario {
        key: "compression",
        title: "gzip 50 x 10KB at default level",
        benchmark: "compression",
        expected: ExpectedValue::Nil,
    },
];

/// Scenarios whose benchmark is registered in `registry`.
///
/// A scenario naming a missing benchmark is an error: it means the scenario
/// table and the registered suites have drifted apart.
pub fn prepare_scenarios(registry: &BenchRegistry) -> Result<Vec<PreparedScenario>> {
    SCENARIOS
        .iter()
        .map(|scenario| {
            if registry.contains(scenario.benchmark) {
                Ok(PreparedScenario { scenario })
            } else {
                Err(anyhow::anyhow!(
                    "scenario {} targets unregistered benchmark '{}'",
                    scenario.key,
                    scenario.benchmark
                ))
            }
        })
        .collect()
}
