use std::path::{Component, Path, PathBuf};
use std::sync::Once;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "arena::registry=debug,arena::dispatch=debug,arena::workload=debug,arena::host=info,arena_cli=info";

use anyhow::Context;
use arena_core::{Dispatcher, config::RunPlan, perf::scenarios::prepare_scenarios};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

mod repl;
mod report;
mod runner;
mod worker;

#[derive(Debug, Parser)]
#[command(
    name = "arena",
    author,
    version,
    about = "Run and compare CPU micro-benchmarks",
    long_about = None,
    after_help = "Set ARENA_TRACE=1 (or a filter such as ARENA_TRACE=arena::dispatch=trace) to log to stderr."
)]
struct CliArgs {
    /// Without a subcommand an interactive shell starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every benchmark with its variants; `*` marks the default.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Time benchmarks and print summary statistics.
    Run {
        /// Benchmark or `benchmark.variant` names; all benchmarks when empty.
        #[arg(value_name = "NAMES")]
        names: Vec<String>,
        /// Timed calls per benchmark
        #[arg(long, short = 'n')]
        iterations: Option<usize>,
        /// Untimed calls before timing starts
        #[arg(long)]
        warmup: Option<usize>,
        /// Run plan file (json, yaml or toml)
        #[arg(long, value_parser = parse_sanitized_path)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Write latest/history reports into this directory
        #[arg(long, value_parser = parse_sanitized_path)]
        output_dir: Option<PathBuf>,
        /// Max history snapshots to keep
        #[arg(long)]
        history_limit: Option<usize>,
        /// Attach notes to this run's report
        #[arg(long)]
        notes: Option<String>,
    },
    /// Run every scenario once and check its expected result.
    Verify,
    /// Serve line-delimited JSON requests on stdin/stdout.
    Worker,
}

/// Paths from the command line may not climb out of the working tree.
fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let path = PathBuf::from(raw);
    anyhow::ensure!(
        !path.components().any(|c| c == Component::ParentDir),
        "path '{raw}' must not contain '..' components"
    );
    Ok(path)
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

/// What `ARENA_TRACE` asks for.
#[derive(Debug, PartialEq, Eq)]
enum TraceSetting {
    Off,
    /// Fall back to `RUST_LOG`, then to [`DEFAULT_TRACE_FILTER`].
    Default,
    Filter(String),
}

impl TraceSetting {
    fn parse(raw: &str) -> Self {
        let is_any = |value: &str, words: &[&str]| words.iter().any(|w| value.eq_ignore_ascii_case(w));
        match raw.trim() {
            "" => TraceSetting::Off,
            v if is_any(v, &["0", "false", "off"]) => TraceSetting::Off,
            v if is_any(v, &["1", "true", "on"]) => TraceSetting::Default,
            v => TraceSetting::Filter(v.to_string()),
        }
    }
}

fn maybe_init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let setting = std::env::var("ARENA_TRACE").map_or(TraceSetting::Off, |raw| TraceSetting::parse(&raw));
    let expr = match setting {
        TraceSetting::Off => return,
        TraceSetting::Default => std::env::var("RUST_LOG").ok(),
        TraceSetting::Filter(expr) => Some(expr),
    };
    let filter = expr
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TRACE_FILTER));

    TRACE_INIT.call_once(|| {
        let _ = fmt().with_writer(std::io::stderr).with_env_filter(filter).try_init();
    });
}

/// Fold command-line overrides into a plan loaded from `config` (or the default plan).
fn build_plan(
    config: Option<&Path>,
    names: Vec<String>,
    iterations: Option<usize>,
    warmup: Option<usize>,
    output_dir: Option<PathBuf>,
    history_limit: Option<usize>,
    notes: Option<String>,
) -> anyhow::Result<RunPlan> {
    let mut plan = match config {
        Some(path) => RunPlan::load(path)?,
        None => RunPlan::default(),
    };
    if !names.is_empty() {
        plan.benchmarks = names;
    }
    if let Some(iterations) = iterations {
        plan.iterations = iterations;
    }
    if let Some(warmup) = warmup {
        plan.warmup = warmup;
    }
    if output_dir.is_some() {
        plan.output_dir = output_dir;
    }
    if let Some(limit) = history_limit {
        plan.history_limit = limit;
    }
    if notes.is_some() {
        plan.notes = notes;
    }
    plan.validate()?;
    Ok(plan)
}

#[derive(Debug, Serialize)]
struct ListedBenchmark<'a> {
    name: &'a str,
    suite: Option<&'a str>,
    default: Option<&'a str>,
    variants: Vec<&'a str>,
}

fn list_benchmarks(dispatcher: &Dispatcher) -> Vec<ListedBenchmark<'_>> {
    let registry = dispatcher.registry();
    registry
        .benchmarks()
        .into_iter()
        .map(|name| ListedBenchmark {
            name,
            suite: registry.get(name).and_then(|entry| entry.suite()),
            default: registry.default_variant(name),
            variants: registry.variants_of(name),
        })
        .collect()
}

fn render_list(listed: &[ListedBenchmark<'_>]) -> String {
    let width = listed.iter().map(|b| b.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for bench in listed {
        let variants: Vec<String> = bench
            .variants
            .iter()
            .map(|v| {
                if Some(*v) == bench.default {
                    format!("{v}*")
                } else {
                    v.to_string()
                }
            })
            .collect();
        out.push_str(&format!(
            "{:<width$}  {:<10}  {}\n",
            bench.name,
            bench.suite.unwrap_or("-"),
            variants.join(" ")
        ));
    }
    out
}

fn run_verify(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let scenarios = prepare_scenarios(dispatcher.registry())?;
    let mut failures = 0usize;
    for scenario in &scenarios {
        match scenario.run_with(dispatcher) {
            Ok(outcome) => println!(
                "ok    {:<28} {:<12} {:>10.3} ms  {}",
                scenario.key(),
                outcome.value,
                outcome.elapsed.as_secs_f64() * 1_000.0,
                scenario.title()
            ),
            Err(err) => {
                failures += 1;
                println!("FAIL  {:<28} {err:#}", scenario.key());
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} scenarios failed", scenarios.len());
    }
    println!("{} scenarios verified", scenarios.len());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command } = CliArgs::parse();
    let dispatcher = arena_workloads::global_dispatcher().context("failed to build benchmark registry")?;

    let Some(cmd) = command else {
        return repl::run(dispatcher);
    };

    match cmd {
        Commands::List { format } => {
            let listed = list_benchmarks(dispatcher);
            match format {
                OutputFormat::Table => print!("{}", render_list(&listed)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listed)?),
            }
        }
        Commands::Run {
            names,
            iterations,
            warmup,
            config,
            format,
            output_dir,
            history_limit,
            notes,
        } => {
            let plan = build_plan(
                config.as_deref(),
                names,
                iterations,
                warmup,
                output_dir,
                history_limit,
                notes,
            )?;
            let names = plan.resolve_benchmarks(dispatcher.registry());
            let metrics = runner::run_benchmarks(dispatcher, &names, plan.iterations, plan.warmup)?;

            let timestamp = Utc::now();
            let record = report::RunRecord::new(timestamp, plan.notes.clone(), plan.iterations, plan.warmup, metrics);
            match format {
                OutputFormat::Table => print!("{}", report::render_table(&record.metrics)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
            }

            if let Some(dir) = &plan.output_dir {
                let paths = report::write_report(dir, &record, timestamp, plan.history_limit)?;
                eprintln!(
                    "Report written -> {}, {}, {}",
                    paths.latest_json.display(),
                    paths.latest_csv.display(),
                    paths.history_json.display()
                );
            }
        }
        Commands::Verify => run_verify(dispatcher)?,
        Commands::Worker => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            worker::serve(dispatcher, stdin.lock(), stdout.lock())?;
        }
    }
    Ok(())
}
