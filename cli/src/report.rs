use anyhow::{Context, Result};
use arena_core::{HostValue, perf::TimeStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Host-side timing of one benchmark within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchMetrics {
    /// Name as requested by the caller.
    pub benchmark: String,
    /// Concrete entry the name resolved to.
    pub entry: String,
    #[serde(default)]
    pub suite: Option<String>,
    pub value: HostValue,
    #[serde(flatten)]
    pub stats: TimeStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub generated_at: String,
    pub git_rev: Option<String>,
    pub notes: Option<String>,
    pub iterations: usize,
    pub warmup: usize,
    pub metrics: Vec<BenchMetrics>,
}

impl RunRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        notes: Option<String>,
        iterations: usize,
        warmup: usize,
        metrics: Vec<BenchMetrics>,
    ) -> Self {
        let git_rev = std::env::var("GITHUB_SHA")
            .ok()
            .map(|sha| sha.chars().take(8).collect::<String>());
        Self {
            generated_at: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            git_rev,
            notes,
            iterations,
            warmup,
            metrics,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryFile {
    pub generated_at: String,
    pub history_limit: usize,
    pub runs: Vec<RunRecord>,
}

/// Files written by [`write_report`].
#[derive(Debug)]
pub struct ReportPaths {
    pub latest_json: PathBuf,
    pub latest_csv: PathBuf,
    pub history_json: PathBuf,
}

/// Write `latest.*`, a timestamped snapshot under `history/`, prune old
/// snapshots beyond `history_limit` and rebuild `history.json`.
pub fn write_report(
    output_dir: &Path,
    record: &RunRecord,
    timestamp: DateTime<Utc>,
    history_limit: usize,
) -> Result<ReportPaths> {
    let history_dir = output_dir.join("history");
    fs::create_dir_all(&history_dir)
        .with_context(|| format!("create history directory {}", history_dir.display()))?;

    let stamp = history_stamp(timestamp);
    let latest_json = output_dir.join("latest.json");
    let latest_csv = output_dir.join("latest.csv");
    write_json(&latest_json, record)?;
    write_csv(&latest_csv, &record.metrics)?;
    write_json(&history_dir.join(format!("{stamp}.json")), record)?;
    write_csv(&history_dir.join(format!("{stamp}.csv")), &record.metrics)?;

    prune_history(&history_dir, history_limit)?;
    let timeline = HistoryFile {
        generated_at: record.generated_at.clone(),
        history_limit,
        runs: load_history_runs(&history_dir, history_limit)?,
    };
    let history_json = output_dir.join("history.json");
    write_json(&history_json, &timeline)?;

    Ok(ReportPaths {
        latest_json,
        latest_csv,
        history_json,
    })
}

/// Snapshot file stem; sorts lexicographically in time order.
pub fn history_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%S%.3fZ").to_string()
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value).with_context(|| format!("write {}", path.display()))
}

pub fn write_csv(path: &Path, metrics: &[BenchMetrics]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(
        writer,
        "benchmark,entry,value,samples,mean_ns,median_ns,std_dev_ns,min_ns,max_ns,p50_ns,p95_ns,p99_ns"
    )?;
    for metric in metrics {
        let s = &metric.stats;
        writeln!(
            writer,
            "{},{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
            metric.benchmark,
            metric.entry,
            metric.value,
            s.samples,
            s.mean_ns,
            s.median_ns,
            s.std_dev_ns,
            s.min_ns,
            s.max_ns,
            s.p50_ns,
            s.p95_ns,
            s.p99_ns
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn snapshot_entries(history_dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<_> = fs::read_dir(history_dir)
        .with_context(|| format!("read history directory {}", history_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Keep only the newest `limit` snapshots (and their CSV twins).
pub fn prune_history(history_dir: &Path, limit: usize) -> Result<()> {
    let entries = snapshot_entries(history_dir)?;
    let excess = entries.len().saturating_sub(limit);
    for entry in entries.into_iter().take(excess) {
        let path = entry.path();
        fs::remove_file(&path).with_context(|| format!("remove old history snapshot {}", path.display()))?;
        let csv_path = path.with_extension("csv");
        if csv_path.exists() {
            fs::remove_file(csv_path).ok();
        }
    }
    Ok(())
}

/// Newest-first snapshots, at most `limit`.
pub fn load_history_runs(history_dir: &Path, limit: usize) -> Result<Vec<RunRecord>> {
    let mut entries = snapshot_entries(history_dir)?;
    entries.reverse();
    entries.truncate(limit);

    let mut runs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let data = fs::read_to_string(&path).with_context(|| format!("read history snapshot {}", path.display()))?;
        let mut record: RunRecord = serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
        record.metrics.sort_by(|a, b| a.benchmark.cmp(&b.benchmark));
        runs.push(record);
    }
    Ok(runs)
}

/// Fixed-width table for terminal output.
pub fn render_table(metrics: &[BenchMetrics]) -> String {
    let name_width = metrics
        .iter()
        .map(|m| m.benchmark.len())
        .max()
        .unwrap_or(0)
        .max("benchmark".len());
    let mut out = format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>12}  {:>14}  {:>14}  {:>14}  value\n",
        "benchmark", "mean_ns", "median_ns", "std_dev_ns", "p50_ns", "p95_ns", "p99_ns"
    );
    for m in metrics {
        let s = &m.stats;
        out.push_str(&format!(
            "{:<name_width$}  {:>14.0}  {:>14.0}  {:>12.0}  {:>14.0}  {:>14.0}  {:>14.0}  {}\n",
            m.benchmark, s.mean_ns, s.median_ns, s.std_dev_ns, s.p50_ns, s.p95_ns, s.p99_ns, m.value
        ));
    }
    out
}
