use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn lists_every_host_benchmark() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("arena")?;
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("matrixMultiply"))
        .stdout(predicate::str::contains("naive tiled*"))
        .stdout(predicate::str::contains("compression"));
    Ok(())
}

#[test]
fn lists_as_json() -> Result<(), Box<dyn Error>> {
    let output = Command::cargo_bin("arena")?.args(["list", "--format", "json"]).output()?;
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 13);
    assert!(names.contains(&"aesEncrypt"));
    Ok(())
}

#[test]
fn run_rejects_unknown_benchmark() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("arena")?;
    cmd.args(["run", "fibonacci", "warpDrive", "-n", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("warpDrive"));
    Ok(())
}

#[test]
fn run_writes_reports_into_output_dir() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let out = dir.path().join("perf");

    let mut cmd = Command::cargo_bin("arena")?;
    cmd.args(["run", "fibonacci", "rayTrace.full", "--iterations", "3", "--warmup", "0", "--notes", "ci"])
        .arg("--output-dir")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fibonacci"))
        .stdout(predicate::str::contains("832040"));

    let latest: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("latest.json"))?)?;
    assert_eq!(latest["notes"], "ci");
    assert_eq!(latest["iterations"], 3);
    assert_eq!(latest["metrics"][1]["benchmark"], "rayTrace.full");
    assert_eq!(latest["metrics"][1]["value"], 5013);
    assert!(out.join("latest.csv").exists());
    assert!(out.join("history.json").exists());
    assert_eq!(fs::read_dir(out.join("history"))?.count(), 2);
    Ok(())
}

#[test]
fn run_reads_plan_from_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let plan = dir.path().join("plan.toml");
    fs::write(&plan, "benchmarks = [\"primeSieve.naive\"]\niterations = 2\nwarmup = 0\n")?;

    let output = Command::cargo_bin("arena")?
        .args(["run", "--format", "json", "--config"])
        .arg(&plan)
        .output()?;
    assert!(output.status.success());
    let record: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(record["metrics"][0]["entry"], "primeSieve.naive");
    assert_eq!(record["metrics"][0]["samples"], 2);
    assert_eq!(record["metrics"][0]["value"], 9592);
    Ok(())
}

#[test]
fn worker_speaks_json_lines() -> Result<(), Box<dyn Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("arena")?;
    cmd.arg("worker").write_stdin(
        "{\"type\":\"RUN_BENCHMARK\",\"fnName\":\"fibonacci\",\"args\":[],\"id\":1}\n\
         {\"type\":\"RUN_BENCHMARK\",\"fnName\":\"nope\",\"args\":[],\"id\":2}\n",
    );
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("{\"type\":\"READY\"}"))
        .stdout(predicate::str::contains("\"type\":\"RESULT\""))
        .stdout(predicate::str::contains("\"value\":832040"))
        .stdout(predicate::str::contains("\"type\":\"ERROR\""));
    Ok(())
}
