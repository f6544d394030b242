//! Line-delimited JSON worker: one request per input line, one reply per
//! output line, until EOF.

use anyhow::{Context, Result};
use arena_core::{Dispatcher, HostValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::runner::timed_call;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Request {
    #[serde(rename = "RUN_BENCHMARK")]
    RunBenchmark {
        #[serde(rename = "fnName")]
        fn_name: String,
        #[serde(default)]
        args: Vec<Value>,
        #[serde(default)]
        id: Value,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Reply {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RESULT")]
    Result {
        #[serde(rename = "fnName")]
        fn_name: String,
        id: Value,
        /// Elapsed wall time in milliseconds.
        time: f64,
        value: HostValue,
    },
    #[serde(rename = "ERROR")]
    Error { error: String, id: Value },
}

/// Serve requests from `input` until EOF, writing replies to `output`.
pub fn serve<R: BufRead, W: Write>(dispatcher: &Dispatcher, input: R, mut output: W) -> Result<()> {
    send(&mut output, &Reply::Ready)?;
    for line in input.lines() {
        let line = line.context("read worker request")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(dispatcher, &line);
        send(&mut output, &reply)?;
    }
    debug!(target: "arena_cli::worker", "input closed");
    Ok(())
}

pub fn handle_line(dispatcher: &Dispatcher, line: &str) -> Reply {
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(target: "arena_cli::worker", error = %err, "malformed request");
            return Reply::Error {
                error: format!("malformed request: {err}"),
                id: Value::Null,
            };
        }
    };
    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: Request = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(err) => {
            return Reply::Error {
                error: format!("unsupported request: {err}"),
                id,
            };
        }
    };

    match request {
        Request::RunBenchmark { fn_name, args, id } => {
            let args: Vec<HostValue> = args.iter().map(host_arg).collect();
            match timed_call(dispatcher, &fn_name, &args) {
                Ok((value, elapsed)) => Reply::Result {
                    fn_name,
                    id,
                    time: elapsed.as_secs_f64() * 1_000.0,
                    value,
                },
                Err(err) => Reply::Error {
                    error: err.to_string(),
                    id,
                },
            }
        }
    }
}

/// Numbers become host scalars; anything else is passed as nil.
fn host_arg(value: &Value) -> HostValue {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(HostValue::Int)
            .or_else(|| n.as_f64().map(HostValue::Float))
            .unwrap_or_default(),
        _ => HostValue::Nil,
    }
}

fn send<W: Write>(output: &mut W, reply: &Reply) -> Result<()> {
    serde_json::to_writer(&mut *output, reply).context("encode worker reply")?;
    output.write_all(b"\n")?;
    output.flush().context("flush worker reply")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::BenchRegistry;

    fn toy_dispatcher() -> Dispatcher {
        let mut registry = BenchRegistry::new();
        registry.register("answer", || Ok(HostValue::Int(42))).unwrap();
        registry.register("void", || Ok(HostValue::Nil)).unwrap();
        registry
            .register("broken", || Err(anyhow::anyhow!("kaput")))
            .unwrap();
        Dispatcher::new(registry)
    }

    fn replies(input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve(&toy_dispatcher(), input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_worker_announces_ready_then_answers() {
        let out = replies(
            "{\"type\":\"RUN_BENCHMARK\",\"fnName\":\"answer\",\"args\":[1,\"x\"],\"id\":7}\n\
             {\"type\":\"RUN_BENCHMARK\",\"fnName\":\"void\",\"id\":\"b\"}\n",
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], serde_json::json!({"type": "READY"}));
        assert_eq!(out[1]["type"], "RESULT");
        assert_eq!(out[1]["fnName"], "answer");
        assert_eq!(out[1]["id"], 7);
        assert_eq!(out[1]["value"], 42);
        assert!(out[1]["time"].as_f64().unwrap() >= 0.0);
        assert_eq!(out[2]["value"], Value::Null);
        assert_eq!(out[2]["id"], "b");
    }

    #[test]
    fn test_worker_reports_errors_and_keeps_serving() {
        let out = replies(
            "{\"type\":\"RUN_BENCHMARK\",\"fnName\":\"missing\",\"id\":1}\n\
             not json\n\
             {\"type\":\"SHUTDOWN\",\"id\":2}\n\
             {\"type\":\"RUN_BENCHMARK\",\"fnName\":\"broken\",\"id\":3}\n\
             \n\
             {\"type\":\"RUN_BENCHMARK\",\"fnName\":\"answer\",\"id\":4}\n",
        );
        assert_eq!(out.len(), 6);
        assert_eq!(out[1]["type"], "ERROR");
        assert!(out[1]["error"].as_str().unwrap().contains("missing"));
        assert_eq!(out[1]["id"], 1);
        assert_eq!(out[2]["type"], "ERROR");
        assert_eq!(out[2]["id"], Value::Null);
        assert_eq!(out[3]["type"], "ERROR");
        assert_eq!(out[3]["id"], 2);
        assert_eq!(out[4]["type"], "ERROR");
        assert!(out[4]["error"].as_str().unwrap().contains("broken"));
        assert_eq!(out[5]["type"], "RESULT");
    }

    #[test]
    fn test_host_arg_conversion() {
        assert_eq!(host_arg(&serde_json::json!(3)), HostValue::Int(3));
        assert_eq!(host_arg(&serde_json::json!(1.5)), HostValue::Float(1.5));
        assert_eq!(host_arg(&serde_json::json!("s")), HostValue::Nil);
    }
}
