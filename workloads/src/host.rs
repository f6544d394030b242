//! C ABI for embedding the workloads in a foreign host.
//!
//! The host calls `arena_host_init` once, then dispatches by name. Every
//! function returns a status code instead of unwinding across the boundary,
//! and a panicking workload counts as a failed one: `0` success, `-1` unknown name or index, `-2` workload failure, `-3` the
//! dispatcher is not (or could not be) initialized.

use arena_core::{DispatchError, Dispatcher, HostValue, dispatch};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, error, warn};

pub const STATUS_OK: i32 = 0;
pub const STATUS_NOT_FOUND: i32 = -1;
pub const STATUS_WORKLOAD_FAILED: i32 = -2;
pub const STATUS_UNINITIALIZED: i32 = -3;

#[unsafe(no_mangle)]
pub extern "C" fn arena_host_init() -> i32 {
    match crate::global_dispatcher() {
        Ok(dispatcher) => {
            debug!(target: "arena::host", entries = dispatcher.registry().len(), "host initialized");
            STATUS_OK
        }
        Err(err) => {
            error!(target: "arena::host", error = %err, "host initialization failed");
            STATUS_UNINITIALIZED
        }
    }
}

/// Run the workload named by the UTF-8 bytes at `name_ptr`.
///
/// On success the result kind (0 nil, 1 int, 2 float) and its value as `f64`
/// are written through the out pointers when they are non-null.
#[unsafe(no_mangle)]
pub extern "C" fn arena_host_dispatch(
    name_ptr: *const i8,
    name_len: i64,
    out_kind: *mut i32,
    out_value: *mut f64,
) -> i32 {
    let Some(dispatcher) = dispatch::global() else {
        warn!(target: "arena::host", "dispatch before arena_host_init");
        return STATUS_UNINITIALIZED;
    };
    let name = read_string(name_ptr, name_len);
    match guarded_call(dispatcher, &name) {
        Ok(value) => {
            write_value(value, out_kind, out_value);
            STATUS_OK
        }
        Err(err) => {
            warn!(target: "arena::host", name = %name, error = %err, "dispatch failed");
            err.status_code()
        }
    }
}

/// Number of dispatchable names, or `-3` before initialization.
#[unsafe(no_mangle)]
pub extern "C" fn arena_host_benchmark_count() -> i64 {
    match dispatch::global() {
        Some(dispatcher) => dispatcher.registry().names().len() as i64,
        None => STATUS_UNINITIALIZED as i64,
    }
}

/// Copy the `index`-th name (sorted order) into `buf`, truncating at `cap`.
///
/// Returns the full byte length of the name so the host can retry with a
/// larger buffer; a null `buf` only queries the length.
#[unsafe(no_mangle)]
pub extern "C" fn arena_host_benchmark_name(index: i64, buf: *mut u8, cap: i64) -> i64 {
    let Some(dispatcher) = dispatch::global() else {
        return STATUS_UNINITIALIZED as i64;
    };
    let names = dispatcher.registry().names();
    let Some(name) = usize::try_from(index).ok().and_then(|i| names.get(i)) else {
        return STATUS_NOT_FOUND as i64;
    };
    let bytes = name.as_bytes();
    if !buf.is_null() && cap > 0 {
        let n = bytes.len().min(cap as usize);
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, n) };
    }
    bytes.len() as i64
}

/// Status code for a dispatch outcome, for hosts that wrap [`Dispatcher`]
/// directly instead of going through the C entry points.
pub fn status_of(result: &Result<HostValue, DispatchError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(err) => err.status_code(),
    }
}

/// Dispatch through an explicit dispatcher and fill the out pointers.
pub fn dispatch_into(
    dispatcher: &Dispatcher,
    name: &str,
    out_kind: *mut i32,
    out_value: *mut f64,
) -> i32 {
    let result = guarded_call(dispatcher, name);
    if let Ok(value) = result {
        write_value(value, out_kind, out_value);
    }
    status_of(&result)
}

/// Dispatch with panics turned into [`DispatchError::Workload`].
fn guarded_call(dispatcher: &Dispatcher, name: &str) -> Result<HostValue, DispatchError> {
    catch_unwind(AssertUnwindSafe(|| dispatcher.call(name))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(target: "arena::host", name, panic = %message, "workload panicked");
        Err(DispatchError::Workload {
            name: name.to_string(),
            source: anyhow::anyhow!("panicked: {message}"),
        })
    })
}

fn write_value(value: HostValue, out_kind: *mut i32, out_value: *mut f64) {
    if !out_kind.is_null() {
        unsafe { *out_kind = value.kind_code() };
    }
    if !out_value.is_null() {
        unsafe { *out_value = value.as_f64().unwrap_or(0.0) };
    }
}

fn read_string(ptr: *const i8, len: i64) -> String {
    if len <= 0 || ptr.is_null() {
        return String::new();
    }
    let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize) };
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
