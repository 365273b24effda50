//! Storage operation metrics.
//!
//! Emitted through the `metrics` facade; nothing is collected unless the
//! process installs a recorder.

use std::time::Instant;

use crate::{Error, Result};

const BACKEND: &str = "sqlite";

/// Records `storage_operations_total` and `storage_operation_duration_ms`
/// for one backend call.
///
/// Failures are labelled with the error kind so that caller mistakes
/// (`not_found`, `validation`, ...) can be told apart from storage faults.
pub fn record_operation_metrics<T>(operation: &'static str, start: Instant, result: &Result<T>) {
    let status = match result {
        Ok(_) => "success",
        Err(e) => error_kind(e),
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    metrics::counter!(
        "storage_operations_total",
        "backend" => BACKEND,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "storage_operation_duration_ms",
        "backend" => BACKEND,
        "operation" => operation
    )
    .record(elapsed_ms);
}

const fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Validation { .. } => "validation",
        Error::Reference { .. } => "reference",
        Error::NotFound(_) => "not_found",
        Error::SelfReference(_) => "self_reference",
        Error::CycleDetected { .. } => "cycle",
        Error::Conflict(_) => "conflict",
        Error::InvalidInput(_) => "invalid_input",
        Error::OperationFailed { .. } => "error",
    }
}
