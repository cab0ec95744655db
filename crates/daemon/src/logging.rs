// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup: a non-blocking file appender plus an env-filter,
//! so a long-running daemon doesn't stall on disk I/O under load.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::lifecycle::LifecycleError;

/// Initialize the global tracing subscriber, writing to `log_path`. The
/// returned guard must be held for the lifetime of the process — dropping it
/// stops the background flush thread.
pub fn setup(log_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().ok_or(LifecycleError::NoLogDir)?,
        log_path.file_name().ok_or(LifecycleError::NoLogDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
