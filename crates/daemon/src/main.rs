// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! overseerd
//!
//! Background process that owns the backend registry and hosts the running
//! liaisons. Typically started once per machine; each liaison run attaches
//! to it rather than spawning its own copy of the registry.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use overseer_daemon::{config, env, lifecycle, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("overseerd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("overseerd {}", env!("CARGO_PKG_VERSION"));
                println!("overseer daemon - hosts the backend registry for running liaisons");
                println!();
                println!("USAGE:");
                println!("    overseerd");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: overseerd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let state_dir = env::state_dir()?;
    let log_path = state_dir.join("logs").join("overseerd.log");
    let log_guard = logging::setup(&log_path)?;

    info!("starting overseer daemon");

    let lock_path = state_dir.join("overseerd.lock");
    let _instance_lock = match lifecycle::acquire(&lock_path) {
        Ok(lock) => lock,
        Err(lifecycle::LifecycleError::LockHeld(path)) => {
            eprintln!("overseerd is already running (lock held at {})", path.display());
            drop(log_guard);
            std::process::exit(1);
        }
        Err(e) => {
            error!("failed to acquire instance lock: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let loaded_config = match config::load() {
        Ok(c) => c,
        Err(config::ConfigError::NotFound(_)) => {
            info!("no config file found, starting with an empty backend table");
            config::Config {
                path: state_dir.join("overseer.toml"),
                backends: Default::default(),
            }
        }
        Err(e) => {
            error!("failed to load config: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };
    info!(backends = loaded_config.backends.len(), path = %loaded_config.path.display(), "config.loaded");

    overseer_engine::registry::register_builtins();
    info!(engines = ?overseer_engine::registry::registered_engines(), "registry.ready");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("overseer daemon ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    drop(log_guard);
    Ok(())
}
