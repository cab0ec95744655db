// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide map from engine id to its [`BackendRuntime`] capability
//! record. Registration is global and must be deterministic and idempotent;
//! a duplicate id is a programmer error caught at registration time, not a
//! runtime condition callers are expected to recover from.

use overseer_adapters::BackendRuntime;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::OnceLock;

fn registry() -> &'static RwLock<HashMap<&'static str, &'static BackendRuntime>> {
    static REGISTRY: OnceLock<RwLock<HashMap<&'static str, &'static BackendRuntime>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a backend under its `engine` id.
///
/// # Panics
/// Panics if `engine` is already registered.
pub fn register(runtime: &'static BackendRuntime) {
    let mut map = registry().write();
    if map.contains_key(runtime.engine) {
        panic!("duplicate backend registration for engine {:?}", runtime.engine);
    }
    map.insert(runtime.engine, runtime);
}

pub fn lookup(engine: &str) -> Option<&'static BackendRuntime> {
    registry().read().get(engine).copied()
}

pub fn registered_engines() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = registry().read().keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Registers the built-in subprocess backends (`kimi`, `claude`). Idempotent:
/// a backend already present (e.g. registered by a previous call in the same
/// process) is left untouched rather than re-registered.
pub fn register_builtins() {
    for runtime in overseer_adapters::runner::backends::builtins() {
        if lookup(runtime.engine).is_none() {
            register(runtime);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
