//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory settings file, e.g. `.dcmfind.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Search defaults ----

/// Matcher workers when neither the config file nor the CLI set one.
pub const DEFAULT_PARALLELISM: usize = 8;

/// Upper bound on matcher workers. Each one is an OS thread.
pub const MAX_PARALLELISM: usize = 256;

/// File name pattern that matches everything.
pub const DEFAULT_FILE_PATTERN: &str = "*";

// ---- Queues ----

/// In-flight candidate paths (and console events) allowed per matcher worker. Bounds memory
/// when the walk outruns decoding.
pub const QUEUE_SLOTS_PER_WORKER: usize = 100;
