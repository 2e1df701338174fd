// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! File logging. The terminal belongs to the UI, so log lines go to a rotating
//! file in the data directory instead of stderr.

use anyhow::{Context, Result, bail};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::env;
use std::path::Path;

pub const LEVEL_ENV: &str = "CHECKIT_LOG";
pub const DEFAULT_LEVEL: &str = "info";

const LOG_FILE_BASENAME: &str = "checkit";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => bail!("unsupported log level `{other}`; expected off|trace|debug|info|warn|error"),
    }
}

/// `CHECKIT_LOG` wins over the config file, which wins over the default.
pub fn resolve_level(config_level: Option<&str>) -> Result<&'static str> {
    if let Some(raw) = env::var_os(LEVEL_ENV) {
        let raw = raw.to_string_lossy();
        return normalize_level(&raw).with_context(|| format!("invalid {LEVEL_ENV}"));
    }
    match config_level {
        Some(level) => normalize_level(level),
        None => Ok(DEFAULT_LEVEL),
    }
}

/// Starts the file logger. Keep the returned handle alive for the whole run;
/// dropping it flushes and stops logging.
pub fn init(level: &'static str, log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;
    let handle = Logger::try_with_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .with_context(|| format!("start logging in {}", log_dir.display()))?;
    log::info!(
        "checkit {} starting; level={level} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LEVEL, LEVEL_ENV, normalize_level, resolve_level};
    use crate::test_support::env_lock;
    use anyhow::Result;

    #[test]
    fn normalize_accepts_known_levels() -> Result<()> {
        assert_eq!(normalize_level("INFO")?, "info");
        assert_eq!(normalize_level(" warning ")?, "warn");
        assert_eq!(normalize_level("off")?, "off");
        Ok(())
    }

    #[test]
    fn normalize_rejects_unknown_level() {
        let error = normalize_level("loud").expect_err("unknown level");
        assert!(error.to_string().contains("expected off|trace"));
    }

    #[test]
    fn env_level_overrides_config() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(LEVEL_ENV, "debug");
        }
        let resolved = resolve_level(Some("error"));
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(LEVEL_ENV);
        }
        assert_eq!(resolved?, "debug");
        Ok(())
    }

    #[test]
    fn config_level_then_default() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(LEVEL_ENV);
        }
        assert_eq!(resolve_level(Some("warn"))?, "warn");
        assert_eq!(resolve_level(None)?, DEFAULT_LEVEL);
        Ok(())
    }
}
