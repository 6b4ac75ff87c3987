//! Database connection for the server: backend detection, sqlite path
//! resolution and the SeaORM pool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use runtime::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use url::Url;

pub const MEMORY_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Detect DB backend from the URL scheme.
pub fn detect_backend(dsn: &str) -> Result<Backend> {
    let raw = dsn.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_memory_dsn(raw) {
        return Ok(Backend::Sqlite);
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps in-memory DSNs as `sqlite::memory:`.
/// - Normalizes backslashes into forward slashes.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    // sqlx only creates the file when asked to
    match query {
        Some(q) => {
            out.push('?');
            out.push_str(q);
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// DSN the server will actually connect to: `--mock` wins, sqlite paths are
/// resolved under `base_dir`.
pub fn resolve_dsn(cfg: &DatabaseConfig, base_dir: &Path, mock: bool) -> Result<String> {
    if mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let dsn = cfg.url.trim();
    match detect_backend(dsn)? {
        Backend::Sqlite if dsn.starts_with("sqlite://") => {
            absolutize_sqlite_dsn(dsn, base_dir, true)
        }
        _ => Ok(dsn.to_string()),
    }
}

pub async fn connect(cfg: &DatabaseConfig, dsn: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_string());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    // Every pooled connection to :memory: would see its own empty database
    if is_memory_dsn(dsn) {
        opts.max_connections(1);
    } else if let Some(max) = cfg.max_conns {
        opts.max_connections(max);
    }

    if let Some(ms) = cfg.busy_timeout_ms {
        let timeout = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(timeout));
    }

    tracing::info!(backend = ?detect_backend(dsn)?, "Connecting to database: {}", redact(dsn));
    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {}", redact(dsn)))
}

/// Hide the password part of a DSN before logging it.
pub fn redact(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => dsn.to_string(),
    }
}
