use crate::config::{LogSection, LoggingConfig};
use crate::paths::resolve_under;
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::{filter::FilterFn, fmt, layer::SubscriberExt, Layer, Registry};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

// -------- levels --------

/// `None` means the output is switched off.
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `crate_name` itself or a path below it.
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || target
            .strip_prefix(crate_name)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Per-target level table: named subsystems first, then the default section.
#[derive(Clone, Debug, Default)]
struct LevelTable {
    named: Vec<(String, Option<Level>)>,
    fallback: Option<Level>,
}

impl LevelTable {
    fn level_for(&self, target: &str) -> Option<Level> {
        self.named
            .iter()
            .find(|(name, _)| matches_crate_prefix(target, name))
            .map_or(self.fallback, |(_, lvl)| *lvl)
    }

    fn enabled(&self, meta: &tracing::Metadata<'_>) -> bool {
        self.level_for(meta.target())
            .is_some_and(|max| meta.level() <= &max)
    }
}

fn console_levels(cfg: &LoggingConfig) -> LevelTable {
    build_table(cfg, |s| parse_tracing_level(&s.console_level))
}

/// Sections without a file never emit to files.
fn file_levels(cfg: &LoggingConfig) -> LevelTable {
    build_table(cfg, |s| {
        if s.file.trim().is_empty() {
            None
        } else {
            parse_tracing_level(&s.file_level)
        }
    })
}

fn build_table(cfg: &LoggingConfig, level_of: impl Fn(&LogSection) -> Option<Level>) -> LevelTable {
    let mut named: Vec<(String, Option<Level>)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
        .map(|(k, v)| (k.clone(), level_of(v)))
        .collect();
    // Longest prefix wins when subsystems nest ("rsvp" vs "rsvp::api").
    named.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    LevelTable {
        named,
        fallback: cfg.get(DEFAULT_SECTION).and_then(&level_of),
    }
}

// -------- rotating file writers --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .flush()
    }
}

/// Writer that silently drops records with no destination file.
struct MaybeWriter(Option<RotWriter>);

impl Write for MaybeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to the file of the subsystem that owns its target.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(name, _)| matches_crate_prefix(target, name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeWriter(self.resolve_for(meta.target()))
    }
}

fn create_rotating_writer(
    log_path: &Path,
    section: &LogSection,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let keep = section.max_backups.unwrap_or(3);

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(keep)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg {
        if section.file.trim().is_empty() {
            continue;
        }
        let path = resolve_under(base_dir, &section.file);
        match create_rotating_writer(&path, section) {
            Ok(writer) if name == DEFAULT_SECTION => router.default = Some(writer),
            Ok(writer) => router.by_prefix.push((name.clone(), writer)),
            Err(e) => eprintln!(
                "Failed to open log file for '{}' at {}: {}",
                name,
                path.display(),
                e
            ),
        }
    }
    router.by_prefix.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    router
}

// -------- public init --------

/// Install the global subscriber described by `cfg`.
/// Relative log file paths are resolved against `base_dir` (the home dir).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records (sqlx, sea-orm) into tracing first.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let console = console_levels(cfg);
    let files = file_levels(cfg);
    let router = build_file_router(cfg, base_dir);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_ansi(std::io::stdout().is_terminal())
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(FilterFn::new(move |meta| console.enabled(meta)))
            .boxed(),
    );

    if !router.is_empty() {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router)
                .with_filter(FilterFn::new(move |meta| files.enabled(meta)))
                .boxed(),
        );
    }

    let _ = tracing::subscriber::set_global_default(Registry::default().with(layers));
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

/// Summary of which subsystems have dedicated sections, for startup logs.
pub fn describe(cfg: &LoggingConfig) -> HashMap<String, String> {
    cfg.iter()
        .map(|(k, v)| (k.clone(), format!("console={} file={}", v.console_level, v.file)))
        .collect()
}
