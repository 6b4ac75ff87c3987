use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Platform base directory that holds the per-user `home_dir`.
/// Windows: `%APPDATA%`, everything else: `$HOME`.
fn platform_base() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

/// Expand a leading `~` against the platform base directory.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_base();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve the application home directory into an absolute path.
///
/// `None` (or an empty string) selects `<platform base>/<default_subdir>`.
/// Relative paths are resolved against the current working directory.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let raw = configured
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut path = match raw {
        Some(p) => expand_tilde(&p)?,
        None => platform_base()?.join(default_subdir),
    };

    if path.is_relative() {
        path = std::env::current_dir()
            .context("cannot read current directory")?
            .join(path);
    }

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }

    Ok(path)
}

/// Resolve `file` against `base_dir` unless it is already absolute.
pub fn resolve_under(base_dir: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_dir_is_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.exists());
    }

    #[test]
    fn relative_file_is_joined_to_base() {
        let base = Path::new("/srv/wedding");
        assert_eq!(
            resolve_under(base, "logs/app.log"),
            PathBuf::from("/srv/wedding/logs/app.log")
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_file_is_kept() {
        let base = Path::new("/srv/wedding");
        assert_eq!(
            resolve_under(base, "/var/log/app.log"),
            PathBuf::from("/var/log/app.log")
        );
    }
}
