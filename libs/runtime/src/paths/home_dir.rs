use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory.
///
/// - `Some(path)`: `~` is expanded, relative paths are joined with the current directory.
/// - `None`: `<home>/<default_subdir>` (the roaming data dir on Windows).
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(&raw)?,
        None => platform_base_dir()?.join(default_subdir),
    };

    let path = if path.is_relative() {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    } else {
        path
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }

    Ok(path)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_base_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base_dir()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

/// The user's home directory (`$HOME`, else the passwd entry). On Windows the roaming
/// application data directory, matching where per-user tools keep their files.
fn platform_base_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir();

    base.context("cannot resolve the user's home directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/feast");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".feast", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let resolved = resolve_home_dir(Some("some/dir".into()), ".feast", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/dir"));
    }

    #[test]
    fn default_lives_under_platform_home() {
        let resolved = resolve_home_dir(None, ".feast", false).unwrap();
        assert_eq!(resolved, platform_base_dir().unwrap().join(".feast"));
        assert!(resolved.is_absolute());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn tilde_expands_to_user_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(expand_tilde("~/feast/data").unwrap(), home.join("feast/data"));
        assert_eq!(expand_tilde("/srv/feast").unwrap(), PathBuf::from("/srv/feast"));
    }
}
