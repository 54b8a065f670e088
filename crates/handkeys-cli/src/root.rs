use handkeys_core::paths;
use std::path::{Path, PathBuf};

/// Where the gesture table and config file live for this invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    pub db: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    /// `--db` and `--config` override the files under `root`.
    pub fn resolve(root: &Path, db: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            db: db.unwrap_or_else(|| paths::db_path(root)),
            config: config.unwrap_or_else(|| paths::config_path(root)),
        }
    }
}

/// Resolve the handkeys root directory.
///
/// Priority:
/// 1. `--root` flag / `HANDKEYS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for an existing `gestures.db`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd, paths::DB_FILE).unwrap_or(cwd)
}

fn find_upward(start: &Path, file: &str) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(file).is_file() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
