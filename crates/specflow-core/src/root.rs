use crate::error::{Result, SpecflowError};
use crate::paths;
use std::path::{Path, PathBuf};

/// Resolve the repository root.
///
/// Priority:
/// 1. `--root` flag / `SPECFLOW_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for `.specify/`
/// 3. Walk upward from `start` looking for `.git`
///
/// Finding nothing is fatal: no later step means anything without a root.
pub fn locate_root(explicit: Option<&Path>, start: &Path) -> Result<PathBuf> {
    if let Some(p) = explicit {
        if p.is_dir() {
            return Ok(absolute(p));
        }
        return Err(SpecflowError::RootNotFound(p.to_path_buf()));
    }

    let start = absolute(start);

    if let Some(dir) = find_upward(&start, |d| d.join(paths::MARKER_DIR).is_dir()) {
        return Ok(dir);
    }

    // .git is a file inside worktrees, so accept either shape
    if let Some(dir) = find_upward(&start, |d| d.join(paths::GIT_MARKER).exists()) {
        return Ok(dir);
    }

    Err(SpecflowError::RootNotFound(start))
}

fn find_upward(start: &Path, is_root: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_root(*dir))
        .map(Path::to_path_buf)
}

fn absolute(p: &Path) -> PathBuf {
    std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        let result = locate_root(Some(dir.path()), &dir.path().join("nested")).unwrap();
        assert_eq!(result, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn explicit_root_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = locate_root(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, SpecflowError::RootNotFound(_)));
    }

    #[test]
    fn finds_marker_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        let result = locate_root(None, &subdir).unwrap();
        assert_eq!(result, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn marker_dir_beats_outer_git() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let inner = dir.path().join("packages/app");
        std::fs::create_dir_all(inner.join(".specify")).unwrap();

        let result = locate_root(None, &inner).unwrap();
        assert_eq!(result, std::fs::canonicalize(&inner).unwrap());
    }

    #[test]
    fn falls_back_to_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let subdir = dir.path().join("a/b");
        std::fs::create_dir_all(&subdir).unwrap();

        let result = locate_root(None, &subdir).unwrap();
        assert_eq!(result, std::fs::canonicalize(dir.path()).unwrap());
    }
}
