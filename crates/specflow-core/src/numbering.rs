//! Next-ordinal computation.
//!
//! Branches and feature directories are two independent lower bounds on the
//! next ordinal. Neither is trusted over the other: the next ordinal is one
//! past the highest number seen in either. Concurrent invocations can still
//! race to the same number; creation is rare and human-paced.

use crate::paths;
use crate::vcs::VcsGateway;
use std::path::Path;

/// Highest ordinal seen in each source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdinalScan {
    pub from_branches: u32,
    pub from_directories: u32,
}

impl OrdinalScan {
    pub fn next(&self) -> u32 {
        self.from_branches.max(self.from_directories) + 1
    }
}

/// Scan branches and `specs_dir`, optionally refreshing remotes first.
pub fn scan(vcs: &dyn VcsGateway, specs_dir: &Path, fetch: bool) -> OrdinalScan {
    if fetch && vcs.is_available() && !vcs.fetch_all() {
        tracing::debug!("remote fetch failed; numbering from local knowledge");
    }

    let scan = OrdinalScan {
        from_branches: max_from_branches(vcs),
        from_directories: max_from_directories(specs_dir),
    };
    tracing::debug!(
        from_branches = scan.from_branches,
        from_directories = scan.from_directories,
        "ordinal scan"
    );
    scan
}

/// The ordinal a new feature should use. Always at least 1.
pub fn compute_next(vcs: &dyn VcsGateway, specs_dir: &Path, fetch: bool) -> u32 {
    scan(vcs, specs_dir, fetch).next()
}

fn max_from_branches(vcs: &dyn VcsGateway) -> u32 {
    let Some(branches) = vcs.list_branches() else {
        return 0;
    };
    branches
        .iter()
        .filter_map(|raw| paths::leading_ordinal(normalize_branch_ref(raw)))
        .max()
        .unwrap_or(0)
}

fn max_from_directories(specs_dir: &Path) -> u32 {
    let Ok(entries) = std::fs::read_dir(specs_dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| paths::leading_ordinal(&e.file_name().to_string_lossy()))
        .max()
        .unwrap_or(0)
}

/// Reduce a `git branch -a` line to a bare branch name.
///
/// `* 003-auth` → `003-auth`, `remotes/origin/004-x` → `004-x`.
pub fn normalize_branch_ref(raw: &str) -> &str {
    let name = raw.trim_start_matches(['*', '+', ' ', '\t']).trim_end();
    match name.strip_prefix("remotes/") {
        Some(rest) => rest.split_once('/').map(|(_, b)| b).unwrap_or(rest),
        None => name,
    }
}
