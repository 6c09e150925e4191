//! Defensive path resolution.
//!
//! Callers (agents, mostly) hand us paths that are relative to the wrong
//! directory, carry the workspace root twice, or point at a checkout that
//! does not exist here. [`PathResolver::resolve`] walks a short, fixed list
//! of guesses and returns the first one present on disk. It never fails: if
//! nothing matches, the caller gets the normalized absolute form of what it
//! passed in and decides for itself what "missing" means.

use crate::paths;
use std::path::{Component, Path, PathBuf};

pub const WORKSPACE_ENV: &str = "SPECFLOW_WORKSPACE";

/// Environment-derived guesses for the workspace root, in priority order.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceHints {
    pub working_dir: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl WorkspaceHints {
    pub fn from_env() -> Self {
        Self {
            working_dir: std::env::var_os("PWD").map(PathBuf::from),
            workspace: std::env::var_os(WORKSPACE_ENV).map(PathBuf::from),
            home: home::home_dir(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    workspace: PathBuf,
    cwd: PathBuf,
}

impl PathResolver {
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(WorkspaceHints::from_env(), cwd)
    }

    /// The first hint naming an existing directory becomes the workspace;
    /// `cwd` is the last resort.
    pub fn new(hints: WorkspaceHints, cwd: PathBuf) -> Self {
        let cwd = normalize(&cwd);
        let workspace = [hints.working_dir, hints.workspace, hints.home]
            .into_iter()
            .flatten()
            .map(|p| normalize(&cwd.join(p)))
            .find(|p| p.is_dir())
            .unwrap_or_else(|| cwd.clone());
        Self { workspace, cwd }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Best guess at where `candidate` really lives. Never empty.
    pub fn resolve(&self, candidate: impl AsRef<Path>) -> PathBuf {
        let raw = candidate.as_ref();

        if raw.is_absolute() && raw.exists() {
            return canonical(raw);
        }

        let cleaned = self
            .strip_duplicate_root(raw)
            .unwrap_or_else(|| raw.to_path_buf());

        if let Some(found) = self.fallback_candidates(&cleaned).into_iter().find(|p| p.exists()) {
            tracing::debug!(
                candidate = %raw.display(),
                resolved = %found.display(),
                "resolved path"
            );
            return canonical(&found);
        }

        tracing::debug!(candidate = %raw.display(), "no existing path matched");
        normalize(&self.cwd.join(raw))
    }

    /// Ordered guesses for `candidate`; first existing wins.
    ///
    /// 1. the candidate as given (relative to the process directory)
    /// 2. the candidate under the workspace root
    /// 3. `specs/<file name>` under the workspace root
    /// 4. the candidate's tail from its last `specs` component, under the
    ///    workspace root (paths copied from another checkout)
    fn fallback_candidates(&self, candidate: &Path) -> Vec<PathBuf> {
        let mut out = vec![self.cwd.join(candidate)];

        let relative = strip_root(candidate);
        if !relative.as_os_str().is_empty() {
            out.push(self.workspace.join(&relative));
        }

        if let Some(name) = candidate.file_name() {
            out.push(self.workspace.join(paths::SPECS_DIR).join(name));
        }

        if let Some(tail) = specs_tail(candidate) {
            out.push(self.workspace.join(tail));
        }

        out
    }

    /// `/ws/ws/specs/x` → `/ws/specs/x`. Also catches the relative
    /// variant `ws/ws/specs/x` where the leading slash got lost.
    fn strip_duplicate_root(&self, raw: &Path) -> Option<PathBuf> {
        let ws_relative = strip_root(&self.workspace);
        if ws_relative.as_os_str().is_empty() {
            return None;
        }
        let rest = raw
            .strip_prefix(&self.workspace)
            .or_else(|_| raw.strip_prefix(&ws_relative))
            .ok()?;
        let rest = rest.strip_prefix(&ws_relative).ok()?;
        Some(self.workspace.join(rest))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn canonical(p: &Path) -> PathBuf {
    std::fs::canonicalize(p).unwrap_or_else(|_| normalize(p))
}

/// Lexically clean a path: drop `.` segments and fold `..` into their parent.
/// Does not touch the filesystem.
pub fn normalize(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in p.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn strip_root(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

fn specs_tail(p: &Path) -> Option<PathBuf> {
    let components: Vec<Component> = p.components().collect();
    let idx = components
        .iter()
        .rposition(|c| c.as_os_str() == paths::SPECS_DIR)?;
    Some(components[idx..].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        workspace: TempDir,
        elsewhere: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let workspace = TempDir::new().unwrap();
            let feature = workspace.path().join("specs/001-auth");
            std::fs::create_dir_all(&feature).unwrap();
            std::fs::write(feature.join("spec.md"), "# spec").unwrap();
            std::fs::write(feature.join("plan.md"), "# plan").unwrap();
            std::fs::write(workspace.path().join("specs/notes.md"), "").unwrap();
            Self {
                workspace,
                elsewhere: TempDir::new().unwrap(),
            }
        }

        fn ws(&self) -> PathBuf {
            std::fs::canonicalize(self.workspace.path()).unwrap()
        }

        fn resolver(&self) -> PathResolver {
            PathResolver::new(
                WorkspaceHints {
                    workspace: Some(self.ws()),
                    ..WorkspaceHints::default()
                },
                std::fs::canonicalize(self.elsewhere.path()).unwrap(),
            )
        }
    }

    #[test]
    fn existing_absolute_path_is_returned() {
        let fx = Fixture::new();
        let spec = fx.ws().join("specs/001-auth/spec.md");
        assert_eq!(fx.resolver().resolve(&spec), spec);
    }

    #[test]
    fn relative_path_is_found_under_workspace() {
        let fx = Fixture::new();
        assert_eq!(
            fx.resolver().resolve("specs/001-auth/spec.md"),
            fx.ws().join("specs/001-auth/spec.md")
        );
    }

    #[test]
    fn leading_slash_on_workspace_relative_path() {
        let fx = Fixture::new();
        assert_eq!(
            fx.resolver().resolve("/specs/001-auth/plan.md"),
            fx.ws().join("specs/001-auth/plan.md")
        );
    }

    #[test]
    fn doubled_workspace_prefix_is_collapsed() {
        let fx = Fixture::new();
        let ws = fx.ws();
        let doubled = ws.join(strip_root(&ws)).join("specs/001-auth/spec.md");
        assert_eq!(fx.resolver().resolve(&doubled), ws.join("specs/001-auth/spec.md"));
    }

    #[test]
    fn doubled_prefix_without_leading_slash() {
        let fx = Fixture::new();
        let ws = fx.ws();
        let rel = strip_root(&ws);
        let doubled = rel.join(&rel).join("specs/001-auth/plan.md");
        assert_eq!(fx.resolver().resolve(&doubled), ws.join("specs/001-auth/plan.md"));
    }

    #[test]
    fn bare_file_name_falls_back_to_specs_dir() {
        let fx = Fixture::new();
        assert_eq!(
            fx.resolver().resolve("some/wrong/place/notes.md"),
            fx.ws().join("specs/notes.md")
        );
    }

    #[test]
    fn path_from_another_checkout_is_rebased() {
        let fx = Fixture::new();
        assert_eq!(
            fx.resolver()
                .resolve("/home/someone/else/project/specs/001-auth/spec.md"),
            fx.ws().join("specs/001-auth/spec.md")
        );
    }

    #[test]
    fn missing_path_returns_normalized_original() {
        let fx = Fixture::new();
        let cwd = std::fs::canonicalize(fx.elsewhere.path()).unwrap();
        assert_eq!(
            fx.resolver().resolve("docs/./draft/../missing.md"),
            cwd.join("docs/missing.md")
        );
    }

    #[test]
    fn never_empty_for_odd_input() {
        let fx = Fixture::new();
        let r = fx.resolver();
        for input in ["", ".", "..", "../../..", "/", "////", "\u{0}bad", "a/../.."] {
            let out = r.resolve(input);
            assert!(!out.as_os_str().is_empty(), "empty result for {input:?}");
        }
    }

    #[test]
    fn first_existing_hint_wins() {
        let fx = Fixture::new();
        let home = TempDir::new().unwrap();
        let r = PathResolver::new(
            WorkspaceHints {
                working_dir: Some(fx.elsewhere.path().join("gone")),
                workspace: Some(fx.ws()),
                home: Some(home.path().to_path_buf()),
            },
            PathBuf::from("/"),
        );
        assert_eq!(r.workspace(), fx.ws());
    }

    #[test]
    fn falls_back_to_cwd_without_hints() {
        let fx = Fixture::new();
        let r = PathResolver::new(WorkspaceHints::default(), fx.ws());
        assert_eq!(r.workspace(), fx.ws());
    }

    #[test]
    fn normalize_examples() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }
}
