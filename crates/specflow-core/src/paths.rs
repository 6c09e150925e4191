use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MARKER_DIR: &str = ".specify";
pub const GIT_MARKER: &str = ".git";
pub const CONFIG_FILE: &str = ".specify/config.yaml";
pub const SPEC_TEMPLATE: &str = ".specify/templates/spec-template.md";
pub const SPECS_DIR: &str = "specs";

pub const SPEC_FILE: &str = "spec.md";
pub const PLAN_FILE: &str = "plan.md";
pub const TASKS_FILE: &str = "tasks.md";
pub const DESIGN_FILE: &str = "design.md";

/// Optional documents an agent may read once a plan exists.
pub const OPTIONAL_DOCS: &[&str] = &["research.md", "data-model.md", "quickstart.md"];
pub const CONTRACTS_DIR: &str = "contracts";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

pub fn feature_dir(root: &Path, name: &str) -> PathBuf {
    specs_dir(root).join(name)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Ordinal prefixes
// ---------------------------------------------------------------------------

static ORDINAL_RE: OnceLock<Regex> = OnceLock::new();
static BRANCH_RE: OnceLock<Regex> = OnceLock::new();

fn ordinal_re() -> &'static Regex {
    ORDINAL_RE.get_or_init(|| Regex::new(r"^([0-9]{3})-").unwrap())
}

fn branch_re() -> &'static Regex {
    BRANCH_RE.get_or_init(|| Regex::new(r"^[0-9]{3}-[a-z0-9]+(-[a-z0-9]+)*$").unwrap())
}

/// Parse the `NNN-` ordinal at the start of a branch or directory name.
///
/// The digit run is always read as base-10, so `010` is ten.
pub fn leading_ordinal(name: &str) -> Option<u32> {
    let caps = ordinal_re().captures(name)?;
    caps[1].parse().ok()
}

/// True when `name` starts with a three-digit ordinal prefix.
pub fn is_feature_branch(name: &str) -> bool {
    ordinal_re().is_match(name)
}

/// True when `name` is a fully well-formed feature branch name.
pub fn is_canonical_branch(name: &str) -> bool {
    branch_re().is_match(name)
}

/// Render an ordinal as the zero-padded `FEATURE_NUM` string.
pub fn format_ordinal(ordinal: u32) -> String {
    format!("{ordinal:03}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
