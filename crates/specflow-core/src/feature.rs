use crate::config::Config;
use crate::error::{Result, SpecflowError};
use crate::naming::{clean_branch_name, NameSynthesizer};
use crate::numbering;
use crate::paths;
use crate::template::{self, TemplateOutcome};
use crate::vcs::VcsGateway;
use std::path::{Path, PathBuf};

/// Names the current feature when no VCS is available.
pub const FEATURE_ENV: &str = "SPECFLOW_FEATURE";

// ---------------------------------------------------------------------------
// FeaturePaths
// ---------------------------------------------------------------------------

/// Candidate locations of the current feature's documents.
///
/// Nothing here is checked for existence; that is the caller's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePaths {
    pub repo_root: PathBuf,
    pub current_branch: String,
    pub has_vcs: bool,
    pub feature_dir: PathBuf,
    pub spec_file: PathBuf,
    pub plan_file: PathBuf,
    pub tasks_file: PathBuf,
    pub design_file: PathBuf,
}

impl FeaturePaths {
    /// Build from the checked-out branch, honouring `SPECFLOW_FEATURE` when
    /// there is no VCS.
    pub fn build(root: &Path, vcs: &dyn VcsGateway) -> Self {
        let feature_override = std::env::var(FEATURE_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self::build_with_override(root, vcs, feature_override)
    }

    pub fn build_with_override(
        root: &Path,
        vcs: &dyn VcsGateway,
        feature_override: Option<String>,
    ) -> Self {
        // A detached HEAD or a failed query counts as no VCS
        let branch = if vcs.is_available() {
            vcs.current_branch().filter(|b| !b.is_empty())
        } else {
            None
        };
        let has_vcs = branch.is_some();
        let current_branch = branch.or(feature_override).unwrap_or_default();

        let specs = paths::specs_dir(root);
        let feature_dir = if current_branch.is_empty() {
            latest_feature_dir(&specs).unwrap_or(specs)
        } else {
            find_feature_dir(&specs, &current_branch)
        };

        Self {
            repo_root: root.to_path_buf(),
            current_branch,
            has_vcs,
            spec_file: feature_dir.join(paths::SPEC_FILE),
            plan_file: feature_dir.join(paths::PLAN_FILE),
            tasks_file: feature_dir.join(paths::TASKS_FILE),
            design_file: feature_dir.join(paths::DESIGN_FILE),
            feature_dir,
        }
    }
}

/// Directory under `specs` sharing the branch's ordinal.
///
/// Matching is by ordinal only: a feature's directory keeps its original
/// slug even when the branch is later renamed. Branches without an ordinal,
/// or with no matching directory, map to `specs/<branch>`.
pub fn find_feature_dir(specs: &Path, branch: &str) -> PathBuf {
    let exact = specs.join(branch);
    let Some(ordinal) = paths::leading_ordinal(branch) else {
        return exact;
    };

    let mut matches = numbered_dirs(specs)
        .into_iter()
        .filter(|(n, _)| *n == ordinal)
        .map(|(_, name)| name)
        .collect::<Vec<_>>();
    matches.sort();

    match matches.as_slice() {
        [] => exact,
        [only] => specs.join(only),
        [first, ..] => {
            tracing::warn!(
                ?matches,
                "several spec directories share ordinal {}; using {first}",
                paths::format_ordinal(ordinal)
            );
            specs.join(first)
        }
    }
}

/// Highest-numbered feature directory, if any.
pub fn latest_feature_dir(specs: &Path) -> Option<PathBuf> {
    numbered_dirs(specs)
        .into_iter()
        .max()
        .map(|(_, name)| specs.join(name))
}

fn numbered_dirs(specs: &Path) -> Vec<(u32, String)> {
    let Ok(entries) = std::fs::read_dir(specs) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            paths::leading_ordinal(&name).map(|n| (n, name))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FeatureRequest {
    pub description: Option<String>,
    pub ordinal: Option<u32>,
    pub short_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedFeature {
    pub branch_name: String,
    pub ordinal: u32,
    pub slug: String,
    pub feature_dir: PathBuf,
    pub spec_file: PathBuf,
    pub has_vcs: bool,
    pub branch_created: bool,
    pub template: TemplateOutcome,
}

impl CreatedFeature {
    pub fn feature_num(&self) -> String {
        paths::format_ordinal(self.ordinal)
    }
}

/// Number, name and scaffold a new feature.
///
/// A missing VCS or a failed branch creation is not an error: the feature
/// directory is still created and numbered from what is on disk.
pub fn create_feature(
    root: &Path,
    request: &FeatureRequest,
    vcs: &dyn VcsGateway,
    config: &Config,
    synth: &NameSynthesizer,
) -> Result<CreatedFeature> {
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let short_name = request
        .short_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let slug = match (short_name, description) {
        (Some(name), _) => clean_branch_name(name),
        (None, Some(desc)) => synth.generate(desc),
        (None, None) => return Err(SpecflowError::MissingDescription),
    };
    if slug.is_empty() {
        let source = short_name.or(description).unwrap_or_default();
        return Err(SpecflowError::EmptySlug(source.to_string()));
    }

    let specs = paths::specs_dir(root);
    let ordinal = match request.ordinal {
        Some(0) => return Err(SpecflowError::InvalidOrdinal(0)),
        Some(n) => n,
        None => numbering::compute_next(vcs, &specs, config.vcs.fetch_remotes),
    };

    let branch_name = synth.truncate_for_byte_limit(&format!(
        "{}-{slug}",
        paths::format_ordinal(ordinal)
    ));
    if !paths::is_canonical_branch(&branch_name) {
        tracing::warn!("branch name '{branch_name}' does not have the NNN-slug shape");
    }

    let has_vcs = vcs.is_available();
    let branch_created = if has_vcs {
        let created = vcs.create_branch(&branch_name);
        if !created {
            tracing::warn!("could not create branch '{branch_name}'; continuing without it");
        }
        created
    } else {
        tracing::warn!("git repository not detected; skipped branch creation for {branch_name}");
        false
    };

    let feature_dir = paths::feature_dir(root, &branch_name);
    crate::io::ensure_dir(&feature_dir)?;

    let spec_file = feature_dir.join(paths::SPEC_FILE);
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let template = template::write_from_template(
        &config.spec_template_path(root),
        &spec_file,
        &[
            ("DATE", date.as_str()),
            ("FEATURE", branch_name.as_str()),
            ("DESCRIPTION", description.unwrap_or_default()),
        ],
    )?;

    Ok(CreatedFeature {
        branch_name,
        ordinal,
        slug,
        feature_dir,
        spec_file,
        has_vcs,
        branch_created,
        template,
    })
}

// ---------------------------------------------------------------------------
// Prerequisites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct Requirements {
    pub plan: bool,
    pub tasks: bool,
    /// List `tasks.md` among the available documents when present.
    pub include_tasks: bool,
}

/// Verify the current feature is ready for the next workflow step and list
/// the optional documents that exist.
pub fn check_prerequisites(fp: &FeaturePaths, req: &Requirements) -> Result<Vec<String>> {
    if fp.has_vcs {
        if !paths::is_feature_branch(&fp.current_branch) {
            return Err(SpecflowError::NotOnFeatureBranch(fp.current_branch.clone()));
        }
    } else {
        tracing::warn!("no current git branch; skipped branch validation");
    }

    if !fp.feature_dir.is_dir() {
        return Err(SpecflowError::FeatureDirMissing(fp.feature_dir.clone()));
    }

    let required = [
        (req.plan, &fp.plan_file, paths::PLAN_FILE),
        (req.tasks, &fp.tasks_file, paths::TASKS_FILE),
    ];
    for (needed, file, name) in required {
        if needed && !file.is_file() {
            return Err(SpecflowError::MissingDocument {
                name: name.to_string(),
                path: fp.feature_dir.clone(),
            });
        }
    }

    let mut docs: Vec<String> = paths::OPTIONAL_DOCS
        .iter()
        .filter(|d| fp.feature_dir.join(d).is_file())
        .map(|d| d.to_string())
        .collect();

    let contracts = fp.feature_dir.join(paths::CONTRACTS_DIR);
    let has_contracts = std::fs::read_dir(&contracts)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if has_contracts {
        docs.push(format!("{}/", paths::CONTRACTS_DIR));
    }

    if req.include_tasks && fp.tasks_file.is_file() {
        docs.push(paths::TASKS_FILE.to_string());
    }

    Ok(docs)
}
