use super::{display, load_config};
use crate::output::print_result;
use serde::Serialize;
use specflow_core::{feature::FeaturePaths, vcs::GitGateway};
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct PathsOutput {
    repo_root: String,
    branch: String,
    has_git: bool,
    feature_dir: String,
    feature_spec: String,
    impl_plan: String,
    tasks: String,
    design_file: String,
    /// The feature directory, under the name agent prompts expect.
    specs_dir: String,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let vcs = GitGateway::detect(root, config.vcs.timeout());
    let fp = FeaturePaths::build(root, &vcs);

    print_result(
        &PathsOutput {
            repo_root: display(&fp.repo_root),
            branch: fp.current_branch.clone(),
            has_git: fp.has_vcs,
            feature_dir: display(&fp.feature_dir),
            feature_spec: display(&fp.spec_file),
            impl_plan: display(&fp.plan_file),
            tasks: display(&fp.tasks_file),
            design_file: display(&fp.design_file),
            specs_dir: display(&fp.feature_dir),
        },
        json,
    )
}
