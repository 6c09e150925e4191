use super::{display, load_config};
use crate::output::print_result;
use anyhow::Context;
use serde::Serialize;
use specflow_core::{
    feature::{create_feature, FeatureRequest},
    naming::NameSynthesizer,
    vcs::GitGateway,
};
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CreateOutput {
    branch_name: String,
    spec_file: String,
    feature_num: String,
    feature_dir: String,
    has_git: bool,
    branch_created: bool,
}

pub fn run(
    root: &Path,
    description: Vec<String>,
    number: Option<u32>,
    short_name: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let vcs = GitGateway::detect(root, config.vcs.timeout());

    let request = FeatureRequest {
        description: (!description.is_empty()).then(|| description.join(" ")),
        ordinal: number,
        short_name,
    };
    let created = create_feature(root, &request, &vcs, &config, &NameSynthesizer::default())
        .context("failed to create feature")?;

    print_result(
        &CreateOutput {
            feature_num: created.feature_num(),
            spec_file: display(&created.spec_file),
            feature_dir: display(&created.feature_dir),
            has_git: created.has_vcs,
            branch_created: created.branch_created,
            branch_name: created.branch_name,
        },
        json,
    )
}
