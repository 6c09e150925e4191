use super::{display, load_config};
use crate::output::print_result;
use anyhow::Context;
use serde::Serialize;
use specflow_core::{
    feature::{check_prerequisites, FeaturePaths, Requirements},
    vcs::GitGateway,
};
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CheckOutput {
    feature_dir: String,
    available_docs: Vec<String>,
}

pub fn run(root: &Path, requirements: Requirements, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let vcs = GitGateway::detect(root, config.vcs.timeout());
    let fp = FeaturePaths::build(root, &vcs);

    let available_docs =
        check_prerequisites(&fp, &requirements).context("prerequisites not met")?;

    print_result(
        &CheckOutput {
            feature_dir: display(&fp.feature_dir),
            available_docs,
        },
        json,
    )
}
