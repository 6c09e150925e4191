use super::display;
use crate::output::print_result;
use serde::Serialize;
use specflow_core::resolver::PathResolver;

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ResolveOutput {
    path: String,
    exists: bool,
}

/// Resolution never fails; a missing file is reported through `EXISTS`.
pub fn run(candidate: &str, json: bool) -> anyhow::Result<()> {
    let resolved = PathResolver::from_env().resolve(candidate);
    print_result(
        &ResolveOutput {
            exists: resolved.exists(),
            path: display(&resolved),
        },
        json,
    )
}
