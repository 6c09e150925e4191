use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecflowError {
    #[error("no repository root found above {0}: expected a .specify/ or .git directory")]
    RootNotFound(PathBuf),

    #[error("a feature description or --short-name is required")]
    MissingDescription,

    #[error("'{0}' does not yield a usable feature name; pass --short-name")]
    EmptySlug(String),

    #[error("invalid feature number {0}: must be 1 or greater")]
    InvalidOrdinal(u32),

    #[error("not on a feature branch: '{0}' (expected a name like 001-feature-name)")]
    NotOnFeatureBranch(String),

    #[error("feature directory not found: {0}")]
    FeatureDirMissing(PathBuf),

    #[error("{name} not found in {}", path.display())]
    MissingDocument { name: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SpecflowError>;
