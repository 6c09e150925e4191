use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// VcsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsConfig {
    /// Upper bound for any single git invocation.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Refresh remote branches before numbering a new feature.
    #[serde(default = "default_fetch_remotes")]
    pub fetch_remotes: bool,
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_fetch_remotes() -> bool {
    true
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            fetch_remotes: default_fetch_remotes(),
        }
    }
}

impl VcsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// ---------------------------------------------------------------------------
// TemplateConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Spec template, relative to the repository root.
    #[serde(default = "default_spec_template")]
    pub spec: String,
}

fn default_spec_template() -> String {
    paths::SPEC_TEMPLATE.to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            spec: default_spec_template(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub vcs: VcsConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            vcs: VcsConfig::default(),
            templates: TemplateConfig::default(),
        }
    }
}

impl Config {
    /// Load `.specify/config.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn spec_template_path(&self, root: &Path) -> PathBuf {
        root.join(&self.templates.spec)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        if self.vcs.timeout_seconds == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "vcs.timeout_seconds is 0: every git call will time out".to_string(),
            });
        }

        let template = Path::new(&self.templates.spec);
        if template.is_absolute() && !template.starts_with(root) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "templates.spec points outside the repository: {}",
                    self.templates.spec
                ),
            });
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.vcs.timeout_seconds, 5);
        assert!(cfg.vcs.fetch_remotes);
        assert_eq!(cfg.templates.spec, ".specify/templates/spec-template.md");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        std::fs::write(
            dir.path().join(".specify/config.yaml"),
            "vcs:\n  fetch_remotes: false\n",
        )
        .unwrap();

        let cfg = Config::load(dir.path()).unwrap();
        assert!(!cfg.vcs.fetch_remotes);
        assert_eq!(cfg.vcs.timeout_seconds, 5);
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn timeout_is_read_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        std::fs::write(
            dir.path().join(".specify/config.yaml"),
            "vcs:\n  timeout_seconds: 12\n",
        )
        .unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.vcs.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        std::fs::write(dir.path().join(".specify/config.yaml"), "vcs: [").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn validate_flags_zero_timeout() {
        let mut cfg = Config::default();
        cfg.vcs.timeout_seconds = 0;
        let warnings = cfg.validate(Path::new("/repo"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("timeout_seconds"));
    }

    #[test]
    fn validate_flags_unknown_version_as_warning() {
        let cfg = Config {
            version: 2,
            ..Config::default()
        };
        let warnings = cfg.validate(Path::new("/repo"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_default_is_clean() {
        assert!(Config::default().validate(Path::new("/repo")).is_empty());
    }
}
