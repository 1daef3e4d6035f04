use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::model::ListId;
use crate::policy::{GroupValidation, ValidationPolicy};
use crate::registry::{DEFAULT_ITEMS_PER_LIST, MAX_ITEMS_PER_LIST};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DRAGBOARD_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub group: GroupConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl BoardConfig {
    /// Build the drop policy described by this config.
    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy::new(self.policy.banned_pairs.clone(), self.policy.parity_clash)
    }

    /// Reject values that parse but cannot describe a usable board.
    ///
    /// # Errors
    ///
    /// Returns an error if `seed.items_per_list` exceeds
    /// [`MAX_ITEMS_PER_LIST`].
    pub fn validate(&self) -> Result<()> {
        if self.seed.items_per_list > MAX_ITEMS_PER_LIST {
            bail!(
                "seed.items_per_list = {} exceeds the maximum of {MAX_ITEMS_PER_LIST}",
                self.seed.items_per_list
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// `(source, destination)` list pairs that are always rejected.
    #[serde(default = "default_banned_pairs")]
    pub banned_pairs: Vec<(ListId, ListId)>,
    #[serde(default = "default_true")]
    pub parity_clash: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            banned_pairs: default_banned_pairs(),
            parity_clash: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default)]
    pub validation: GroupValidation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_items_per_list")]
    pub items_per_list: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            items_per_list: default_items_per_list(),
        }
    }
}

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ConfigSource {
    Env(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub config: BoardConfig,
    pub source: ConfigSource,
}

/// Parse one TOML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid config TOML, or
/// holds out-of-range values.
pub fn load_config_file(path: &Path) -> Result<BoardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<BoardConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".dragboard/config.toml")
}

#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dragboard/config.toml"))
}

/// Resolve the effective config.
///
/// Precedence (first hit wins, files are not merged):
/// 1. `$DRAGBOARD_CONFIG`, which must exist when set.
/// 2. `<project_root>/.dragboard/config.toml`
/// 3. `<config_dir>/dragboard/config.toml`
/// 4. Built-in defaults.
///
/// # Errors
///
/// Returns an error if `$DRAGBOARD_CONFIG` points at a missing file, or if the
/// selected file fails to parse.
pub fn resolve_config(project_root: &Path) -> Result<ResolvedConfig> {
    let env_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    resolve_config_inner(env_path, project_root, user_config_path())
}

fn resolve_config_inner(
    env_path: Option<PathBuf>,
    project_root: &Path,
    user_path: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    if let Some(path) = env_path {
        if !path.exists() {
            bail!("{CONFIG_ENV} points at {}, which does not exist", path.display());
        }
        let config = load_config_file(&path)?;
        return Ok(ResolvedConfig {
            config,
            source: ConfigSource::Env(path),
        });
    }

    let project = project_config_path(project_root);
    if project.exists() {
        let config = load_config_file(&project)?;
        return Ok(ResolvedConfig {
            config,
            source: ConfigSource::Project(project),
        });
    }

    if let Some(user) = user_path.filter(|p| p.exists()) {
        let config = load_config_file(&user)?;
        return Ok(ResolvedConfig {
            config,
            source: ConfigSource::User(user),
        });
    }

    Ok(ResolvedConfig {
        config: BoardConfig::default(),
        source: ConfigSource::Default,
    })
}

fn default_true() -> bool {
    true
}

fn default_banned_pairs() -> Vec<(ListId, ListId)> {
    vec![(ListId::First, ListId::Third)]
}

const fn default_items_per_list() -> usize {
    DEFAULT_ITEMS_PER_LIST
}
