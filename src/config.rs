use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config as cfg;
use serde::Deserialize;

use crate::options::LoaderOptions;

const FILE_NAMES: [&str; 4] = [
    "barrelopt.toml",
    "barrelopt.yaml",
    "barrelopt.yml",
    "barrelopt.json",
];

/// Variables `BARRELOPT_BARREL_<KEY>` override the `[barrel]` keys.
const ENV_PREFIX: &str = "BARRELOPT_BARREL";

/// The `[barrel]` section. Every key is optional.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct BarrelConfig {
    pub export_map_ident: Option<String>,
    pub placeholder: Option<String>,
    pub request_prefix: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub root: Option<String>,
}

impl BarrelConfig {
    /// Keys set in `over` win.
    fn layered(self, over: BarrelConfig) -> BarrelConfig {
        BarrelConfig {
            export_map_ident: over.export_map_ident.or(self.export_map_ident),
            placeholder: over.placeholder.or(self.placeholder),
            request_prefix: over.request_prefix.or(self.request_prefix),
            extensions: over.extensions.or(self.extensions),
            max_depth: over.max_depth.or(self.max_depth),
            root: over.root.or(self.root),
        }
    }

    /// Fills unset keys from `LoaderOptions::default()`.
    pub fn loader_options(&self) -> LoaderOptions {
        let d = LoaderOptions::default();
        LoaderOptions {
            export_map_ident: self.export_map_ident.clone().unwrap_or(d.export_map_ident),
            placeholder: self.placeholder.clone().unwrap_or(d.placeholder),
            request_prefix: self.request_prefix.clone().unwrap_or(d.request_prefix),
            max_depth: self.max_depth.unwrap_or(d.max_depth),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    barrel: Option<BarrelConfig>,
}

pub struct LoadedConfig {
    pub cfg: BarrelConfig,
    /// Directory of the config file, if one was read.
    pub dir: Option<PathBuf>,
}

impl LoadedConfig {
    /// `root`, taken relative to the config file when it is not absolute.
    pub fn root_dir(&self) -> Option<PathBuf> {
        let root = Path::new(self.cfg.root.as_deref()?);
        match &self.dir {
            Some(dir) if root.is_relative() => Some(dir.join(root)),
            _ => Some(root.to_path_buf()),
        }
    }
}

/// Reads the explicit or discovered config file, then layers the
/// `BARRELOPT_BARREL_*` environment on top.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let file = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let cwd = std::env::current_dir()?;
            FILE_NAMES
                .iter()
                .map(|name| cwd.join(name))
                .find(|p| p.is_file())
        }
    };
    let from_file = match &file {
        Some(path) => read_file(path)?,
        None => BarrelConfig::default(),
    };
    Ok(LoadedConfig {
        cfg: from_file.layered(read_env()?),
        dir: file.as_deref().and_then(Path::parent).map(Path::to_path_buf),
    })
}

fn read_file(path: &Path) -> Result<BarrelConfig> {
    let parsed = cfg::Config::builder()
        .add_source(cfg::File::from(path))
        .build()
        .with_context(|| format!("failed to read config at {}", path.display()))?
        .try_deserialize::<ConfigFile>()
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(parsed.barrel.unwrap_or_default())
}

fn read_env() -> Result<BarrelConfig> {
    // No key separator: `MAX_DEPTH` stays the flat key `max_depth`.
    let env = cfg::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("extensions");
    cfg::Config::builder()
        .add_source(env)
        .build()?
        .try_deserialize::<BarrelConfig>()
        .context("invalid BARRELOPT_BARREL_* environment")
}
