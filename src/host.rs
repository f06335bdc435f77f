use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::BarrelError;
use crate::loader::ModuleHost;

pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "tsx"];

/// Serves files that already hold transform output, straight from disk.
#[derive(Debug, Clone)]
pub struct FsHost {
    root: Option<PathBuf>,
    extensions: Vec<String>,
}

impl Default for FsHost {
    fn default() -> Self {
        Self::new(None, Vec::new())
    }
}

impl FsHost {
    /// Empty `extensions` falls back to `DEFAULT_EXTENSIONS`.
    pub fn new(root: Option<PathBuf>, extensions: Vec<String>) -> Self {
        let extensions = if extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            extensions
        };
        Self { root, extensions }
    }

    fn absolute(&self, resource_path: &str) -> PathBuf {
        let p = Path::new(resource_path);
        match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }

    fn locate(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }
        for ext in &self.extensions {
            let with_ext = PathBuf::from(format!("{}.{}", candidate.display(), ext));
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }
        for ext in &self.extensions {
            let index = candidate.join(format!("index.{}", ext));
            if index.is_file() {
                return Some(index);
            }
        }
        None
    }
}

pub(crate) fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Import specifier reaching the resource `to` from the module `from`.
/// Absolute ids are already importable and come back unchanged.
pub fn relative_specifier(from: &str, to: &str) -> String {
    if Path::new(to).is_absolute() {
        return to.to_string();
    }
    let base = normalize_lexically(Path::new(from).parent().unwrap_or(Path::new("")));
    let target = normalize_lexically(Path::new(to));
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for comp in &target[common..] {
        out.push(comp.as_os_str());
    }
    let spec = slash(&out);
    if spec.starts_with("../") {
        spec
    } else {
        format!("./{}", spec)
    }
}

impl ModuleHost for FsHost {
    fn load_transformed(&self, resource_path: &str) -> Result<String, BarrelError> {
        let path = self.absolute(resource_path);
        fs::read_to_string(&path).map_err(|source| BarrelError::Io { path, source })
    }

    fn resolve(&self, from: &str, specifier: &str) -> Result<String, BarrelError> {
        if !is_relative_specifier(specifier) {
            return Ok(specifier.to_string());
        }
        let base = Path::new(from).parent().unwrap_or(Path::new(""));
        let joined = normalize_lexically(&base.join(specifier));
        let found = self
            .locate(&self.absolute(&slash(&joined)))
            .ok_or_else(|| BarrelError::Unresolvable {
                from: from.to_string(),
                specifier: specifier.to_string(),
            })?;
        // Keep ids relative to the root when the request was relative.
        let id = match &self.root {
            Some(root) if joined.is_relative() => match found.strip_prefix(root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => found.clone(),
            },
            _ => found,
        };
        Ok(slash(&id))
    }
}
