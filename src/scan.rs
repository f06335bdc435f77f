use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use glob::glob;

use crate::export_map::{parse_transform_output, Classification};
use crate::options::LoaderOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanKind {
    Barrel { exports: usize, wildcards: usize },
    NotABarrel,
}

#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub kind: ScanKind,
}

/// Classifies every file matched by `patterns`, sorted by path.
pub fn scan_barrels(patterns: &[String], options: &LoaderOptions) -> Result<Vec<ScanEntry>> {
    let mut out = Vec::new();
    for pat in patterns {
        for path in glob(pat)
            .with_context(|| format!("bad glob pattern: {}", pat))?
            .flatten()
        {
            if !path.is_file() || out.iter().any(|e: &ScanEntry| e.path == path) {
                continue;
            }
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let id = path.to_string_lossy().replace('\\', "/");
            let kind = match parse_transform_output(&id, &text, options)? {
                Classification::Barrel(src) => ScanKind::Barrel {
                    exports: src.export_map.len(),
                    wildcards: src.wildcard_exports.len(),
                },
                Classification::NotABarrel => ScanKind::NotABarrel,
            };
            out.push(ScanEntry { path, kind });
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}
