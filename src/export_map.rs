use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BarrelError;
use crate::options::LoaderOptions;

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"export (?:const|var) ([A-Za-z_$][\w$]*) = ('[^']+'|"(?:[^"\\]|\\.)*")"#).unwrap()
});
static WILDCARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"export \* from (?:"([^"]+)"|'([^']+)')"#).unwrap());

/// How an entry has to be re-exported, derived from its origin name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportForm {
    Namespace,
    Default,
    Named,
    Renamed { local: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub exported_name: String,
    /// Empty when the binding is defined in the file itself.
    pub origin_path: String,
    pub origin_name: String,
}

impl ExportEntry {
    pub fn new(exported_name: &str, origin_path: &str, origin_name: &str) -> Self {
        Self {
            exported_name: exported_name.to_string(),
            origin_path: origin_path.to_string(),
            origin_name: origin_name.to_string(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.origin_path.is_empty()
    }

    pub fn form(&self) -> ExportForm {
        match self.origin_name.as_str() {
            "*" => ExportForm::Namespace,
            "default" => ExportForm::Default,
            n if n == self.exported_name => ExportForm::Named,
            n => ExportForm::Renamed {
                local: n.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMap {
    entries: HashMap<String, ExportEntry>,
}

impl ExportMap {
    /// Builds the map from `[exported, origin_path, origin_name]` triples.
    /// A repeated exported name replaces the earlier entry.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let mut entries = HashMap::new();
        for (exported, path, orig) in triples {
            entries.insert(
                exported.clone(),
                ExportEntry {
                    exported_name: exported,
                    origin_path: path,
                    origin_name: orig,
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardExport {
    pub target: String,
}

/// Structured view of one transformed barrel file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrelSource {
    pub prefix: String,
    pub export_map: ExportMap,
    pub wildcard_exports: Vec<WildcardExport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Barrel(BarrelSource),
    NotABarrel,
}

fn decode_literal(path: &str, literal: &str) -> Result<String, BarrelError> {
    if literal.starts_with('"') {
        serde_json::from_str::<String>(literal).map_err(|source| {
            BarrelError::MalformedExportMap {
                path: path.to_string(),
                source,
            }
        })
    } else {
        Ok(literal[1..literal.len() - 1].to_string())
    }
}

/// Splits transform output into prefix, export map and wildcard targets.
/// Text without the export map declaration is `NotABarrel`.
pub fn parse_transform_output(
    path: &str,
    text: &str,
    options: &LoaderOptions,
) -> Result<Classification, BarrelError> {
    // The last declaration is authoritative; everything before it is prefix.
    let Some(caps) = DECLARATION_RE
        .captures_iter(text)
        .filter(|c| &c[1] == options.export_map_ident.as_str())
        .last()
    else {
        return Ok(Classification::NotABarrel);
    };
    let start = caps.get(0).map_or(0, |m| m.start());
    let prefix = text[..start].to_string();
    let literal = caps.get(2).map_or("", |m| m.as_str());
    let json = decode_literal(path, literal)?;
    let triples: Vec<(String, String, String)> =
        serde_json::from_str(&json).map_err(|source| BarrelError::MalformedExportMap {
            path: path.to_string(),
            source,
        })?;

    let wildcard_exports = WILDCARD_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| WildcardExport {
            target: m.as_str().to_string(),
        })
        .collect();

    Ok(Classification::Barrel(BarrelSource {
        prefix,
        export_map: ExportMap::from_triples(triples),
        wildcard_exports,
    }))
}
