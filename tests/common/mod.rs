#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;

use barrelopt::*;

/// In-memory module host keyed by slash-separated resource ids.
#[derive(Default)]
pub struct MemoryHost {
    files: HashMap<String, String>,
    broken: HashSet<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, id: &str, text: &str) -> Self {
        self.files.insert(id.to_string(), text.to_string());
        self
    }

    /// Registers a file whose transform fails.
    pub fn broken(mut self, id: &str) -> Self {
        self.broken.insert(id.to_string());
        self
    }
}

impl ModuleHost for MemoryHost {
    fn load_transformed(&self, resource_path: &str) -> Result<String, BarrelError> {
        if self.broken.contains(resource_path) {
            return Err(BarrelError::Transform {
                path: resource_path.to_string(),
                message: "Unexpected token".to_string(),
            });
        }
        self.files
            .get(resource_path)
            .cloned()
            .ok_or_else(|| BarrelError::Transform {
                path: resource_path.to_string(),
                message: "no such file".to_string(),
            })
    }

    fn resolve(&self, from: &str, specifier: &str) -> Result<String, BarrelError> {
        if !specifier.starts_with('.') {
            return Ok(specifier.to_string());
        }
        let base = Path::new(from).parent().unwrap_or(Path::new(""));
        let joined = normalize_lexically(&base.join(specifier))
            .to_string_lossy()
            .replace('\\', "/");
        for candidate in [
            joined.clone(),
            format!("{}.js", joined),
            format!("{}/index.js", joined),
        ] {
            if self.files.contains_key(&candidate) || self.broken.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(BarrelError::Unresolvable {
            from: from.to_string(),
            specifier: specifier.to_string(),
        })
    }
}

/// Transform output for a barrel with the given triples and wildcard targets.
pub fn barrel_text(prefix: &str, triples: &[(&str, &str, &str)], wildcards: &[&str]) -> String {
    let opts = LoaderOptions::default();
    let json: Vec<[&str; 3]> = triples.iter().map(|(a, b, c)| [*a, *b, *c]).collect();
    let mut out = String::from(prefix);
    out.push_str(&format!(
        "export const {} = '{}';\n",
        opts.export_map_ident,
        serde_json::to_string(&json).expect("serialize triples")
    ));
    for w in wildcards {
        out.push_str(&format!(
            "export * from {};\n",
            js_quote(&opts.wildcard_template(w))
        ));
    }
    out
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
