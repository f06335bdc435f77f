use tracing::trace;

use crate::emit::ExportStatement;
use crate::export_map::BarrelSource;
use crate::request::ResolutionRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectResolution {
    pub exports: Vec<ExportStatement>,
    /// Requested names absent from the local map, in request order.
    pub missed: Vec<String>,
}

/// Resolves each requested name against the file's own export map.
pub fn resolve_direct(source: &BarrelSource, request: &ResolutionRequest) -> DirectResolution {
    let mut out = DirectResolution::default();
    for name in &request.names {
        let Some(entry) = source.export_map.get(name) else {
            trace!(name = %name, "not in local export map");
            out.missed.push(name.clone());
            continue;
        };
        if entry.is_local() {
            // Declared in this file: it is the terminal owner of the binding.
            let mut owned = entry.clone();
            owned.origin_path = request.resource_path.clone();
            owned.origin_name = name.clone();
            out.exports.push(ExportStatement::from_entry(&owned));
        } else {
            out.exports.push(ExportStatement::from_entry(entry));
        }
    }
    out
}
