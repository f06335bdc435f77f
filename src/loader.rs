use std::collections::HashSet;

use tracing::{debug, debug_span, warn};

use crate::emit::{ExportStatement, ResolutionResult, WildcardForward};
use crate::error::BarrelError;
use crate::export_map::{parse_transform_output, Classification};
use crate::fallback::passthrough;
use crate::host::{is_relative_specifier, relative_specifier};
use crate::options::LoaderOptions;
use crate::request::ResolutionRequest;
use crate::resolve::resolve_direct;
use crate::wildcard::propagate;

/// The module system hosting the loader.
pub trait ModuleHost {
    /// Returns the output of the export-map transform for `resource_path`.
    fn load_transformed(&self, resource_path: &str) -> Result<String, BarrelError>;

    /// Resolves `specifier` as written inside `from` to a resource path.
    fn resolve(&self, from: &str, specifier: &str) -> Result<String, BarrelError>;

    fn load_barrel(
        &self,
        resource_path: &str,
        options: &LoaderOptions,
    ) -> Result<Classification, BarrelError> {
        let text = self.load_transformed(resource_path)?;
        parse_transform_output(resource_path, &text, options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Passthrough { resource_path: String },
    Barrel(ResolutionResult),
}

impl Resolution {
    pub fn render(&self) -> String {
        match self {
            Resolution::Passthrough { resource_path } => passthrough(resource_path),
            Resolution::Barrel(result) => result.render(),
        }
    }
}

/// Resolves one layer of an already classified file. Pure.
pub fn resolve_source(
    classification: &Classification,
    request: &ResolutionRequest,
    options: &LoaderOptions,
) -> Resolution {
    let source = match classification {
        Classification::NotABarrel => {
            return Resolution::Passthrough {
                resource_path: request.resource_path.clone(),
            }
        }
        Classification::Barrel(source) => source,
    };
    let direct = resolve_direct(source, request);
    let wildcard_forwards = propagate(&source.wildcard_exports, &direct.missed, options);
    Resolution::Barrel(ResolutionResult {
        prefix: source.prefix.clone(),
        direct_exports: direct.exports,
        wildcard_forwards,
    })
}

/// Fully expanded export surface of a request. Every path is an import
/// specifier valid from the requested module itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedModule {
    pub prefix: String,
    pub exports: Vec<ExportStatement>,
    /// Modules forwarded wholesale (non-barrels and plain wildcard targets).
    pub passthrough: Vec<String>,
    /// Names no explicit statement binds. Any passthrough module may still
    /// provide them at run time.
    pub unresolved: Vec<String>,
}

impl ResolvedModule {
    pub fn render(&self) -> String {
        let mut out = self.prefix.clone();
        for stmt in &self.exports {
            out.push('\n');
            out.push_str(&stmt.to_string());
        }
        for path in &self.passthrough {
            out.push('\n');
            out.push_str(&passthrough(path));
        }
        out
    }
}

pub struct BarrelLoader<'a, H: ModuleHost> {
    host: &'a H,
    options: &'a LoaderOptions,
}

impl<'a, H: ModuleHost> BarrelLoader<'a, H> {
    pub fn new(host: &'a H, options: &'a LoaderOptions) -> Self {
        Self { host, options }
    }

    pub fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution, BarrelError> {
        let _span = debug_span!(
            "barrel",
            path = %request.resource_path,
            wildcard = request.wildcard
        )
        .entered();
        let classification = self
            .host
            .load_barrel(&request.resource_path, self.options)?;
        let resolution = resolve_source(&classification, request, self.options);
        match &resolution {
            Resolution::Passthrough { .. } => debug!("not a barrel, forwarding whole module"),
            Resolution::Barrel(r) => debug!(
                direct = r.direct_exports.len(),
                forwards = r.wildcard_forwards.len(),
                "resolved"
            ),
        }
        Ok(resolution)
    }

    /// Module text for one request. Wildcard forwards stay parametrized
    /// requests for the host to dispatch back into this loader.
    pub fn load(&self, request: &ResolutionRequest) -> Result<String, BarrelError> {
        Ok(self.resolve(request)?.render())
    }

    /// Resolves the request by recursing into wildcard forwards directly.
    pub fn resolve_deep(&self, request: &ResolutionRequest) -> Result<ResolvedModule, BarrelError> {
        let frame = Frame {
            top: &request.resource_path,
            depth: 0,
        };
        self.resolve_deep_at(request, frame)
    }

    /// Specifier, valid from `frame.top`, for `written` as it appears in `request`'s file.
    fn specifier(
        &self,
        frame: Frame<'_>,
        request: &ResolutionRequest,
        written: &str,
    ) -> Result<String, BarrelError> {
        if written == request.resource_path {
            return Ok(relative_specifier(frame.top, written));
        }
        if !is_relative_specifier(written) {
            return Ok(written.to_string());
        }
        let id = self.host.resolve(&request.resource_path, written)?;
        Ok(relative_specifier(frame.top, &id))
    }

    fn resolve_deep_at(
        &self,
        request: &ResolutionRequest,
        frame: Frame<'_>,
    ) -> Result<ResolvedModule, BarrelError> {
        if frame.depth > self.options.max_depth {
            return Err(BarrelError::DepthExceeded {
                path: request.resource_path.clone(),
                depth: self.options.max_depth,
            });
        }
        let resolution = self.resolve(request)?;
        let result = match resolution {
            Resolution::Passthrough { resource_path } => {
                return Ok(ResolvedModule {
                    passthrough: vec![relative_specifier(frame.top, &resource_path)],
                    unresolved: dedup(&request.names),
                    ..Default::default()
                });
            }
            Resolution::Barrel(result) => result,
        };

        let mut out = ResolvedModule {
            prefix: result.prefix,
            ..Default::default()
        };
        let mut bound: HashSet<String> = HashSet::new();
        for mut stmt in result.direct_exports {
            if !bound.insert(stmt.name.clone()) {
                continue;
            }
            stmt.from = self.specifier(frame, request, &stmt.from)?;
            out.exports.push(stmt);
        }

        let mut pending: Vec<String> = dedup(&request.names)
            .into_iter()
            .filter(|n| !bound.contains(n))
            .collect();
        for forward in result.wildcard_forwards {
            if pending.is_empty() {
                break;
            }
            self.descend(request, &forward, frame, &mut pending, &mut bound, &mut out)?;
        }
        if !pending.is_empty() {
            debug!(names = ?pending, "names not bound by any wildcard chain");
        }
        out.unresolved = pending;
        Ok(out)
    }

    fn descend(
        &self,
        parent: &ResolutionRequest,
        forward: &WildcardForward,
        frame: Frame<'_>,
        pending: &mut Vec<String>,
        bound: &mut HashSet<String>,
        out: &mut ResolvedModule,
    ) -> Result<(), BarrelError> {
        let Some(sub) = ResolutionRequest::decode(&forward.target, self.options)? else {
            let path = self.specifier(frame, parent, &forward.target)?;
            if !out.passthrough.contains(&path) {
                out.passthrough.push(path);
            }
            return Ok(());
        };
        if !sub.wildcard {
            warn!(forward = %forward.target, "wildcard forward without wildcard flag");
        }
        let child = ResolutionRequest {
            resource_path: self.host.resolve(&parent.resource_path, &sub.resource_path)?,
            names: pending.clone(),
            wildcard: true,
        };
        let next = Frame {
            depth: frame.depth + 1,
            ..frame
        };
        let resolved = self.resolve_deep_at(&child, next)?;
        for stmt in resolved.exports {
            if bound.insert(stmt.name.clone()) {
                out.exports.push(stmt);
            }
        }
        for path in resolved.passthrough {
            if !out.passthrough.contains(&path) {
                out.passthrough.push(path);
            }
        }
        pending.retain(|n| !bound.contains(n));
        Ok(())
    }
}

/// Position inside one `resolve_deep` walk.
#[derive(Clone, Copy)]
struct Frame<'r> {
    top: &'r str,
    depth: usize,
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}
