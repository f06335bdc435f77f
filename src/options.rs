pub const DEFAULT_EXPORT_MAP_IDENT: &str = "__barrel_export_map__";
pub const DEFAULT_PLACEHOLDER: &str = "__PLACEHOLDER__";
pub const DEFAULT_REQUEST_PREFIX: &str = "__barrel_optimize__";
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tokens shared between the upstream transform, the loader and the host's
/// request addressing scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Name of the generated declaration carrying the JSON export map.
    pub export_map_ident: String,
    /// Token inside wildcard targets replaced by the pending name list.
    pub placeholder: String,
    /// Leading marker of a parametrized request.
    pub request_prefix: String,
    /// Recursion guard for `BarrelLoader::resolve_deep`.
    pub max_depth: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            export_map_ident: DEFAULT_EXPORT_MAP_IDENT.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            request_prefix: DEFAULT_REQUEST_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoaderOptions {
    /// Wildcard target the transform writes for `export * from '<target>'`.
    pub fn wildcard_template(&self, target: &str) -> String {
        format!(
            "{}?names={}!=!{}",
            self.request_prefix, self.placeholder, target
        )
    }
}
