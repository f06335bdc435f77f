#![allow(clippy::collapsible_if)]
mod config;
mod emit;
mod error;
mod export_map;
mod fallback;
mod host;
mod loader;
mod options;
mod request;
mod resolve;
mod scan;
mod wildcard;

pub use config::{load_config, BarrelConfig, LoadedConfig};
pub use emit::{js_quote, ExportStatement, ResolutionResult, WildcardForward};
pub use error::BarrelError;
pub use export_map::{
    parse_transform_output, BarrelSource, Classification, ExportEntry, ExportForm, ExportMap,
    WildcardExport,
};
pub use fallback::passthrough;
pub use host::{normalize_lexically, relative_specifier, FsHost, DEFAULT_EXTENSIONS};
pub use loader::{resolve_source, BarrelLoader, ModuleHost, Resolution, ResolvedModule};
pub use options::{
    LoaderOptions, DEFAULT_EXPORT_MAP_IDENT, DEFAULT_MAX_DEPTH, DEFAULT_PLACEHOLDER,
    DEFAULT_REQUEST_PREFIX,
};
pub use request::{RequestKey, ResolutionRequest};
pub use resolve::{resolve_direct, DirectResolution};
pub use scan::{scan_barrels, ScanEntry, ScanKind};
pub use wildcard::propagate;
