use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarrelError {
    #[error("transform failed for {path}: {message}")]
    Transform { path: String, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed export map in {path}: {source}")]
    MalformedExportMap {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot resolve {specifier} from {from}")]
    Unresolvable { from: String, specifier: String },

    #[error("invalid barrel request: {0}")]
    BadRequest(String),

    #[error("wildcard re-exports nested deeper than {depth} levels at {path}")]
    DepthExceeded { path: String, depth: usize },
}
