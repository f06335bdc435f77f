use crate::emit::WildcardForward;

/// Output for a file that carries no export map. Its bindings may share
/// top-level state, so only the whole module can be forwarded. The literal
/// resource path keeps every request for this file on one module instance.
pub fn passthrough(resource_path: &str) -> String {
    WildcardForward {
        target: resource_path.to_string(),
    }
    .to_string()
}
