use crate::emit::WildcardForward;
use crate::export_map::WildcardExport;
use crate::options::LoaderOptions;
use crate::request::encode_names;

/// One forward per wildcard source, scoped to the names still missing.
pub fn propagate(
    wildcards: &[WildcardExport],
    missed: &[String],
    options: &LoaderOptions,
) -> Vec<WildcardForward> {
    if missed.is_empty() {
        return Vec::new();
    }
    let replacement = format!("{}&wildcard", encode_names(missed));
    wildcards
        .iter()
        .map(|w| WildcardForward {
            target: w.target.replace(&options.placeholder, &replacement),
        })
        .collect()
}
