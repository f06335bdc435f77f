use std::fs;

use barrelopt::*;

// Environment variables are process-wide, so every case that sets one
// lives in this single test.
#[test]
fn environment_overrides_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("barrelopt.toml");
    fs::write(
        &path,
        "[barrel]\nplaceholder = \"P\"\nmax_depth = 3\nrequest_prefix = \"__file__\"\n",
    )
    .unwrap();

    std::env::set_var("BARRELOPT_BARREL_PLACEHOLDER", "ENVP");
    std::env::set_var("BARRELOPT_BARREL_MAX_DEPTH", "5");
    std::env::set_var("BARRELOPT_BARREL_EXPORT_MAP_IDENT", "__env_map__");
    std::env::set_var("BARRELOPT_BARREL_EXTENSIONS", "mjs,cts");

    let loaded = load_config(Some(&path)).expect("config");
    let opts = loaded.cfg.loader_options();
    assert_eq!(opts.placeholder, "ENVP");
    assert_eq!(opts.max_depth, 5);
    assert_eq!(opts.export_map_ident, "__env_map__");
    assert_eq!(opts.request_prefix, "__file__");
    assert_eq!(
        loaded.cfg.extensions,
        Some(vec!["mjs".to_string(), "cts".to_string()])
    );

    // The crate root holds no barrelopt.* file; the overlay still applies.
    let bare = load_config(None).expect("config");
    assert!(bare.dir.is_none());
    assert_eq!(bare.cfg.loader_options().max_depth, 5);
    assert_eq!(bare.cfg.loader_options().request_prefix, DEFAULT_REQUEST_PREFIX);

    for key in [
        "BARRELOPT_BARREL_PLACEHOLDER",
        "BARRELOPT_BARREL_MAX_DEPTH",
        "BARRELOPT_BARREL_EXPORT_MAP_IDENT",
        "BARRELOPT_BARREL_EXTENSIONS",
    ] {
        std::env::remove_var(key);
    }
    let cleared = load_config(Some(&path)).expect("config");
    assert_eq!(cleared.cfg.loader_options().max_depth, 3);
    assert_eq!(cleared.cfg.placeholder.as_deref(), Some("P"));
}
