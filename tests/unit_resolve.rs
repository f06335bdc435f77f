use barrelopt::*;

mod common;
use common::{barrel_text, names};

const RESOURCE: &str = "/app/lib/index.js";

fn classify(text: &str) -> Classification {
    parse_transform_output(RESOURCE, text, &LoaderOptions::default()).expect("parse")
}

fn render(text: &str, requested: &[&str], wildcard: bool) -> String {
    let req = ResolutionRequest::new(RESOURCE, names(requested), wildcard);
    resolve_source(&classify(text), &req, &LoaderOptions::default()).render()
}

#[test]
fn non_barrel_forwards_literal_resource() {
    let text = "let shared = 1;\nexport const a = () => shared;\n";
    let cases: Vec<(Vec<&str>, bool)> = vec![(vec!["a"], false), (vec!["a", "b"], true), (vec![], false)];
    for (requested, wildcard) in cases {
        assert_eq!(
            render(text, &requested, wildcard),
            "export * from \"/app/lib/index.js\""
        );
    }
}

#[test]
fn same_name_reexport() {
    let text = barrel_text("", &[("a", "./a", "a")], &[]);
    assert_eq!(render(&text, &["a"], false), "\nexport { a } from \"./a\"");
}

#[test]
fn default_reexport_is_bound_to_name() {
    let text = barrel_text("", &[("b", "./mod", "default")], &[]);
    assert_eq!(
        render(&text, &["b"], false),
        "\nexport { default as b } from \"./mod\""
    );
}

#[test]
fn namespace_and_renamed_forms() {
    let text = barrel_text("", &[("ns", "./ns", "*"), ("r", "./r", "inner")], &[]);
    assert_eq!(
        render(&text, &["ns", "r"], false),
        "\nexport * as ns from \"./ns\"\nexport { inner as r } from \"./r\""
    );
}

#[test]
fn local_binding_points_at_resource_itself() {
    let text = barrel_text("", &[("c", "", "c")], &[]);
    let expected = "\nexport { c } from \"/app/lib/index.js\"";
    assert_eq!(render(&text, &["c"], false), expected);
    assert_eq!(render(&text, &["c"], true), expected);
}

#[test]
fn local_binding_drops_stale_origin_name() {
    let source = BarrelSource {
        prefix: String::new(),
        export_map: ExportMap::from_triples(vec![(
            "c".to_string(),
            String::new(),
            "whatever".to_string(),
        )]),
        wildcard_exports: vec![],
    };
    let req = ResolutionRequest::new(RESOURCE, names(&["c"]), true);
    let direct = resolve_direct(&source, &req);
    assert_eq!(direct.exports.len(), 1);
    assert_eq!(direct.exports[0].form, ExportForm::Named);
    assert_eq!(direct.exports[0].from, RESOURCE);
    assert!(direct.missed.is_empty());
}

#[test]
fn wildcard_only_barrel_forwards_each_source() {
    let text = barrel_text("", &[], &["./a", "./b"]);
    assert_eq!(
        render(&text, &["x"], false),
        "\nexport * from \"__barrel_optimize__?names=x&wildcard!=!./a\"\
         \nexport * from \"__barrel_optimize__?names=x&wildcard!=!./b\""
    );
}

#[test]
fn direct_hit_is_not_propagated() {
    let text = barrel_text("", &[("a", "./a", "a")], &["./rest"]);
    let out = render(&text, &["a"], false);
    assert_eq!(out, "\nexport { a } from \"./a\"");
}

#[test]
fn mixed_hits_and_misses() {
    let text = barrel_text("", &[("a", "./a", "a")], &["./x", "./y"]);
    let req = ResolutionRequest::new(RESOURCE, names(&["m1", "a", "m2"]), false);
    let Resolution::Barrel(result) =
        resolve_source(&classify(&text), &req, &LoaderOptions::default())
    else {
        panic!("expected barrel resolution");
    };
    assert_eq!(result.direct_exports.len(), 1);
    assert_eq!(result.direct_exports[0].name, "a");
    let targets: Vec<_> = result
        .wildcard_forwards
        .iter()
        .map(|f| f.target.as_str())
        .collect();
    assert_eq!(
        targets,
        vec![
            "__barrel_optimize__?names=m1,m2&wildcard!=!./x",
            "__barrel_optimize__?names=m1,m2&wildcard!=!./y",
        ]
    );
}

#[test]
fn duplicate_requested_names_emit_twice() {
    let text = barrel_text("", &[("a", "./a", "a")], &[]);
    assert_eq!(
        render(&text, &["a", "a"], false),
        "\nexport { a } from \"./a\"\nexport { a } from \"./a\""
    );
}

#[test]
fn unresolvable_name_without_wildcards_emits_nothing() {
    let text = barrel_text("// lib\n", &[("a", "./a", "a")], &[]);
    assert_eq!(render(&text, &["zzz"], false), "// lib\n");
}

#[test]
fn resolution_is_idempotent() {
    let text = barrel_text("'use strict';\n", &[("a", "./a", "a"), ("b", "", "b")], &["./w"]);
    let first = render(&text, &["b", "missing", "a"], true);
    let second = render(&text, &["b", "missing", "a"], true);
    assert_eq!(first, second);
    assert!(first.starts_with("'use strict';\n"));
}

#[test]
fn propagate_is_empty_without_misses() {
    let wildcards = vec![WildcardExport {
        target: "__barrel_optimize__?names=__PLACEHOLDER__!=!./a".into(),
    }];
    assert!(propagate(&wildcards, &[], &LoaderOptions::default()).is_empty());
}

#[test]
fn propagate_keeps_plain_targets() {
    let wildcards = vec![WildcardExport {
        target: "./legacy".into(),
    }];
    let out = propagate(&wildcards, &names(&["q"]), &LoaderOptions::default());
    assert_eq!(out, vec![WildcardForward { target: "./legacy".into() }]);
}

#[test]
fn js_quote_escapes() {
    assert_eq!(js_quote(r#"a"b\c"#), r#""a\"b\\c""#);
    assert_eq!(passthrough("./x.js"), "export * from \"./x.js\"");
}
