use std::io::Write;

use probability_content::{
    CatalogFormat, CatalogLoader, ParameterKind, TriggerSpec, DEFAULT_INTERVAL_SECONDS,
};

const RON_CATALOG: &str = r#"
Catalog(
    selectors: [
        (
            name: "idle_variant",
            parameter: Some((name: "IdleIndex", kind: Integer)),
            trigger: Interval(seconds: 0.5),
            enabled: true,
            entries: [
                (value: 0, weight: 400, repeatable: true, comment: Some("breathe")),
                (value: 1, weight: 200, repeatable: false),
                (value: 2, weight: 0),
            ],
        ),
        (
            name: "tail_wag",
            trigger: OnStateEnter,
            seed: Some(7),
            max_attempts: Some(20),
            entries: [(value: 3, weight: 10)],
        ),
    ],
)
"#;

const TOML_CATALOG: &str = r#"
[[selectors]]
name = "bark"
enabled = true
trigger = { Interval = { seconds = 1.5 } }
parameter = { name = "BarkIndex" }

[[selectors.entries]]
value = 0
weight = 300
comment = "woof"

[[selectors.entries]]
value = 1
weight = 700
repeatable = true
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_ron_catalog() {
    let file = write_temp(".ron", RON_CATALOG);
    let catalog = CatalogLoader::load(file.path()).unwrap();

    assert_eq!(catalog.selectors.len(), 2);

    let idle = catalog.get("idle_variant").unwrap();
    assert!(idle.enabled);
    assert_eq!(idle.trigger, TriggerSpec::Interval { seconds: 0.5 });
    let parameter = idle.parameter.as_ref().unwrap();
    assert_eq!(parameter.name, "IdleIndex");
    assert_eq!(parameter.kind, ParameterKind::Integer);
    assert_eq!(idle.entries.len(), 3);
    assert_eq!(idle.entries[0].comment.as_deref(), Some("breathe"));
    assert!(idle.entries[0].repeatable);
    assert!(!idle.entries[2].repeatable);
    assert!(idle.entries[2].weight.is_zero());

    let wag = catalog.get("tail_wag").unwrap();
    assert!(!wag.enabled);
    assert_eq!(wag.trigger, TriggerSpec::OnStateEnter);
    assert_eq!(wag.seed, Some(7));
    assert_eq!(wag.max_attempts, Some(20));
    assert!(wag.parameter.is_none());
}

#[test]
fn loads_toml_catalog() {
    let file = write_temp(".toml", TOML_CATALOG);
    let catalog = CatalogLoader::load(file.path()).unwrap();

    let bark = catalog.get("bark").unwrap();
    assert_eq!(bark.trigger, TriggerSpec::Interval { seconds: 1.5 });
    assert_eq!(bark.parameter.as_ref().unwrap().kind, ParameterKind::Float);
    assert_eq!(bark.entries[0].comment.as_deref(), Some("woof"));
    assert_eq!(bark.entries[1].weight.get(), 700);
    assert!(bark.entries[1].repeatable);
}

#[test]
fn rejects_weight_above_maximum() {
    let text = r#"Catalog(selectors: [(name: "x", entries: [(value: 0, weight: 1200)])])"#;
    let err = CatalogLoader::parse(text, CatalogFormat::Ron).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn rejects_duplicate_names() {
    let text = r#"Catalog(selectors: [(name: "x"), (name: "x")])"#;
    let err = CatalogLoader::parse(text, CatalogFormat::Ron).unwrap_err();
    assert!(err.to_string().contains("duplicate selector name"), "{err}");
}

#[test]
fn rejects_intervals_that_do_not_fit_a_duration() {
    for seconds in ["1e20", "1e-12"] {
        let text = format!(
            r#"Catalog(selectors: [(name: "x", trigger: Interval(seconds: {seconds}))])"#
        );
        let err = CatalogLoader::parse(&text, CatalogFormat::Ron).unwrap_err();
        assert!(err.to_string().contains("invalid interval"), "{seconds}: {err}");
    }
}

#[test]
fn rejects_unknown_extension_and_missing_file() {
    let file = write_temp(".json", "{}");
    assert!(CatalogLoader::load(file.path()).is_err());

    let dir = tempfile::tempdir().unwrap();
    let err = CatalogLoader::load(&dir.path().join("missing.ron")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"), "{err}");
}

#[test]
fn empty_catalog_is_valid() {
    let catalog = CatalogLoader::parse("Catalog(selectors: [])", CatalogFormat::Ron).unwrap();
    assert!(catalog.selectors.is_empty());
    assert!(DEFAULT_INTERVAL_SECONDS > 0.0);
}
