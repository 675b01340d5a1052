//! Config file layer, exercised through the builder with real files.

use std::io::Write;

use strata::{builder, FilePathStatus, Property, ResolveError, Schema};

fn schema() -> Schema {
    Schema::builder()
        .property(Property::string("host").default("localhost"))
        .property(Property::integer("port").default(8080))
        .property(Property::list("plugins"))
        .build()
        .expect("schema builds")
}

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create temp file");
    f.write_all(contents.as_bytes()).expect("write temp file");
    path.to_str().expect("utf-8 path").to_string()
}

#[test]
fn test_explicit_toml_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.toml", "host = \"0.0.0.0\"\nport = 4000\n");

    let resolution = builder(schema())
        .file(|f| f.path(path.as_str()))
        .resolve()
        .expect("resolution succeeds");

    let config = resolution.effective;
    assert_eq!(config.get_str("host"), Some("0.0.0.0"));
    assert_eq!(config.get_integer("port"), Some(4000));
    assert!(config.provenance("port").is_some_and(|p| p.is_file()));
    assert_eq!(
        resolution.file_resolution.picked().map(|p| p.as_str()),
        Some(path.as_str())
    );
}

#[test]
fn test_explicit_json_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.json", r#"{"port": 3000, "plugins": ["a", "b"]}"#);

    let resolution = builder(schema())
        .file(|f| f.path(path.as_str()))
        .resolve()
        .expect("resolution succeeds");

    let config = resolution.effective;
    assert_eq!(config.get_integer("port"), Some(3000));
    assert_eq!(
        config.get_list("plugins"),
        Some(&["a".to_string(), "b".to_string()][..])
    );
}

#[test]
fn test_explicit_path_missing_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = builder(schema())
        .file(|f| f.path(path.to_str().expect("utf-8 path")))
        .resolve()
        .unwrap_err();

    assert!(matches!(err, ResolveError::FileNotFound { .. }));
}

#[test]
fn test_default_paths_fall_back_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.toml");
    let present = write_file(&dir, "present.toml", "port = 1111\n");
    let shadowed = write_file(&dir, "shadowed.toml", "port = 2222\n");

    let resolution = builder(schema())
        .file(|f| {
            f.default_path(missing.to_str().expect("utf-8 path"))
                .default_path(present.as_str())
                .default_path(shadowed.as_str())
        })
        .resolve()
        .expect("resolution succeeds");

    // First existing path wins; the later one is never read
    assert_eq!(resolution.effective.get_integer("port"), Some(1111));

    let statuses: Vec<_> = resolution
        .file_resolution
        .paths
        .iter()
        .map(|p| p.status.clone())
        .collect();
    assert_eq!(
        statuses,
        vec![
            FilePathStatus::Absent,
            FilePathStatus::Picked,
            FilePathStatus::NotTried
        ]
    );
}

#[test]
fn test_no_default_path_exists_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");

    let resolution = builder(schema())
        .file(|f| {
            f.default_path(dir.path().join("a.toml").to_str().expect("utf-8 path"))
                .default_path(dir.path().join("b.json").to_str().expect("utf-8 path"))
        })
        .resolve()
        .expect("resolution succeeds");

    assert_eq!(resolution.effective.get_integer("port"), Some(8080));
    assert!(resolution.file_resolution.picked().is_none());
}

#[test]
fn test_unknown_file_key_warns_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.toml", "porte = 4000\n");

    let resolution = builder(schema())
        .file(|f| f.path(path.as_str()))
        .resolve()
        .expect("resolution succeeds");

    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].key.as_deref(), Some("porte"));
    assert_eq!(resolution.effective.get_integer("port"), Some(8080));
}

#[test]
fn test_unknown_file_key_fails_in_strict_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.toml", "porte = 4000\n");

    let err = builder(schema())
        .file(|f| f.path(path.as_str()).strict())
        .resolve()
        .unwrap_err();

    match err {
        ResolveError::UnknownKey { key, suggestion, .. } => {
            assert_eq!(key, "porte");
            assert_eq!(suggestion, Some("port".to_string()));
        }
        other => panic!("expected UnknownKey, got: {other}"),
    }
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.json", "{broken");

    let err = builder(schema())
        .file(|f| f.path(path.as_str()))
        .resolve()
        .unwrap_err();

    assert!(matches!(err, ResolveError::FileParse { .. }));
    assert!(err.to_string().contains("app.json"));
}

#[test]
fn test_unrecognized_extension_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.yaml", "port: 4000\n");

    let err = builder(schema())
        .file(|f| f.path(path.as_str()))
        .resolve()
        .unwrap_err();

    assert!(matches!(err, ResolveError::UnknownFormat { .. }));
}

#[test]
fn test_custom_format_registration() {
    use strata::{ConfigFormat, Document, FormatError, Value};

    // A toy key=value format
    struct KvFormat;

    impl ConfigFormat for KvFormat {
        fn extensions(&self) -> &'static [&'static str] {
            &["kv"]
        }

        fn parse(&self, contents: &str) -> Result<Document, FormatError> {
            let mut document = Document::new();
            for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                let (key, value) = line
                    .split_once('=')
                    .ok_or_else(|| FormatError::new(format!("missing `=` in line: {line}")))?;
                document.insert(key.trim().to_string(), Value::from(value.trim()));
            }
            Ok(document)
        }
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "app.kv", "host = kv.example\nport = 1234\n");

    let resolution = builder(schema())
        .format(KvFormat)
        .file(|f| f.path(path.as_str()))
        .resolve()
        .expect("resolution succeeds");

    let config = resolution.effective;
    assert_eq!(config.get_str("host"), Some("kv.example"));
    // Values arrive as strings and coerce to the declared kind
    assert_eq!(config.get_integer("port"), Some(1234));
}
