//! Error reporting across the whole pipeline.

use strata::{builder, format_missing_keys, Layer, Property, ResolveError, Schema};

fn schema() -> Schema {
    Schema::builder()
        .property(Property::string("host").default("localhost"))
        .property(Property::integer("port").default(8080))
        .property(
            Property::string("database_url")
                .required()
                .doc("Database connection URL"),
        )
        .property(Property::string("api_key").required().doc("API key for the backend"))
        .build()
        .expect("schema builds")
}

#[test]
fn test_all_missing_required_keys_reported_together() {
    let err = builder(schema()).resolve().unwrap_err();

    match err {
        ResolveError::MissingRequired { keys } => {
            // Declaration order, every missing key at once
            assert_eq!(
                keys,
                vec!["database_url".to_string(), "api_key".to_string()]
            );
        }
        other => panic!("expected MissingRequired, got: {other}"),
    }
}

#[test]
fn test_missing_required_keys_render_with_env_hints() {
    let schema = schema();
    let err = builder(schema.clone()).resolve().unwrap_err();

    let ResolveError::MissingRequired { keys } = err else {
        panic!("expected MissingRequired");
    };
    let summary = format_missing_keys(&keys, &schema, Some("APP"));

    assert!(summary.contains("database_url"));
    assert!(summary.contains("APP__DATABASE_URL"));
    assert!(summary.contains("APP__API_KEY"));
    assert!(summary.contains("Database connection URL"));
}

#[test]
fn test_unknown_programmatic_key_is_always_fatal() {
    // Programmatic layers hard-fail on unknown keys; there is no lenient
    // mode for code the author controls.
    let err = builder(schema())
        .set("database_url", "x")
        .set("api_key", "y")
        .layer(Layer::builder("typos").set("prot", "8080").build())
        .resolve()
        .unwrap_err();

    match err {
        ResolveError::UnknownKey {
            key,
            source,
            suggestion,
        } => {
            assert_eq!(key, "prot");
            assert!(source.contains("typos"));
            assert_eq!(suggestion, Some("port".to_string()));
        }
        other => panic!("expected UnknownKey, got: {other}"),
    }
}

#[test]
fn test_unknown_base_key_is_fatal() {
    let err = builder(schema())
        .set("database_url", "x")
        .set("api_key", "y")
        .set("hosst", "z")
        .resolve()
        .unwrap_err();

    match err {
        ResolveError::UnknownKey { key, suggestion, .. } => {
            assert_eq!(key, "hosst");
            assert_eq!(suggestion, Some("host".to_string()));
        }
        other => panic!("expected UnknownKey, got: {other}"),
    }
}

#[test]
fn test_type_mismatch_names_key_and_kinds() {
    let err = builder(schema())
        .set("database_url", "x")
        .set("api_key", "y")
        .layer(Layer::builder("bad").set("port", true).build())
        .resolve()
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("`port`"));
    assert!(text.contains("expected integer"));
    assert!(text.contains("found boolean"));
}

#[test]
fn test_errors_work_through_the_error_trait() {
    let err = builder(schema()).resolve().unwrap_err();
    let dynamic: &dyn core::error::Error = &err;
    assert!(dynamic.to_string().contains("missing required"));
}
