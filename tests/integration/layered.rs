//! Tests demonstrating layered configuration from multiple sources:
//! base assignments, programmatic layers, environment variables, config
//! files, and defaults.

use strata::{builder, resolve, Layer, LayerStack, MockEnv, Property, Schema, ValueStore};

fn server_schema() -> Schema {
    Schema::builder()
        .property(Property::string("host").default("localhost"))
        .property(Property::integer("port").default(8080))
        .property(Property::string("database_url").required())
        .property(Property::integer("max_connections").default(10))
        .property(Property::integer("timeout_secs").default(30))
        .property(Property::list("plugins").default(Vec::<String>::new()))
        .build()
        .expect("schema builds")
}

#[test]
fn test_layered_all_sources() {
    // Config file content (lowest priority of the sources)
    let config_json = r#"{
        "host": "0.0.0.0",
        "port": 3000,
        "database_url": "postgres://localhost/mydb",
        "max_connections": 20
    }"#;

    // Environment variables (higher priority than file)
    let env = MockEnv::from_pairs([("APP__PORT", "4000"), ("APP__TIMEOUT_SECS", "60")]);

    // A programmatic layer (highest priority)
    let overrides = Layer::builder("ci-overrides")
        .set("plugins", vec!["metrics", "tracing"])
        .build();

    let resolution = builder(server_schema())
        .file(|f| f.content(config_json, "config.json"))
        .env(|e| e.prefix("APP").source(env))
        .layer(overrides)
        .resolve()
        .expect("resolution succeeds");

    let config = resolution.effective;
    // File: host = "0.0.0.0"
    assert_eq!(config.get_str("host"), Some("0.0.0.0"));
    // Env overrides file: port
    assert_eq!(config.get_integer("port"), Some(4000));
    // File: database_url
    assert_eq!(config.get_str("database_url"), Some("postgres://localhost/mydb"));
    // File: max_connections
    assert_eq!(config.get_integer("max_connections"), Some(20));
    // Env overrides default: timeout_secs
    assert_eq!(config.get_integer("timeout_secs"), Some(60));
    // Layer overrides default: plugins
    assert_eq!(
        config.get_list("plugins"),
        Some(&["metrics".to_string(), "tracing".to_string()][..])
    );
}

#[test]
fn test_single_layer_key_wins() {
    let store = ValueStore::new(server_schema());
    let mut stack = LayerStack::new();
    stack.push(
        Layer::builder("only")
            .set("database_url", "postgres://layer/db")
            .build(),
    );

    let effective = resolve(&store, &stack).expect("resolution succeeds");
    assert_eq!(effective.get_str("database_url"), Some("postgres://layer/db"));
}

#[test]
fn test_later_layer_wins_over_earlier() {
    let mut store = ValueStore::new(server_schema());
    store.set("database_url", "postgres://base/db").unwrap();

    let mut stack = LayerStack::new();
    stack.push(Layer::builder("first").set("port", 1000i64).build());
    stack.push(Layer::builder("second").set("port", 2000i64).build());

    let effective = resolve(&store, &stack).expect("resolution succeeds");
    assert_eq!(effective.get_integer("port"), Some(2000));
}

#[test]
fn test_disjoint_layers_merge_with_base() {
    // base = {a: 1, b: 2}; layer1 = {b: 3}; layer2 = {a: 4}
    let schema = Schema::builder()
        .property(Property::integer("a"))
        .property(Property::integer("b"))
        .build()
        .expect("schema builds");

    let mut store = ValueStore::new(schema);
    store.set("a", 1i64).unwrap();
    store.set("b", 2i64).unwrap();

    let mut stack = LayerStack::new();
    stack.push(Layer::builder("layer1").set("b", 3i64).build());
    stack.push(Layer::builder("layer2").set("a", 4i64).build());

    let effective = resolve(&store, &stack).expect("resolution succeeds");
    assert_eq!(effective.get_integer("a"), Some(4));
    assert_eq!(effective.get_integer("b"), Some(3));
}

#[test]
fn test_resolution_is_repeatable() {
    let mut store = ValueStore::new(server_schema());
    store.set("database_url", "x").unwrap();

    let mut stack = LayerStack::new();
    stack.push(Layer::builder("a").set("port", 1i64).build());
    stack.push(Layer::builder("b").set("host", "h").set("port", 2i64).build());

    let first = resolve(&store, &stack).expect("first resolution");
    let second = resolve(&store, &stack).expect("second resolution");

    let first_keys: Vec<_> = first.keys().collect();
    let second_keys: Vec<_> = second.keys().collect();
    assert_eq!(first_keys, second_keys);
    for key in first.keys() {
        assert_eq!(first.get(key), second.get(key), "key {key} differs");
    }
    assert_eq!(first.overrides().len(), second.overrides().len());
}

#[test]
fn test_each_resolve_is_a_fresh_snapshot() {
    let mut store = ValueStore::new(server_schema());
    store.set("database_url", "x").unwrap();

    let stack_one = LayerStack::new();
    let first = resolve(&store, &stack_one).expect("first resolution");

    // A later resolve with more layers must not affect the earlier snapshot.
    let mut stack_two = LayerStack::new();
    stack_two.push(Layer::builder("later").set("port", 9999i64).build());
    let second = resolve(&store, &stack_two).expect("second resolution");

    assert_eq!(first.get_integer("port"), Some(8080));
    assert_eq!(second.get_integer("port"), Some(9999));
}

#[test]
fn test_provenance_and_overrides_explain_the_outcome() {
    let config_json = r#"{"port": 3000, "database_url": "postgres://file/db"}"#;
    let env = MockEnv::from_pairs([("APP__PORT", "4000")]);

    let resolution = builder(server_schema())
        .file(|f| f.content(config_json, "config.json"))
        .env(|e| e.prefix("APP").source(env))
        .resolve()
        .expect("resolution succeeds");

    let config = resolution.effective;
    assert!(config.provenance("port").is_some_and(|p| p.is_env()));
    assert!(config.provenance("database_url").is_some_and(|p| p.is_file()));
    assert!(config.provenance("host").is_some_and(|p| p.is_default()));

    // port: env overrode the file value; the default losing is not recorded
    assert_eq!(config.overrides().len(), 1);
    let ovr = &config.overrides()[0];
    assert_eq!(ovr.key, "port");
    assert!(ovr.winner.is_env());
    assert!(ovr.loser.is_file());

    let rendered = config.render();
    assert!(rendered.contains("port"));
    assert!(rendered.contains("APP__PORT"));
}
