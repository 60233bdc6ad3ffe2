//! Behavioural properties of layer resolution, exercised through the
//! public API only.

use lintstack_core::{
    flatten, resolve, Layer, LayerError, LayerStack, Resolver, RuleSetting, Severity,
};

fn table(toml_str: &str) -> toml::Table {
    toml::from_str(toml_str).expect("test table should parse")
}

// ── Ordering ──

#[test]
fn resolution_is_deterministic() {
    let stack = LayerStack::new()
        .layer(
            Layer::new()
                .rule("curly", RuleSetting::warn().with_option("multi-line"))
                .setting("react", table("version = \"detect\"")),
        )
        .layer(Layer::new().file("**/*.tsx").rule("quotes", Severity::Error));

    let first = resolve(&stack, "src/app/page.tsx").unwrap();
    for _ in 0..10 {
        assert_eq!(resolve(&stack, "src/app/page.tsx").unwrap(), first);
    }
}

#[test]
fn single_declaration_is_taken_as_is() {
    let setting = RuleSetting::error().with_option(table("allowImplicit = true"));
    let stack = LayerStack::new()
        .layer(Layer::new().rule("eqeqeq", Severity::Error))
        .layer(Layer::new().rule("array-callback-return", setting.clone()));

    let config = resolve(&stack, "src/index.ts").unwrap();
    assert_eq!(config.rule("array-callback-return"), Some(&setting));
}

#[test]
fn later_layer_replaces_without_option_merge() {
    let stack = LayerStack::new()
        .layer(Layer::new().rule(
            "no-console",
            RuleSetting::warn().with_option(table("allow = [\"warn\", \"error\"]")),
        ))
        .layer(Layer::new().rule("no-console", RuleSetting::error()));

    let config = resolve(&stack, "src/index.ts").unwrap();
    assert_eq!(config.rule("no-console"), Some(&RuleSetting::error()));
}

#[test]
fn nested_extends_equal_flat_list() {
    let z = Layer::new().named("z").rule("a", Severity::Warn).rule("b", Severity::Warn);
    let y = Layer::new().named("y").rule("b", Severity::Error).rule("c", Severity::Warn);
    let x = Layer::new().named("x").rule("c", Severity::Off);

    let nested = LayerStack::new().layer(x.clone().extend(y.clone().extend(z.clone())));
    let flat = LayerStack::new().layer(z).layer(y).layer(x);

    let nested_config = resolve(&nested, "src/a.ts").unwrap();
    let flat_config = resolve(&flat, "src/a.ts").unwrap();
    assert_eq!(nested_config.rules(), flat_config.rules());
    assert_eq!(nested_config.severity_of("a"), Severity::Warn);
    assert_eq!(nested_config.severity_of("b"), Severity::Error);
    assert_eq!(nested_config.severity_of("c"), Severity::Off);

    assert_eq!(flatten(&nested).unwrap().len(), 3);
}

#[test]
fn scoped_layer_limits_extended_preset() {
    let stack = LayerStack::new()
        .preset(
            "type-checked",
            Layer::new()
                .rule("no-floating-promises", Severity::Error)
                .rule("no-misused-promises", Severity::Error),
        )
        .layer(Layer::new().named("base").rule("eqeqeq", Severity::Error))
        .layer(
            Layer::new()
                .named("config-files")
                .file("**/*.config.{js,mjs}")
                .extend("type-checked")
                .rule("no-misused-promises", Severity::Off),
        );

    let config_file = resolve(&stack, "next.config.mjs").unwrap();
    assert_eq!(config_file.severity_of("no-floating-promises"), Severity::Error);
    assert_eq!(config_file.severity_of("no-misused-promises"), Severity::Off);

    let page = resolve(&stack, "src/app/page.tsx").unwrap();
    assert_eq!(page.severity_of("eqeqeq"), Severity::Error);
    assert!(page.rule("no-floating-promises").is_none());
    assert!(page.rule("no-misused-promises").is_none());
    assert_eq!(page.applied_layers(), ["layers[0] (base)"]);
}

// ── Patterns ──

#[test]
fn test_file_pattern_selects_only_tests() {
    let stack = LayerStack::new().layer(
        Layer::new()
            .file("**/*.test.ts")
            .rule("no-unused-expressions", Severity::Off),
    );

    let test_file = resolve(&stack, "src/app/page.test.ts").unwrap();
    assert!(test_file.rule("no-unused-expressions").is_some());

    let page = resolve(&stack, "src/app/page.tsx").unwrap();
    assert!(page.rule("no-unused-expressions").is_none());
    assert!(page.applied_layers().is_empty());
}

#[test]
fn shadcn_override_applies_below_shadcn_only() {
    let stack = LayerStack::new()
        .layer(Layer::new().named("Base").rule("quotes", Severity::Error))
        .layer(
            Layer::new()
                .named("Override")
                .file("**/shadcn/*.tsx")
                .rule("quotes", Severity::Off),
        );

    assert_eq!(
        resolve(&stack, "src/ui/shadcn/button.tsx")
            .unwrap()
            .severity_of("quotes"),
        Severity::Off
    );
    assert_eq!(
        resolve(&stack, "src/ui/card.tsx").unwrap().severity_of("quotes"),
        Severity::Error
    );
}

// ── Settings ──

#[test]
fn settings_merge_by_key() {
    let stack = LayerStack::new()
        .layer(Layer::new().with_settings(table("react = { version = \"detect\" }")))
        .layer(Layer::new().with_settings(table("react = { strict = true }")));

    let config = resolve(&stack, "src/a.tsx").unwrap();
    assert_eq!(
        config.settings(),
        &table("react = { version = \"detect\", strict = true }")
    );
}

// ── Errors ──

#[test]
fn cyclic_extends_is_rejected() {
    let stack = LayerStack::new()
        .preset("a", Layer::new().extend("b"))
        .preset("b", Layer::new().extend("a"))
        .layer(Layer::new().named("root").extend("a"));

    let err = resolve(&stack, "src/a.ts").unwrap_err();
    assert_eq!(err.path(), "src/a.ts");
    match err.kind() {
        LayerError::CyclicExtension { chain, .. } => {
            assert_eq!(chain, &["a", "b", "a"]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert!(err.kind().layer().starts_with("layers[0] (root)"));
}

// ── Memoization ──

#[test]
fn memoized_resolver_matches_pure_function() {
    let stack = LayerStack::new()
        .ignore("**/*.d.ts")
        .layer(Layer::new().named("base").rule("quotes", Severity::Error))
        .layer(Layer::new().file("**/*.{jsx,tsx}").rule("react/jsx-sort-props", Severity::Warn))
        .layer(Layer::new().file("**/shadcn/*.tsx").rule("quotes", Severity::Off));
    let resolver = Resolver::new(&stack).unwrap();

    let paths = [
        "src/ui/shadcn/button.tsx",
        "src/ui/card.tsx",
        "src/lib/utils.ts",
        "src/types/env.d.ts",
        "./src/ui/card.tsx",
    ];
    let memoized = resolver.resolve_all(&paths);
    for (path, config) in paths.iter().zip(&memoized) {
        assert_eq!(**config, resolve(&stack, path).unwrap(), "{path}");
        assert_eq!(*resolver.resolve(path), **config, "{path}");
    }
}

#[test]
fn files_outside_root_get_no_rules() {
    let stack = LayerStack::new()
        .root("/work/web")
        .layer(Layer::new().rule("eqeqeq", Severity::Error));
    let resolver = Resolver::new(&stack).unwrap();

    assert_eq!(
        resolver.resolve("/work/web/src/a.ts").severity_of("eqeqeq"),
        Severity::Error
    );
    let outside = resolver.resolve("/work/api/src/a.ts");
    assert!(outside.is_ignored());
    assert_eq!(outside.severity_of("eqeqeq"), Severity::Off);
    assert_eq!(*outside, resolve(&stack, "/work/api/src/a.ts").unwrap());
}
