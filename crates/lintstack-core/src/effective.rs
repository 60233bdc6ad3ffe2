//! The per-file result of a resolution.

use crate::layer::{Layer, LinterOptions};
use crate::merge::merge_tables;
use crate::types::{RuleSetting, Severity};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Fully resolved rule assignments and settings for one file.
///
/// Built fresh for every resolution and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EffectiveConfig {
    rules: BTreeMap<String, RuleSetting>,
    settings: toml::Table,
    plugins: BTreeSet<String>,
    linter_options: LinterOptions,
    applied: Vec<String>,
    ignored: bool,
}

impl EffectiveConfig {
    /// Result for a file excluded by a global ignore pattern or lying
    /// outside the stack root.
    #[must_use]
    pub(crate) fn ignored() -> Self {
        Self {
            ignored: true,
            ..Self::default()
        }
    }

    /// Folds a matching layer into the accumulator.
    pub(crate) fn apply(&mut self, label: &str, layer: &Layer) {
        for (rule, setting) in layer.rules() {
            self.rules.insert(rule.clone(), setting.clone());
        }
        merge_tables(&mut self.settings, layer.settings());
        self.plugins.extend(layer.plugins().iter().cloned());
        self.linter_options.merge(layer.linter_options());
        self.applied.push(label.to_string());
    }

    /// Returns all rule assignments, including disabled rules.
    #[must_use]
    pub fn rules(&self) -> &BTreeMap<String, RuleSetting> {
        &self.rules
    }

    /// Returns the assignment for one rule.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }

    /// Returns a rule's severity, treating unassigned rules as off.
    #[must_use]
    pub fn severity_of(&self, name: &str) -> Severity {
        self.rules.get(name).map_or(Severity::Off, |s| s.severity)
    }

    /// Iterates rules whose severity is not `off`, in name order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.rules
            .iter()
            .filter(|(_, s)| s.severity.is_enabled())
            .map(|(name, s)| (name.as_str(), s))
    }

    /// Returns the merged settings table.
    #[must_use]
    pub fn settings(&self) -> &toml::Table {
        &self.settings
    }

    /// Looks up a setting by dotted path, e.g. `react.version`.
    ///
    /// Keys that themselves contain dots cannot be reached this way; use
    /// [`settings`](Self::settings) for those.
    #[must_use]
    pub fn setting(&self, dotted: &str) -> Option<&toml::Value> {
        let mut keys = dotted.split('.');
        let mut current = self.settings.get(keys.next()?)?;
        for key in keys {
            current = current.as_table()?.get(key)?;
        }
        Some(current)
    }

    /// Returns the union of plugin namespaces declared by applied layers.
    #[must_use]
    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    /// Returns the merged linter options.
    #[must_use]
    pub fn linter_options(&self) -> &LinterOptions {
        &self.linter_options
    }

    /// Returns the labels of the layers that applied, in fold order.
    #[must_use]
    pub fn applied_layers(&self) -> &[String] {
        &self.applied
    }

    /// Returns `true` if a global ignore pattern excluded the file, or the
    /// file lies outside the stack root.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Enabled rules whose namespace no applied layer declared as a plugin.
    ///
    /// Core rules (no namespace) are never reported.
    #[must_use]
    pub fn undeclared_rules(&self) -> Vec<&str> {
        self.enabled_rules()
            .map(|(name, _)| name)
            .filter(|name| rule_namespace(name).is_some_and(|ns| !self.plugins.contains(ns)))
            .collect()
    }
}

/// Extracts the plugin namespace of a rule identifier.
///
/// `react/jsx-key` → `react`, `@typescript-eslint/no-shadow` →
/// `@typescript-eslint`, `@eslint-community/eslint-comments/require-description`
/// → `@eslint-community/eslint-comments`, `eqeqeq` → `None`.
#[must_use]
pub fn rule_namespace(rule: &str) -> Option<&str> {
    if rule.starts_with('@') {
        rule.rfind('/').map(|i| &rule[..i])
    } else {
        rule.find('/').map(|i| &rule[..i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces() {
        assert_eq!(rule_namespace("react/jsx-key"), Some("react"));
        assert_eq!(
            rule_namespace("@typescript-eslint/no-shadow"),
            Some("@typescript-eslint")
        );
        assert_eq!(
            rule_namespace("@eslint-community/eslint-comments/require-description"),
            Some("@eslint-community/eslint-comments")
        );
        assert_eq!(rule_namespace("eqeqeq"), None);
    }

    #[test]
    fn apply_replaces_rules_and_merges_settings() {
        let mut acc = EffectiveConfig::default();
        let base = Layer::new()
            .rule("quotes", RuleSetting::error().with_option("single"))
            .setting("react", toml::Table::from_iter([("version".to_string(), "detect".into())]));
        let later = Layer::new()
            .rule("quotes", RuleSetting::off())
            .setting("react", toml::Table::from_iter([("strict".to_string(), true.into())]));

        acc.apply("base", &base);
        acc.apply("later", &later);

        assert_eq!(acc.rule("quotes"), Some(&RuleSetting::off()));
        assert_eq!(
            acc.setting("react.version").and_then(toml::Value::as_str),
            Some("detect")
        );
        assert_eq!(
            acc.setting("react.strict").and_then(toml::Value::as_bool),
            Some(true)
        );
        assert_eq!(acc.applied_layers(), ["base", "later"]);
    }

    #[test]
    fn undeclared_rules_skip_disabled_and_core() {
        let mut acc = EffectiveConfig::default();
        acc.apply(
            "layer",
            &Layer::new()
                .plugin("react")
                .rule("eqeqeq", Severity::Error)
                .rule("react/jsx-key", Severity::Warn)
                .rule("unicorn/prefer-spread", Severity::Error)
                .rule("tsdoc/syntax", Severity::Off),
        );
        assert_eq!(acc.undeclared_rules(), vec!["unicorn/prefer-spread"]);
    }

    #[test]
    fn severity_of_unassigned_is_off() {
        let acc = EffectiveConfig::default();
        assert_eq!(acc.severity_of("eqeqeq"), Severity::Off);
        assert!(!acc.is_ignored());
        assert!(EffectiveConfig::ignored().is_ignored());
    }

    #[test]
    fn serializes_with_kebab_case_keys() {
        let mut acc = EffectiveConfig::default();
        acc.apply(
            "base",
            &Layer::new()
                .rule("curly", RuleSetting::warn().with_option("multi-line"))
                .with_linter_options(LinterOptions {
                    report_unused_disable_directives: Some(true),
                }),
        );

        let json = serde_json::to_value(&acc).unwrap();
        assert_eq!(json["rules"]["curly"]["severity"], "warn");
        assert_eq!(json["rules"]["curly"]["options"][0], "multi-line");
        assert_eq!(
            json["linter-options"]["report-unused-disable-directives"],
            true
        );
        assert_eq!(json["applied"][0], "base");
    }
}
