//! Configuration layers and the frozen stack handed to the resolver.
//!
//! Layers are plain values: built once (by hand or by the
//! [`declarative`](crate::declarative) loader) and never mutated afterwards.

use crate::types::RuleSetting;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Options that steer the rule engine itself rather than a single rule.
///
/// Fields merge independently: a later layer only replaces the fields it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinterOptions {
    /// Report disable directives that suppress nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_unused_disable_directives: Option<bool>,
}

impl LinterOptions {
    /// Overlays the fields set in `other`.
    pub fn merge(&mut self, other: &Self) {
        if other.report_unused_disable_directives.is_some() {
            self.report_unused_disable_directives = other.report_unused_disable_directives;
        }
    }
}

/// An entry in a layer's `extends` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Extend {
    /// Reference to a named preset in the stack's catalog.
    Preset(String),
    /// A layer spliced in directly.
    Inline(Layer),
}

impl From<Layer> for Extend {
    fn from(layer: Layer) -> Self {
        Self::Inline(layer)
    }
}

impl From<&str> for Extend {
    fn from(name: &str) -> Self {
        Self::Preset(name.to_string())
    }
}

/// An ordered, optionally file-scoped bundle of rule assignments and settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    name: Option<String>,
    files: Vec<String>,
    ignores: Vec<String>,
    rules: BTreeMap<String, RuleSetting>,
    settings: toml::Table,
    plugins: BTreeSet<String>,
    linter_options: LinterOptions,
    extends: Vec<Extend>,
}

impl Layer {
    /// Creates an empty layer that matches every file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used in diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a match pattern.
    #[must_use]
    pub fn file(mut self, pattern: impl Into<String>) -> Self {
        self.files.push(pattern.into());
        self
    }

    /// Adds several match patterns.
    #[must_use]
    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an ignore pattern scoped to this layer.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignores.push(pattern.into());
        self
    }

    /// Assigns a rule, replacing any earlier assignment in this layer.
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, setting: impl Into<RuleSetting>) -> Self {
        self.rules.insert(name.into(), setting.into());
        self
    }

    /// Sets a top-level settings key.
    #[must_use]
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole settings table.
    #[must_use]
    pub fn with_settings(mut self, settings: toml::Table) -> Self {
        self.settings = settings;
        self
    }

    /// Declares a rule namespace.
    #[must_use]
    pub fn plugin(mut self, namespace: impl Into<String>) -> Self {
        self.plugins.insert(namespace.into());
        self
    }

    /// Sets the linter options.
    #[must_use]
    pub fn with_linter_options(mut self, options: LinterOptions) -> Self {
        self.linter_options = options;
        self
    }

    /// Appends an `extends` entry.
    #[must_use]
    pub fn extend(mut self, entry: impl Into<Extend>) -> Self {
        self.extends.push(entry.into());
        self
    }

    /// Returns the layer name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the match patterns.
    #[must_use]
    pub fn file_patterns(&self) -> &[String] {
        &self.files
    }

    /// Returns the ignore patterns.
    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignores
    }

    /// Returns the rule assignments.
    #[must_use]
    pub fn rules(&self) -> &BTreeMap<String, RuleSetting> {
        &self.rules
    }

    /// Returns the settings table.
    #[must_use]
    pub fn settings(&self) -> &toml::Table {
        &self.settings
    }

    /// Returns the declared plugin namespaces.
    #[must_use]
    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    /// Returns the linter options.
    #[must_use]
    pub fn linter_options(&self) -> &LinterOptions {
        &self.linter_options
    }

    /// Returns the `extends` entries.
    #[must_use]
    pub fn extends(&self) -> &[Extend] {
        &self.extends
    }
}

/// The frozen input of a resolution: ordered layers, the preset catalog,
/// global ignores, and the root that paths are made relative to.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    root: PathBuf,
    layers: Vec<Layer>,
    presets: BTreeMap<String, Layer>,
    ignores: Vec<String>,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// Creates an empty stack rooted at `.`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("."),
            layers: Vec::new(),
            presets: BTreeMap::new(),
            ignores: Vec::new(),
        }
    }

    /// Sets the root directory.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Appends a top-level layer.
    #[must_use]
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Registers a named preset that layers can extend.
    #[must_use]
    pub fn preset(mut self, name: impl Into<String>, layer: Layer) -> Self {
        self.presets.insert(name.into(), layer);
        self
    }

    /// Adds a global ignore pattern.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignores.push(pattern.into());
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// Returns the top-level layers in application order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a preset by name.
    #[must_use]
    pub fn find_preset(&self, name: &str) -> Option<&Layer> {
        self.presets.get(name)
    }

    /// Returns the preset names.
    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Returns the global ignore patterns.
    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn builder_collects_fields() {
        let layer = Layer::new()
            .named("shadcn")
            .files(["**/shadcn/*.tsx", "**/shadcn/*.jsx"])
            .rule("quotes", Severity::Off)
            .plugin("react")
            .extend("recommended");

        assert_eq!(layer.name(), Some("shadcn"));
        assert_eq!(layer.file_patterns().len(), 2);
        assert_eq!(layer.rules()["quotes"], RuleSetting::off());
        assert!(layer.plugins().contains("react"));
        assert_eq!(layer.extends(), &[Extend::Preset("recommended".into())]);
    }

    #[test]
    fn later_rule_in_same_layer_replaces() {
        let layer = Layer::new()
            .rule("curly", RuleSetting::warn().with_option("multi-line"))
            .rule("curly", RuleSetting::error());
        assert_eq!(layer.rules()["curly"], RuleSetting::error());
    }

    #[test]
    fn linter_options_merge_per_field() {
        let mut base = LinterOptions {
            report_unused_disable_directives: Some(true),
        };
        base.merge(&LinterOptions::default());
        assert_eq!(base.report_unused_disable_directives, Some(true));

        base.merge(&LinterOptions {
            report_unused_disable_directives: Some(false),
        });
        assert_eq!(base.report_unused_disable_directives, Some(false));
    }

    #[test]
    fn stack_presets_lookup() {
        let stack = LayerStack::new()
            .preset("recommended", Layer::new().rule("eqeqeq", Severity::Error))
            .layer(Layer::new().extend("recommended"));
        assert!(stack.find_preset("recommended").is_some());
        assert!(stack.find_preset("strict").is_none());
        assert_eq!(stack.preset_names().collect::<Vec<_>>(), ["recommended"]);
    }
}
