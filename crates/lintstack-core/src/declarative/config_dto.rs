//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use crate::format::FormatOptions;
use crate::layer::LinterOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw TOML representation of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigDto {
    /// Directory that match patterns are relative to.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Global ignore patterns.
    #[serde(default)]
    pub ignores: Vec<String>,

    /// Named layers that `extends` can reference.
    #[serde(default)]
    pub presets: BTreeMap<String, LayerDto>,

    /// Top-level layers in application order.
    #[serde(default)]
    pub layers: Vec<LayerDto>,

    /// Formatter preferences.
    #[serde(default)]
    pub format: Option<FormatOptions>,
}

/// TOML representation of one layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LayerDto {
    /// Optional label.
    #[serde(default)]
    pub name: Option<String>,
    /// Match patterns.
    #[serde(default)]
    pub files: Vec<String>,
    /// Layer-scoped ignore patterns.
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Preset names or inline layers applied before this one.
    #[serde(default)]
    pub extends: Vec<ExtendDto>,
    /// Declared rule namespaces.
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Raw rule entries; shapes are checked by the loader.
    #[serde(default)]
    pub rules: BTreeMap<String, toml::Value>,
    /// Shared settings.
    #[serde(default)]
    pub settings: toml::Table,
    /// Rule engine options.
    #[serde(default)]
    pub linter_options: Option<LinterOptions>,
}

/// TOML representation of an `extends` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtendDto {
    /// `extends = ["recommended"]`
    Preset(String),
    /// `extends = [{ rules = { ... } }]`
    Inline(Box<LayerDto>),
}
