//! DTO → Domain model conversion with validation.

use crate::format::{FormatError, FormatOptions};
use crate::layer::{Extend, Layer, LayerStack};
use crate::types::{RuleSetting, Severity};

use super::config_dto::{ConfigDto, ExtendDto, LayerDto};

/// Errors during DTO → Domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Unknown severity string or level.
    #[error("{context}: unknown severity `{value}`, expected: off, warn, error, 0, 1, 2")]
    UnknownSeverity {
        /// Where the error occurred (e.g., "layers[0].rules.curly").
        context: String,
        /// The invalid value.
        value: String,
    },

    /// A rule entry has a shape the loader does not accept.
    #[error("{context}: {reason}")]
    InvalidRuleSetting {
        /// Where the error occurred.
        context: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A rule identifier is empty.
    #[error("{context}: rule name must not be empty")]
    EmptyRuleName {
        /// The `rules` table holding the entry.
        context: String,
    },

    /// Formatter preferences are out of range.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Validated result of loading a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// The frozen layer stack.
    pub stack: LayerStack,
    /// Formatter preferences.
    pub format: FormatOptions,
}

/// Converts a `ConfigDto` to a validated [`LayerStack`] and format options.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: ConfigDto) -> Result<Loaded, LoadError> {
    let mut stack = LayerStack::new();
    if let Some(root) = dto.root {
        stack = stack.root(root);
    }
    for pattern in dto.ignores {
        stack = stack.ignore(pattern);
    }
    for (name, preset) in dto.presets {
        let layer = convert_layer(preset, &format!("presets.{name}"))?;
        stack = stack.preset(name, layer);
    }
    for (i, layer) in dto.layers.into_iter().enumerate() {
        stack = stack.layer(convert_layer(layer, &format!("layers[{i}]"))?);
    }

    let format = dto.format.unwrap_or_default();
    format.validate()?;

    Ok(Loaded { stack, format })
}

fn convert_layer(dto: LayerDto, ctx: &str) -> Result<Layer, LoadError> {
    let mut layer = Layer::new()
        .files(dto.files)
        .with_settings(dto.settings);

    if let Some(name) = dto.name {
        layer = layer.named(name);
    }
    for pattern in dto.ignores {
        layer = layer.ignore(pattern);
    }
    for plugin in dto.plugins {
        layer = layer.plugin(plugin);
    }
    if let Some(options) = dto.linter_options {
        layer = layer.with_linter_options(options);
    }

    for (j, entry) in dto.extends.into_iter().enumerate() {
        layer = match entry {
            ExtendDto::Preset(name) => layer.extend(Extend::Preset(name)),
            ExtendDto::Inline(child) => {
                let child = convert_layer(*child, &format!("{ctx}.extends[{j}]"))?;
                layer.extend(Extend::Inline(child))
            }
        };
    }

    for (name, value) in dto.rules {
        if name.trim().is_empty() {
            return Err(LoadError::EmptyRuleName {
                context: format!("{ctx}.rules"),
            });
        }
        let setting = parse_rule_setting(&value, &format!("{ctx}.rules.{name}"))?;
        layer = layer.rule(name, setting);
    }

    Ok(layer)
}

/// Parses the accepted rule entry shapes:
///
/// - `"error"` / `2`
/// - `["warn", option, ...]`
/// - `{ severity = "warn", options = [option, ...] }`
fn parse_rule_setting(value: &toml::Value, context: &str) -> Result<RuleSetting, LoadError> {
    match value {
        toml::Value::String(_) | toml::Value::Integer(_) => {
            Ok(RuleSetting::new(parse_severity(value, context)?))
        }
        toml::Value::Array(items) => {
            let (head, options) = items.split_first().ok_or_else(|| invalid(
                context,
                "array form needs a severity as its first element",
            ))?;
            Ok(RuleSetting {
                severity: parse_severity(head, context)?,
                options: options.to_vec(),
            })
        }
        toml::Value::Table(table) => {
            if let Some(key) = table
                .keys()
                .find(|k| k.as_str() != "severity" && k.as_str() != "options")
            {
                return Err(invalid(context, &format!("unexpected key `{key}`")));
            }
            let severity = table
                .get("severity")
                .ok_or_else(|| invalid(context, "table form needs a `severity` key"))?;
            let options = match table.get("options") {
                None => Vec::new(),
                Some(toml::Value::Array(items)) => items.clone(),
                Some(_) => return Err(invalid(context, "`options` must be an array")),
            };
            Ok(RuleSetting {
                severity: parse_severity(severity, context)?,
                options,
            })
        }
        other => Err(invalid(
            context,
            &format!("expected a severity, array or table, found {}", other.type_str()),
        )),
    }
}

fn parse_severity(value: &toml::Value, context: &str) -> Result<Severity, LoadError> {
    let unknown = || LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    };
    match value {
        toml::Value::String(s) => s.parse().map_err(|_| unknown()),
        toml::Value::Integer(level) => Severity::from_level(*level).ok_or_else(unknown),
        _ => Err(unknown()),
    }
}

fn invalid(context: &str, reason: &str) -> LoadError {
    LoadError::InvalidRuleSetting {
        context: context.to_string(),
        reason: reason.to_string(),
    }
}
