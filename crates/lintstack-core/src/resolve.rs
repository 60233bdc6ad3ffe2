//! Layer flattening and per-file resolution.
//!
//! ```text
//! LayerStack
//!   ↓ flatten (depth-first pre-order over `extends`)
//! [flat layer, ...]        strict application order
//!   ↓ compile patterns
//! Prepared
//!   ↓ filter by path, fold left-to-right
//! EffectiveConfig
//! ```

use crate::effective::EffectiveConfig;
use crate::layer::{Extend, Layer, LayerStack};
use crate::pattern::{normalize_path, MatchPattern};
use miette::Diagnostic;
use tracing::debug;

/// Structural configuration errors.
///
/// `layer` is a label such as `layers[2] (shadcn) > preset "strict"` that
/// locates the offending layer in the flattened expansion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum LayerError {
    /// `extends` revisited a preset that is still being expanded.
    #[error("cyclic extension at {layer}: {}", .chain.join(" -> "))]
    #[diagnostic(
        code(lintstack::cyclic_extension),
        help("a preset must not extend itself, directly or through other presets")
    )]
    CyclicExtension {
        /// Layer whose `extends` closed the cycle.
        layer: String,
        /// Preset names from the first visit back to the repeated one.
        chain: Vec<String>,
    },

    /// A `files` or `ignores` entry could not be compiled.
    #[error("invalid pattern `{pattern}` in {layer}: {reason}")]
    #[diagnostic(code(lintstack::unknown_pattern_syntax))]
    UnknownPatternSyntax {
        /// Layer holding the pattern.
        layer: String,
        /// The pattern as written.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// `extends` named a preset the stack does not define.
    #[error("{layer} extends unknown preset `{name}`")]
    #[diagnostic(code(lintstack::unknown_preset))]
    UnknownPreset {
        /// Layer holding the reference.
        layer: String,
        /// The missing preset name.
        name: String,
    },
}

impl LayerError {
    /// Attaches the file path whose resolution hit this error.
    #[must_use]
    pub fn for_path(self, path: impl Into<String>) -> ResolveError {
        ResolveError {
            path: path.into(),
            kind: self,
        }
    }

    /// Returns the label of the offending layer.
    #[must_use]
    pub fn layer(&self) -> &str {
        match self {
            Self::CyclicExtension { layer, .. }
            | Self::UnknownPatternSyntax { layer, .. }
            | Self::UnknownPreset { layer, .. } => layer,
        }
    }
}

/// A failed resolution of one file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("cannot resolve configuration for `{path}`: {kind}")]
#[diagnostic(code(lintstack::resolve))]
pub struct ResolveError {
    path: String,
    kind: LayerError,
}

impl ResolveError {
    /// Returns the file path being resolved.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the underlying structural error.
    #[must_use]
    pub fn kind(&self) -> &LayerError {
        &self.kind
    }
}

/// A layer placed in its final application position.
#[derive(Debug, Clone)]
pub struct FlatLayer<'a> {
    /// Where the layer came from, for diagnostics.
    pub label: String,
    /// The layer itself.
    pub layer: &'a Layer,
    /// Index of the flattened layer whose `extends` pulled this one in.
    ///
    /// A child only applies where its parent applies, so its own `files`
    /// and `ignores` narrow the parent's scope further.
    pub parent: Option<usize>,
}

/// Flattens the stack by depth-first pre-order expansion of `extends`.
///
/// For each layer its `extends` entries are expanded first, in order, then
/// the layer itself is appended. Each child records its parent, so at
/// resolution time it only applies where the parent also applies.
///
/// # Errors
///
/// Returns [`LayerError::CyclicExtension`] when a preset is reached again
/// while still on the expansion stack, and [`LayerError::UnknownPreset`]
/// for dangling names.
pub fn flatten(stack: &LayerStack) -> Result<Vec<FlatLayer<'_>>, LayerError> {
    let mut out = Vec::new();
    let mut expanding = Vec::new();
    for (i, layer) in stack.layers().iter().enumerate() {
        let label = match layer.name() {
            Some(name) => format!("layers[{i}] ({name})"),
            None => format!("layers[{i}]"),
        };
        expand(stack, layer, label, &mut expanding, &mut out)?;
    }
    Ok(out)
}

fn expand<'a>(
    stack: &'a LayerStack,
    layer: &'a Layer,
    label: String,
    expanding: &mut Vec<String>,
    out: &mut Vec<FlatLayer<'a>>,
) -> Result<(), LayerError> {
    let first_child = out.len();
    for (j, entry) in layer.extends().iter().enumerate() {
        match entry {
            Extend::Preset(name) => {
                if let Some(start) = expanding.iter().position(|n| n == name) {
                    let mut chain = expanding[start..].to_vec();
                    chain.push(name.clone());
                    return Err(LayerError::CyclicExtension { layer: label, chain });
                }
                let preset = stack
                    .find_preset(name)
                    .ok_or_else(|| LayerError::UnknownPreset {
                        layer: label.clone(),
                        name: name.clone(),
                    })?;
                expanding.push(name.clone());
                expand(
                    stack,
                    preset,
                    format!("{label} > preset \"{name}\""),
                    expanding,
                    out,
                )?;
                expanding.pop();
            }
            Extend::Inline(child) => {
                let child_label = match child.name() {
                    Some(name) => format!("{label} > extends[{j}] ({name})"),
                    None => format!("{label} > extends[{j}]"),
                };
                expand(stack, child, child_label, expanding, out)?;
            }
        }
    }
    let me = out.len();
    for child in &mut out[first_child..] {
        if child.parent.is_none() {
            child.parent = Some(me);
        }
    }
    out.push(FlatLayer {
        label,
        layer,
        parent: None,
    });
    Ok(())
}

#[derive(Debug)]
pub(crate) struct CompiledLayer<'a> {
    pub(crate) label: String,
    pub(crate) layer: &'a Layer,
    parent: Option<usize>,
    files: Vec<MatchPattern>,
    ignores: Vec<MatchPattern>,
}

impl CompiledLayer<'_> {
    fn accepts(&self, path: &str) -> bool {
        let selected = self.files.is_empty() || self.files.iter().any(|p| p.matches(path));
        selected && !self.ignores.iter().any(|p| p.matches(path))
    }
}

/// A flattened stack with every pattern compiled.
#[derive(Debug)]
pub(crate) struct Prepared<'a> {
    stack: &'a LayerStack,
    layers: Vec<CompiledLayer<'a>>,
    global_ignores: Vec<MatchPattern>,
}

impl<'a> Prepared<'a> {
    pub(crate) fn new(stack: &'a LayerStack) -> Result<Self, LayerError> {
        let layers = flatten(stack)?
            .into_iter()
            .map(|flat| -> Result<CompiledLayer<'a>, LayerError> {
                let files = compile_all(flat.layer.file_patterns(), &flat.label)?;
                let ignores = compile_all(flat.layer.ignore_patterns(), &flat.label)?;
                Ok(CompiledLayer {
                    label: flat.label,
                    layer: flat.layer,
                    parent: flat.parent,
                    files,
                    ignores,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let global_ignores = compile_all(stack.ignore_patterns(), "ignores")?;

        debug!(
            "Prepared {} flattened layers, {} global ignores",
            layers.len(),
            global_ignores.len()
        );

        Ok(Self {
            stack,
            layers,
            global_ignores,
        })
    }

    /// `None` when `path` lies outside the stack root.
    pub(crate) fn normalize(&self, path: &str) -> Option<String> {
        normalize_path(self.stack.root_dir(), path)
    }

    pub(crate) fn is_ignored(&self, normalized: &str) -> bool {
        self.global_ignores.iter().any(|p| p.matches(normalized))
    }

    /// Indices of the flattened layers that apply to `normalized`.
    ///
    /// A parent always follows its `extends` children, so walking backwards
    /// decides every parent before its children.
    pub(crate) fn matching(&self, normalized: &str) -> Vec<usize> {
        let mut applies = vec![false; self.layers.len()];
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let in_parent_scope = layer.parent.map_or(true, |p| applies[p]);
            applies[i] = in_parent_scope && layer.accepts(normalized);
        }
        (0..self.layers.len()).filter(|&i| applies[i]).collect()
    }

    pub(crate) fn fold(&self, indices: &[usize]) -> EffectiveConfig {
        let mut acc = EffectiveConfig::default();
        for &i in indices {
            let compiled = &self.layers[i];
            acc.apply(&compiled.label, compiled.layer);
        }
        acc
    }

    pub(crate) fn resolve(&self, path: &str) -> EffectiveConfig {
        let Some(normalized) = self.normalize(path) else {
            debug!("{path}: outside root, ignored");
            return EffectiveConfig::ignored();
        };
        if self.is_ignored(&normalized) {
            debug!("{normalized}: ignored");
            return EffectiveConfig::ignored();
        }
        let indices = self.matching(&normalized);
        debug!("{normalized}: {} matching layers", indices.len());
        self.fold(&indices)
    }
}

fn compile_all(patterns: &[String], label: &str) -> Result<Vec<MatchPattern>, LayerError> {
    patterns
        .iter()
        .map(|p| {
            MatchPattern::new(p).map_err(|e| LayerError::UnknownPatternSyntax {
                layer: label.to_string(),
                pattern: p.clone(),
                reason: e.reason,
            })
        })
        .collect()
}

/// Computes the effective configuration of `path`.
///
/// A pure function of its inputs: the same stack and path always give a
/// deep-equal result.
///
/// # Errors
///
/// Returns a [`ResolveError`] naming the path and the offending layer when
/// the stack has a cyclic or dangling `extends`, or an invalid pattern.
pub fn resolve(stack: &LayerStack, path: &str) -> Result<EffectiveConfig, ResolveError> {
    let prepared = Prepared::new(stack).map_err(|e| e.for_path(path))?;
    Ok(prepared.resolve(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleSetting, Severity};

    fn labels(flat: &[FlatLayer<'_>]) -> Vec<String> {
        flat.iter().map(|f| f.label.clone()).collect()
    }

    #[test]
    fn flatten_is_pre_order() {
        let stack = LayerStack::new()
            .preset("z", Layer::new())
            .preset("y", Layer::new().extend("z"))
            .layer(Layer::new().named("x").extend("y"))
            .layer(Layer::new());

        let flat = flatten(&stack).unwrap();
        assert_eq!(
            labels(&flat),
            vec![
                "layers[0] (x) > preset \"y\" > preset \"z\"",
                "layers[0] (x) > preset \"y\"",
                "layers[0] (x)",
                "layers[1]",
            ]
        );
        let parents: Vec<_> = flat.iter().map(|f| f.parent).collect();
        assert_eq!(parents, vec![Some(1), Some(2), None, None]);
    }

    #[test]
    fn flatten_inline_children_in_order() {
        let stack = LayerStack::new().layer(
            Layer::new()
                .extend(Layer::new().named("a"))
                .extend(Layer::new().named("b")),
        );
        let flat = flatten(&stack).unwrap();
        assert_eq!(
            labels(&flat),
            vec![
                "layers[0] > extends[0] (a)",
                "layers[0] > extends[1] (b)",
                "layers[0]",
            ]
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let stack = LayerStack::new()
            .preset("base", Layer::new())
            .preset("left", Layer::new().extend("base"))
            .preset("right", Layer::new().extend("base"))
            .layer(Layer::new().extend("left").extend("right"));
        assert_eq!(flatten(&stack).unwrap().len(), 5);
    }

    #[test]
    fn cycle_reports_chain() {
        let stack = LayerStack::new()
            .preset("a", Layer::new().extend("b"))
            .preset("b", Layer::new().extend("a"))
            .layer(Layer::new().extend("a"));

        let err = flatten(&stack).unwrap_err();
        match err {
            LayerError::CyclicExtension { layer, chain } => {
                assert_eq!(chain, vec!["a", "b", "a"]);
                assert_eq!(layer, "layers[0] > preset \"a\" > preset \"b\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_extension_is_a_cycle() {
        let stack = LayerStack::new()
            .preset("a", Layer::new().extend("a"))
            .layer(Layer::new().extend("a"));
        assert!(matches!(
            flatten(&stack),
            Err(LayerError::CyclicExtension { .. })
        ));
    }

    #[test]
    fn unknown_preset() {
        let stack = LayerStack::new().layer(Layer::new().named("base").extend("missing"));
        let err = resolve(&stack, "src/a.ts").unwrap_err();
        assert_eq!(err.path(), "src/a.ts");
        assert_eq!(
            err.kind(),
            &LayerError::UnknownPreset {
                layer: "layers[0] (base)".into(),
                name: "missing".into(),
            }
        );
    }

    #[test]
    fn bad_pattern_names_layer_and_file() {
        let stack = LayerStack::new()
            .layer(Layer::new())
            .layer(Layer::new().named("tests").file("src/**.test.ts"));
        let err = resolve(&stack, "src/a.test.ts").unwrap_err();
        assert_eq!(err.kind().layer(), "layers[1] (tests)");
        let message = err.to_string();
        assert!(message.contains("src/a.test.ts"));
        assert!(message.contains("src/**.test.ts"));
    }

    #[test]
    fn bad_global_ignore_is_reported() {
        let stack = LayerStack::new().ignore("build/{a");
        let err = resolve(&stack, "src/a.ts").unwrap_err();
        assert_eq!(err.kind().layer(), "ignores");
    }

    #[test]
    fn layer_ignores_exclude_files() {
        let stack = LayerStack::new().layer(
            Layer::new()
                .file("src/**")
                .ignore("src/generated/**")
                .rule("eqeqeq", Severity::Error),
        );
        assert_eq!(
            resolve(&stack, "src/app.ts").unwrap().severity_of("eqeqeq"),
            Severity::Error
        );
        assert_eq!(
            resolve(&stack, "src/generated/api.ts")
                .unwrap()
                .severity_of("eqeqeq"),
            Severity::Off
        );
    }

    #[test]
    fn global_ignores_short_circuit() {
        let stack = LayerStack::new()
            .ignore("**/*.d.ts")
            .layer(Layer::new().rule("eqeqeq", RuleSetting::error()));
        let effective = resolve(&stack, "types/env.d.ts").unwrap();
        assert!(effective.is_ignored());
        assert!(effective.rules().is_empty());
    }

    #[test]
    fn absolute_paths_are_made_relative_to_root() {
        let stack = LayerStack::new()
            .root("/repo")
            .layer(Layer::new().file("src/*.ts").rule("eqeqeq", Severity::Warn));
        let effective = resolve(&stack, "/repo/src/main.ts").unwrap();
        assert_eq!(effective.severity_of("eqeqeq"), Severity::Warn);
    }

    #[test]
    fn paths_outside_root_are_ignored() {
        let stack = LayerStack::new()
            .root("/repo")
            .layer(Layer::new().rule("eqeqeq", Severity::Warn));
        for path in ["/elsewhere/src/main.ts", "../sibling/main.ts"] {
            let effective = resolve(&stack, path).unwrap();
            assert!(effective.is_ignored(), "{path}");
            assert!(effective.rules().is_empty());
        }
    }

    #[test]
    fn extended_preset_stays_within_parent_files() {
        let stack = LayerStack::new()
            .preset("type-checked", Layer::new().rule("no-floating-promises", Severity::Error))
            .layer(
                Layer::new()
                    .named("configs")
                    .file("**/*.config.mjs")
                    .extend("type-checked"),
            );

        let config = resolve(&stack, "next.config.mjs").unwrap();
        assert_eq!(config.severity_of("no-floating-promises"), Severity::Error);
        assert_eq!(config.applied_layers().len(), 2);

        let source = resolve(&stack, "src/app/page.ts").unwrap();
        assert_eq!(source.severity_of("no-floating-promises"), Severity::Off);
        assert!(source.applied_layers().is_empty());
    }

    #[test]
    fn extended_layer_respects_parent_ignores_and_its_own_files() {
        let stack = LayerStack::new().layer(
            Layer::new()
                .file("src/**")
                .ignore("src/generated/**")
                .extend(Layer::new().file("**/*.tsx").rule("react/jsx-key", Severity::Error)),
        );

        let jsx = |path: &str| resolve(&stack, path).unwrap().severity_of("react/jsx-key");
        assert_eq!(jsx("src/app/page.tsx"), Severity::Error);
        assert_eq!(jsx("src/app/route.ts"), Severity::Off);
        assert_eq!(jsx("src/generated/schema.tsx"), Severity::Off);
        assert_eq!(jsx("stories/button.tsx"), Severity::Off);
    }

    #[test]
    fn scope_narrows_through_every_ancestor() {
        let stack = LayerStack::new()
            .preset("leaf", Layer::new().rule("eqeqeq", Severity::Error))
            .preset("middle", Layer::new().file("**/*.ts").extend("leaf"))
            .layer(Layer::new().file("src/**").extend("middle"));

        let eqeqeq = |path: &str| resolve(&stack, path).unwrap().severity_of("eqeqeq");
        assert_eq!(eqeqeq("src/a.ts"), Severity::Error);
        assert_eq!(eqeqeq("src/a.js"), Severity::Off);
        assert_eq!(eqeqeq("scripts/a.ts"), Severity::Off);
    }
}
