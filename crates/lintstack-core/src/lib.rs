//! # lintstack-core
//!
//! Layered rule-configuration resolution for static-analysis front ends.
//!
//! An ordered stack of partial rule-sets, each scoped to file patterns and
//! able to extend presets or inline layers, is folded into one
//! deterministic configuration per file. It includes:
//!
//! - [`LayerStack`] and [`Layer`] for describing the input
//! - [`resolve`] for one-off resolution and [`Resolver`] for cached,
//!   parallel resolution of many files
//! - [`RuleProvider`] and [`apply_rules`] for handing results to rule
//!   implementations
//! - [`Config`] for loading stacks from TOML
//!
//! ## Example
//!
//! ```ignore
//! use lintstack_core::{Layer, LayerStack, Resolver, Severity};
//!
//! let stack = LayerStack::new()
//!     .layer(Layer::new().named("base").rule("quotes", Severity::Error))
//!     .layer(
//!         Layer::new()
//!             .file("**/shadcn/*.tsx")
//!             .rule("quotes", Severity::Off),
//!     );
//!
//! let resolver = Resolver::new(&stack)?;
//! assert_eq!(
//!     resolver.resolve("src/ui/shadcn/button.tsx").severity_of("quotes"),
//!     Severity::Off,
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod effective;
mod format;
mod layer;
mod merge;
mod pattern;
mod provider;
mod resolve;
mod resolver;
mod types;

/// TOML loading: DTO types and validation.
pub mod declarative;

pub use config::{Config, ConfigError};
pub use effective::{rule_namespace, EffectiveConfig};
pub use format::{ArrowParens, EndOfLine, FormatError, FormatOptions, TrailingComma};
pub use layer::{Extend, Layer, LayerStack, LinterOptions};
pub use merge::merge_tables;
pub use pattern::{normalize_path, MatchPattern, PatternError, MAX_ALTERNATIVES};
pub use provider::{apply_rules, RuleProvider, RuleProviderBox, UNKNOWN_RULE};
pub use resolve::{flatten, resolve, FlatLayer, LayerError, ResolveError};
pub use resolver::Resolver;
pub use types::{
    Diagnostic, LintReport, Location, ParseSeverityError, RuleSetting, Severity,
};
