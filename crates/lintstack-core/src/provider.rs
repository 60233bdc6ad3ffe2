//! Capability interface between resolved configs and rule implementations.

use crate::effective::EffectiveConfig;
use crate::types::{Diagnostic, LintReport, Location, Severity};
use std::path::Path;
use tracing::{debug, warn};

/// Identifier used for diagnostics about unrecognised rule names.
pub const UNKNOWN_RULE: &str = "unknown-rule-identifier";

/// A set of rule implementations addressed by name.
///
/// The resolver never looks inside rule options; a provider receives them
/// exactly as the winning layer declared them.
///
/// # Example
///
/// ```ignore
/// struct NoAlert;
///
/// impl RuleProvider for NoAlert {
///     fn has_rule(&self, name: &str) -> bool { name == "no-alert" }
///
///     fn apply(&self, name: &str, _options: &[toml::Value], file: &Path) -> Vec<Diagnostic> {
///         scan_for_alert_calls(file)
///     }
/// }
/// ```
pub trait RuleProvider: Send + Sync {
    /// Whether this provider implements `name`.
    fn has_rule(&self, name: &str) -> bool;

    /// Runs rule `name` with its configured options against `file`.
    fn apply(&self, name: &str, options: &[toml::Value], file: &Path) -> Vec<Diagnostic>;
}

/// Type alias for boxed `RuleProvider` trait objects.
pub type RuleProviderBox = Box<dyn RuleProvider>;

impl<T: RuleProvider + ?Sized> RuleProvider for Box<T> {
    fn has_rule(&self, name: &str) -> bool {
        (**self).has_rule(name)
    }

    fn apply(&self, name: &str, options: &[toml::Value], file: &Path) -> Vec<Diagnostic> {
        (**self).apply(name, options, file)
    }
}

/// Several providers consulted in order; the first that knows a rule runs it.
impl<P: RuleProvider> RuleProvider for [P] {
    fn has_rule(&self, name: &str) -> bool {
        self.iter().any(|p| p.has_rule(name))
    }

    fn apply(&self, name: &str, options: &[toml::Value], file: &Path) -> Vec<Diagnostic> {
        self.iter()
            .find(|p| p.has_rule(name))
            .map(|p| p.apply(name, options, file))
            .unwrap_or_default()
    }
}

/// Runs every enabled rule of `config` against `file`.
///
/// Unknown rule names become warning diagnostics and are listed in
/// [`LintReport::unknown_rules`]; they never stop the remaining rules.
/// Diagnostics take the severity configured for their rule.
pub fn apply_rules<P>(config: &EffectiveConfig, provider: &P, file: &Path) -> LintReport
where
    P: RuleProvider + ?Sized,
{
    let mut report = LintReport::new();
    if config.is_ignored() {
        debug!("Skipping ignored file: {}", file.display());
        return report;
    }

    for (name, setting) in config.enabled_rules() {
        if !provider.has_rule(name) {
            warn!("Unknown rule: {}", name);
            report.unknown_rules.push(name.to_string());
            report.diagnostics.push(Diagnostic::new(
                UNKNOWN_RULE,
                Severity::Warn,
                Location::new(file, 1, 1),
                format!("Definition for rule `{name}` was not found"),
            ));
            continue;
        }

        let diagnostics = provider.apply(name, &setting.options, file);
        report
            .diagnostics
            .extend(diagnostics.into_iter().map(|mut d| {
                d.severity = setting.severity;
                d
            }));
    }

    report.files_checked = 1;
    report
}
