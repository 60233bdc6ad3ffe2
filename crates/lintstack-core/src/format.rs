//! Formatter preferences.
//!
//! A flat object handed to the external formatter as-is. It takes no part
//! in layering: there is exactly one per configuration.

use serde::{Deserialize, Serialize};

/// Where trailing commas are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    /// Wherever the target syntax allows them.
    #[default]
    All,
    /// Where valid in ES5 (objects, arrays).
    Es5,
    /// Never.
    None,
}

/// Parentheses around a sole arrow-function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowParens {
    /// `(x) => x`
    #[default]
    Always,
    /// `x => x`
    Avoid,
}

/// Line ending style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
    /// `\r`
    Cr,
    /// Keep whatever the file already uses.
    Auto,
}

/// Formatting preferences. Missing keys take the formatter's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormatOptions {
    /// Line width the printer wraps at.
    pub print_width: u32,
    /// Spaces per indentation level.
    pub tab_width: u32,
    /// Indent with tabs instead of spaces.
    pub use_tabs: bool,
    /// Print semicolons at the ends of statements.
    pub semi: bool,
    /// Prefer single quotes.
    pub single_quote: bool,
    /// Prefer single quotes in JSX attributes.
    pub jsx_single_quote: bool,
    /// Trailing comma policy.
    pub trailing_comma: TrailingComma,
    /// Spaces inside object literal braces.
    pub bracket_spacing: bool,
    /// Put the `>` of a multi-line element on the last attribute line.
    pub bracket_same_line: bool,
    /// Arrow-function parameter parentheses.
    pub arrow_parens: ArrowParens,
    /// One attribute per line in markup.
    pub single_attribute_per_line: bool,
    /// Line endings.
    pub end_of_line: EndOfLine,
    /// Formatter plugins to load.
    pub plugins: Vec<String>,
    /// Plugin-specific options, passed through untouched.
    #[serde(skip_serializing_if = "toml::Table::is_empty")]
    pub extra: toml::Table,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            tab_width: 2,
            use_tabs: false,
            semi: true,
            single_quote: false,
            jsx_single_quote: false,
            trailing_comma: TrailingComma::All,
            bracket_spacing: true,
            bracket_same_line: false,
            arrow_parens: ArrowParens::Always,
            single_attribute_per_line: false,
            end_of_line: EndOfLine::Lf,
            plugins: Vec::new(),
            extra: toml::Table::new(),
        }
    }
}

/// Rejected formatter preferences.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A width that must be positive was zero.
    #[error("format.{field} must be greater than zero")]
    ZeroWidth {
        /// Offending key.
        field: &'static str,
    },
}

impl FormatOptions {
    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error when `print-width` or `tab-width` is zero.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.print_width == 0 {
            return Err(FormatError::ZeroWidth {
                field: "print-width",
            });
        }
        if self.tab_width == 0 {
            return Err(FormatError::ZeroWidth { field: "tab-width" });
        }
        Ok(())
    }
}
