//! Glob-style match patterns over forward-slash normalized paths.
//!
//! Patterns are split into `/` separated segments:
//!
//! - `**` matches any number of segments (including zero)
//! - `*`, `?` and `[...]` match within a single segment
//! - `{a,b}` expands into alternatives before compilation (may nest), up
//!   to [`MAX_ALTERNATIVES`] per pattern
//! - a trailing `/` matches everything below that directory
//! - a trailing `**` matches the directory itself as well as everything
//!   below it, so `.next/**` matches `.next`
//!
//! Matching is case-sensitive.

use glob::MatchOptions;
use std::fmt;
use std::path::{Component, Path};

/// Upper bound on the alternatives one pattern may expand into.
pub const MAX_ALTERNATIVES: usize = 256;

const SEGMENT_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Error produced when a pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct PatternError {
    /// Why the pattern was rejected.
    pub reason: String,
}

impl PatternError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    AnyDepth,
    Literal(String),
    Glob(glob::Pattern),
}

impl Segment {
    fn matches(&self, part: &str) -> bool {
        match self {
            Self::AnyDepth => true,
            Self::Literal(lit) => lit == part,
            Self::Glob(pattern) => pattern.matches_with(part, SEGMENT_OPTIONS),
        }
    }
}

/// A compiled match pattern.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    raw: String,
    alternatives: Vec<Vec<Segment>>,
}

impl MatchPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error for empty patterns, unbalanced braces, and segments
    /// the glob syntax rejects (e.g. `a**b`, `[a-`).
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::new("pattern is empty"));
        }

        let alternatives = expand_braces(pattern)?
            .iter()
            .map(|alt| compile_alternative(alt))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: pattern.to_string(),
            alternatives,
        })
    }

    /// Tests a path that is already relative and `/` separated.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        self.alternatives
            .iter()
            .any(|segments| match_parts(&parts, segments))
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn compile_alternative(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let mut body = pattern.trim_start_matches("./").trim_start_matches('/');
    let directory = body.ends_with('/');
    body = body.trim_end_matches('/');

    let mut segments = body
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(compile_segment)
        .collect::<Result<Vec<_>, _>>()?;

    if directory {
        segments.push(Segment::AnyDepth);
    }
    if segments.is_empty() {
        return Err(PatternError::new("pattern has no path segments"));
    }
    Ok(segments)
}

fn compile_segment(segment: &str) -> Result<Segment, PatternError> {
    if segment == "**" {
        return Ok(Segment::AnyDepth);
    }
    if segment.contains("**") {
        return Err(PatternError::new(format!(
            "`**` must form a whole path segment, found `{segment}`"
        )));
    }
    if !segment.contains(['*', '?', '[', ']']) {
        return Ok(Segment::Literal(segment.to_string()));
    }
    glob::Pattern::new(segment)
        .map(Segment::Glob)
        .map_err(|e| PatternError::new(format!("`{segment}`: {}", e.msg)))
}

fn match_parts(path: &[&str], pattern: &[Segment]) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match first {
        Segment::AnyDepth => (0..=path.len()).any(|i| match_parts(&path[i..], rest)),
        segment => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_parts(tail, rest),
            None => false,
        },
    }
}

/// Expands `{a,b}` alternatives, innermost groups included.
fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err(PatternError::new("unmatched `}`"));
        }
        return Ok(vec![pattern.to_string()]);
    };

    let prefix = &pattern[..open];
    if prefix.contains('}') {
        return Err(PatternError::new("unmatched `}`"));
    }

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let at = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(at);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(at),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| PatternError::new("unmatched `{`"))?;

    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    let suffix = &pattern[close + 1..];
    let mut expanded = Vec::new();
    for window in bounds.windows(2) {
        let choice = &pattern[window[0] + 1..window[1]];
        let combined = format!("{prefix}{choice}{suffix}");
        expanded.extend(expand_braces(&combined)?);
        if expanded.len() > MAX_ALTERNATIVES {
            return Err(PatternError::new(format!(
                "brace expansion exceeds {MAX_ALTERNATIVES} alternatives"
            )));
        }
    }
    Ok(expanded)
}

/// Normalizes a file path for matching: `/` separators, relative to `root`,
/// with `.` segments dropped and `..` segments folded into their parent.
///
/// Returns `None` for paths outside `root`: an absolute path not below an
/// absolute root, or a relative path whose `..` climbs above it. Absolute
/// paths against a relative root are taken as already rooted.
#[must_use]
pub fn normalize_path(root: &Path, path: &str) -> Option<String> {
    let unified = path.replace('\\', "/");
    let as_path = Path::new(&unified);
    let relative = if as_path.is_absolute() && root.is_absolute() {
        as_path.strip_prefix(root).ok()?
    } else {
        as_path
    };

    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.join("/"))
}
