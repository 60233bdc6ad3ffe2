//! Prepared, memoizing resolver for resolving many files.

use crate::effective::EffectiveConfig;
use crate::layer::LayerStack;
use crate::resolve::{LayerError, Prepared};

use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Resolves files against a stack that was flattened and compiled once.
///
/// Results are cached by the set of flattened layers that match a path:
/// every path selecting the same layers folds to the same config. The fold
/// runs outside the lock and only the insert of a single key takes the
/// write lock, so a miss never holds up lookups of other keys for longer
/// than that insert.
///
/// # Example
///
/// ```ignore
/// let resolver = Resolver::new(&stack)?;
/// let config = resolver.resolve("src/app/page.tsx");
/// ```
#[derive(Debug)]
pub struct Resolver<'a> {
    prepared: Prepared<'a>,
    ignored: Arc<EffectiveConfig>,
    cache: RwLock<HashMap<Vec<usize>, Arc<EffectiveConfig>>>,
}

impl<'a> Resolver<'a> {
    /// Flattens the stack and compiles every pattern.
    ///
    /// # Errors
    ///
    /// Returns the first structural error in the stack.
    pub fn new(stack: &'a LayerStack) -> Result<Self, LayerError> {
        Ok(Self {
            prepared: Prepared::new(stack)?,
            ignored: Arc::new(EffectiveConfig::ignored()),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Resolves one file.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Arc<EffectiveConfig> {
        let Some(normalized) = self.prepared.normalize(path) else {
            debug!("{path}: outside root, ignored");
            return Arc::clone(&self.ignored);
        };
        if self.prepared.is_ignored(&normalized) {
            debug!("{normalized}: ignored");
            return Arc::clone(&self.ignored);
        }

        let key = self.prepared.matching(&normalized);
        if let Some(hit) = self.lookup(&key) {
            debug!("{normalized}: cache hit");
            return hit;
        }

        let computed = Arc::new(self.prepared.fold(&key));
        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(cache.entry(key).or_insert(computed))
    }

    /// Resolves many files in parallel, preserving input order.
    #[must_use]
    pub fn resolve_all<S>(&self, paths: &[S]) -> Vec<Arc<EffectiveConfig>>
    where
        S: AsRef<str> + Sync,
    {
        let resolved: Vec<_> = paths.par_iter().map(|p| self.resolve(p.as_ref())).collect();
        info!(
            "Resolved {} files into {} distinct configs",
            resolved.len(),
            self.cached_configs()
        );
        resolved
    }

    /// Number of distinct configurations computed so far.
    #[must_use]
    pub fn cached_configs(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn lookup(&self, key: &[usize]) -> Option<Arc<EffectiveConfig>> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
