//! Ordered container of the modules that make up one match.

use crate::error::MatchError;
use crate::manifest::MatchManifest;
use crate::module::{instance_key, LoadPhase, MatchModule};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered module container with typed and phase-based lookup.
///
/// Registry order is core modules followed by game modules, each in manifest
/// order. The contents are fixed once [`allocate`](Self::allocate) has run.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn MatchModule>>,
    allocated: bool,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the registry from a manifest: core modules, then game modules.
    ///
    /// May only run once; later calls fail with [`MatchError::AlreadyAllocated`]
    /// even after the modules were released. A manifest that returns the same
    /// instance twice is rejected with [`MatchError::DuplicateModule`] and the
    /// registry stays empty.
    pub fn allocate(&mut self, manifest: &dyn MatchManifest) -> Result<usize, MatchError> {
        if self.allocated {
            return Err(MatchError::AlreadyAllocated);
        }

        let mut modules = manifest.core_modules();
        modules.extend(manifest.game_modules());

        let mut seen = HashSet::with_capacity(modules.len());
        for module in &modules {
            if !seen.insert(instance_key(module)) {
                return Err(MatchError::DuplicateModule(module.name().to_string()));
            }
        }

        self.allocated = true;
        self.modules = modules;
        Ok(self.modules.len())
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All modules in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MatchModule>> {
        self.modules.iter()
    }

    /// Snapshot of all modules in registry order.
    pub fn modules(&self) -> Vec<Arc<dyn MatchModule>> {
        self.modules.clone()
    }

    /// First module of concrete type `T`, if any.
    pub fn first_of_type<T: MatchModule>(&self) -> Option<Arc<T>> {
        self.modules.iter().find_map(downcast::<T>)
    }

    /// Every module of concrete type `T`, in registry order.
    pub fn all_of_type<T: MatchModule>(&self) -> Vec<Arc<T>> {
        self.modules.iter().filter_map(downcast::<T>).collect()
    }

    /// First module for which `query` yields a capability.
    ///
    /// ```rust,ignore
    /// let listener = registry.first_matching(|module| module.as_listener());
    /// ```
    pub fn first_matching<C, F>(&self, query: F) -> Option<Arc<C>>
    where
        C: ?Sized,
        F: Fn(Arc<dyn MatchModule>) -> Option<Arc<C>>,
    {
        self.modules.iter().find_map(|module| query(module.clone()))
    }

    /// Every capability `query` yields, in registry order.
    pub fn all_matching<C, F>(&self, query: F) -> Vec<Arc<C>>
    where
        C: ?Sized,
        F: Fn(Arc<dyn MatchModule>) -> Option<Arc<C>>,
    {
        self.modules
            .iter()
            .filter_map(|module| query(module.clone()))
            .collect()
    }

    /// Modules declaring `phase`, in registry order.
    pub fn by_phase(&self, phase: LoadPhase) -> Vec<Arc<dyn MatchModule>> {
        self.modules
            .iter()
            .filter(|module| module.load_phase() == phase)
            .cloned()
            .collect()
    }

    /// Drops every module reference held by the registry.
    pub fn release(&mut self) -> usize {
        let released = self.modules.len();
        self.modules.clear();
        released
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("allocated", &self.allocated)
            .finish()
    }
}

fn downcast<T: MatchModule>(module: &Arc<dyn MatchModule>) -> Option<Arc<T>> {
    if !(**module).as_any().is::<T>() {
        return None;
    }
    module.clone().into_any_arc().downcast::<T>().ok()
}
