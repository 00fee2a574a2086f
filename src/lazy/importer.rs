//! Module registry and imported-module table
//!
//! An [`Importer`] knows how to build modules (registered loaders) and
//! remembers which ones were already built. Importing the same name twice
//! returns the same `Arc<Module>`.

use super::module::Module;
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::Duration;

thread_local! {
    // (importer, module) pairs whose loader is running on this thread.
    static LOADING: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

// Marks a module as loading on this thread until dropped.
struct LoadingGuard;

impl LoadingGuard {
    fn enter(importer: usize, name: &str) -> Self {
        LOADING.with(|l| l.borrow_mut().push((importer, name.to_string())));
        LoadingGuard
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        LOADING.with(|l| {
            l.borrow_mut().pop();
        });
    }
}

/// Builds a module on first import.
pub type Loader = Arc<dyn Fn() -> anyhow::Result<Module> + Send + Sync>;

type Slot = Arc<Mutex<Option<Arc<Module>>>>;

/// One reported import duration.
#[derive(Debug, Clone)]
pub struct ImportTiming {
    /// `module` or `module.attr`
    pub target: String,
    pub module: String,
    pub elapsed: Duration,
}

impl ImportTiming {
    pub fn message(&self) -> String {
        format!(
            "importing \"{}\" took {:.3}s",
            self.target,
            self.elapsed.as_secs_f64()
        )
    }
}

#[derive(Default)]
struct Inner {
    loaders: RwLock<HashMap<String, Loader>>,
    modules: Mutex<HashMap<String, Slot>>,
    timings: Mutex<Vec<ImportTiming>>,
}

/// Shared handle to a module registry. Clones point at the same registry.
#[derive(Clone, Default)]
pub struct Importer {
    inner: Arc<Inner>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Importer pre-populated with the crate's own helper modules.
    pub fn with_builtins() -> Self {
        let importer = Self::new();
        super::builtins::register(&importer);
        importer
    }

    /// Register a loader under a dotted module name, replacing any previous one.
    ///
    /// Modules that were already imported keep their cached value.
    pub fn register<F>(&self, name: &str, loader: F) -> &Self
    where
        F: Fn() -> anyhow::Result<Module> + Send + Sync + 'static,
    {
        self.inner
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(loader));
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.inner
            .loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Place an already-built module in the imported table.
    pub fn insert(&self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        let slot = self.slot(module.name());
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(module.clone());
        module
    }

    /// Whether `name` has been imported (successfully) already.
    pub fn is_loaded(&self, name: &str) -> bool {
        let slot = self
            .inner
            .modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        slot.is_some_and(|s| s.lock().unwrap_or_else(PoisonError::into_inner).is_some())
    }

    /// Names of all successfully imported modules, sorted.
    pub fn loaded_modules(&self) -> Vec<String> {
        let slots: Vec<(String, Slot)> = self
            .inner
            .modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut names: Vec<String> = slots
            .into_iter()
            .filter(|(_, s)| s.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .map(|(k, _)| k)
            .collect();
        names.sort();
        names
    }

    /// Import a module, running its loader only on the first successful import.
    ///
    /// A failed load leaves nothing cached, so the next call tries again.
    ///
    /// Importing a module from inside its own loader chain on the same
    /// thread (`a` loads `b`, `b` loads `a`) fails with a circular import
    /// error.
    pub fn import(&self, name: &str) -> Result<Arc<Module>> {
        if self.is_loading(name) {
            return Err(circular(name));
        }
        let slot = self.slot(name);
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(module) = cached.as_ref() {
            return Ok(module.clone());
        }

        let loader = self
            .inner
            .loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Import {
                module: name.to_string(),
                reason: format!("no module named '{}'", name),
            })?;

        tracing::debug!(module = name, "importing module");
        let module = {
            let _loading = LoadingGuard::enter(self.id(), name);
            loader()
        };
        let module = module.map_err(|e| match e.downcast::<Error>() {
            Ok(inner @ Error::Import { .. }) if is_circular(&inner) => inner,
            Ok(inner) => Error::Import {
                module: name.to_string(),
                reason: inner.to_string(),
            },
            Err(e) => Error::Import {
                module: name.to_string(),
                reason: format!("{:#}", e),
            },
        })?;

        let module = Arc::new(module);
        *cached = Some(module.clone());
        Ok(module)
    }

    /// Emit and remember an import duration.
    pub fn record_timing(&self, timing: ImportTiming) {
        tracing::info!(
            module = %timing.module,
            elapsed_ms = timing.elapsed.as_millis() as u64,
            "{}",
            timing.message()
        );
        self.inner
            .timings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(timing);
    }

    /// Every timing reported through this importer, oldest first.
    pub fn timings(&self) -> Vec<ImportTiming> {
        self.inner
            .timings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether this thread is currently running the loader for `name`.
    pub fn is_loading(&self, name: &str) -> bool {
        let id = self.id();
        LOADING.with(|l| l.borrow().iter().any(|(i, n)| *i == id && n == name))
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub fn ptr_eq(&self, other: &Importer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn slot(&self, name: &str) -> Slot {
        self.inner
            .modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

pub(crate) fn circular(name: &str) -> Error {
    Error::Import {
        module: name.to_string(),
        reason: CIRCULAR.to_string(),
    }
}

const CIRCULAR: &str = "circular import";

fn is_circular(err: &Error) -> bool {
    matches!(err, Error::Import { reason, .. } if reason == CIRCULAR)
}

/// The process-wide importer, with builtins registered.
pub fn global() -> &'static Importer {
    static GLOBAL: OnceLock<Importer> = OnceLock::new();
    GLOBAL.get_or_init(Importer::with_builtins)
}
