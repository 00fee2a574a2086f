//! Lazy module handles

use super::importer::{ImportTiming, Importer, circular};
use super::module::{Resolved, Value};
use crate::error::{Error, Result};
use std::any::Any;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Placeholder for a module (or one attribute of it) that is imported on
/// first access.
///
/// There is no transparent proxying: call sites go through [`LazyImport::get`]
/// or one of the typed accessors built on it. The first successful call
/// imports and caches; later calls return the cached value. A failed import
/// caches nothing, so the next access retries.
pub struct LazyImport {
    importer: Importer,
    module_name: String,
    attr_name: Option<String>,
    verbose: bool,
    // Held across the import so concurrent first use imports once.
    state: Mutex<Option<Resolved>>,
}

impl LazyImport {
    pub fn new(importer: Importer, module_name: &str, attr_name: Option<&str>, verbose: bool) -> Self {
        Self {
            importer,
            module_name: module_name.to_string(),
            attr_name: attr_name.map(str::to_string),
            verbose,
            state: Mutex::new(None),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn attr_name(&self) -> Option<&str> {
        self.attr_name.as_deref()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// `module` or `module.attr`
    pub fn target(&self) -> String {
        match &self.attr_name {
            Some(attr) => format!("{}.{}", self.module_name, attr),
            None => self.module_name.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Resolve on first use, then return the cached value.
    pub fn get(&self) -> Result<Resolved> {
        // The state lock is held while loading, so a loader reaching back
        // into this handle has to be turned away before it blocks.
        if self.importer.is_loading(&self.module_name) {
            return Err(circular(&self.module_name));
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resolved) = state.as_ref() {
            return Ok(resolved.clone());
        }

        let start = Instant::now();
        let already_loaded = self.importer.is_loaded(&self.module_name);
        let resolved = self.load()?;

        if self.verbose && !already_loaded {
            self.importer.record_timing(ImportTiming {
                target: self.target(),
                module: self.module_name.clone(),
                elapsed: start.elapsed(),
            });
        }

        *state = Some(resolved.clone());
        Ok(resolved)
    }

    /// Attribute access on the resolved value.
    pub fn attr(&self, name: &str) -> Result<Value> {
        self.get()?.attr(name)
    }

    /// Resolve and return the value as `T`.
    ///
    /// For module handles, use [`LazyImport::attr_value`] instead.
    pub fn value<T: Any + Clone>(&self) -> Result<T> {
        let resolved = self.get()?;
        let value = resolved.as_value().ok_or_else(|| Error::AttributeType {
            name: self.target(),
            expected: std::any::type_name::<T>(),
        })?;
        downcast(value, &self.target())
    }

    /// Resolve the module and return one of its attributes as `T`.
    pub fn attr_value<T: Any + Clone>(&self, name: &str) -> Result<T> {
        let value = self.attr(name)?;
        downcast(&value, &format!("{}.{}", self.target(), name))
    }

    fn load(&self) -> Result<Resolved> {
        let module = match self.importer.import(&self.module_name) {
            Ok(m) => m,
            Err(Error::Import { module, reason }) if self.attr_name.is_some() => {
                return Err(Error::ImportFrom {
                    module,
                    attr: self.attr_name.clone().unwrap_or_default(),
                    reason,
                });
            }
            Err(e) => return Err(e),
        };

        match &self.attr_name {
            Some(attr) => Ok(Resolved::Attr(module.attr(attr)?)),
            None => Ok(Resolved::Module(module)),
        }
    }
}

fn downcast<T: Any + Clone>(value: &Value, name: &str) -> Result<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| Error::AttributeType {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

impl fmt::Display for LazyImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(resolved) => write!(f, "{:?}", resolved),
            None => write!(f, "<LazyImport: {}>", self.target()),
        }
    }
}

impl fmt::Debug for LazyImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyImport")
            .field("module_name", &self.module_name)
            .field("attr_name", &self.attr_name)
            .field("verbose", &self.verbose)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
