//! Lazy module importing
//!
//! Defers building a module until something actually reads from it.
//!
//! ```
//! use stdl::lazy::{Importer, Module, Namespace};
//!
//! let importer = Importer::new();
//! importer.register("geometry", || {
//!     Ok(Module::new("geometry").with_attr("area", (|w: f64, h: f64| w * h) as fn(f64, f64) -> f64))
//! });
//!
//! let mut ns = Namespace::new(importer.clone());
//! ns.import_lazy("geometry", Some(&["area"]), None, false).unwrap();
//! assert!(!importer.is_loaded("geometry"));
//!
//! let area: fn(f64, f64) -> f64 = ns.value("area").unwrap();
//! assert_eq!(area(2.0, 3.0), 6.0);
//! assert!(importer.is_loaded("geometry"));
//! ```
//!
//! Handles have no transparent forwarding: every read goes through an
//! explicit accessor (`get`, `value`, `attr`, `attr_value`).

mod builtins;
mod handle;
mod importer;
mod module;
mod namespace;

pub use handle::LazyImport;
pub use importer::{ImportTiming, Importer, Loader, global as global_importer};
pub use module::{Module, Resolved, Value};
pub use namespace::Namespace;

use crate::error::{Error, Result};
use std::any::Any;
use std::cell::Cell;
use std::sync::{Mutex, OnceLock, PoisonError};

thread_local! {
    static IN_NAMESPACE: Cell<bool> = const { Cell::new(false) };
}

struct NamespaceGuard;

impl Drop for NamespaceGuard {
    fn drop(&mut self) {
        IN_NAMESPACE.with(|f| f.set(false));
    }
}

fn global_namespace() -> &'static Mutex<Namespace> {
    static NAMESPACE: OnceLock<Mutex<Namespace>> = OnceLock::new();
    NAMESPACE.get_or_init(|| Mutex::new(Namespace::new(global_importer().clone())))
}

/// Run a closure against the process-wide namespace.
///
/// The namespace stays locked for the whole closure. Calling back into the
/// process-wide namespace from inside it (directly, or from a loader the
/// closure triggers) returns [`Error::NamespaceBusy`] rather than blocking.
/// Prefer [`value`] and [`attr_value`], which resolve after the lock is
/// released.
pub fn with_namespace<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut Namespace) -> R,
{
    if IN_NAMESPACE.with(|flag| flag.replace(true)) {
        return Err(Error::NamespaceBusy);
    }
    let _guard = NamespaceGuard;
    let mut ns = global_namespace()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut ns))
}

/// Declare lazy bindings in the process-wide namespace.
///
/// See [`Namespace::import_lazy`].
pub fn import_lazy(
    module: &str,
    names: Option<&[&str]>,
    alias: Option<&str>,
    verbose: bool,
) -> Result<Vec<String>> {
    with_namespace(|ns| ns.import_lazy(module, names, alias, verbose))?
}

/// Resolve a name from the process-wide namespace as `T`.
pub fn value<T: Any + Clone>(name: &str) -> Result<T> {
    global_handle(name)?.value()
}

/// Resolve the module bound to `name` in the process-wide namespace and
/// read one of its attributes as `T`.
pub fn attr_value<T: Any + Clone>(name: &str, attr: &str) -> Result<T> {
    global_handle(name)?.attr_value(attr)
}

// The namespace lock is released before the handle resolves.
fn global_handle(name: &str) -> Result<std::sync::Arc<LazyImport>> {
    with_namespace(|ns| ns.handle(name))?.ok_or_else(|| Error::NameNotBound(name.to_string()))
}
