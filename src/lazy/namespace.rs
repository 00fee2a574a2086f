//! Namespace binding table

use super::handle::LazyImport;
use super::importer::Importer;
use super::module::{Resolved, Value};
use crate::error::{Error, Result};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Names bound to lazy handles.
///
/// Rebinding a name replaces the old handle without resolving it.
pub struct Namespace {
    importer: Importer,
    bindings: BTreeMap<String, Arc<LazyImport>>,
}

impl Namespace {
    pub fn new(importer: Importer) -> Self {
        Self {
            importer,
            bindings: BTreeMap::new(),
        }
    }

    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    /// Declare lazy bindings. Nothing is imported here.
    ///
    /// With `names`, binds one handle per attribute under the attribute's own
    /// name. Without, binds the module under `alias` or the last segment of
    /// its dotted path. Returns the names that were bound.
    pub fn import_lazy(
        &mut self,
        module: &str,
        names: Option<&[&str]>,
        alias: Option<&str>,
        verbose: bool,
    ) -> Result<Vec<String>> {
        let mut bound = Vec::new();
        match names {
            None => {
                let name = alias
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| module.rsplit('.').next().unwrap_or(module));
                let handle = LazyImport::new(self.importer.clone(), module, None, verbose);
                self.bind(name, handle);
                bound.push(name.to_string());
            }
            Some(names) => {
                if alias.is_some_and(|a| !a.is_empty()) {
                    return Err(Error::AliasWithNames);
                }
                for &name in names {
                    let handle =
                        LazyImport::new(self.importer.clone(), module, Some(name), verbose);
                    self.bind(name, handle);
                    bound.push(name.to_string());
                }
            }
        }
        tracing::trace!(module, names = ?bound, "declared lazy import");
        Ok(bound)
    }

    /// Bind a handle, returning the one it replaced.
    pub fn bind(&mut self, name: &str, handle: LazyImport) -> Option<Arc<LazyImport>> {
        self.bindings.insert(name.to_string(), Arc::new(handle))
    }

    pub fn unbind(&mut self, name: &str) -> Option<Arc<LazyImport>> {
        self.bindings.remove(name)
    }

    pub fn handle(&self, name: &str) -> Option<Arc<LazyImport>> {
        self.bindings.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve the handle bound to `name`.
    pub fn get(&self, name: &str) -> Result<Resolved> {
        self.lookup(name)?.get()
    }

    /// Resolve `name` and return it as `T`.
    pub fn value<T: Any + Clone>(&self, name: &str) -> Result<T> {
        self.lookup(name)?.value()
    }

    /// Resolve the module bound to `name` and read one of its attributes.
    pub fn attr(&self, name: &str, attr: &str) -> Result<Value> {
        self.lookup(name)?.attr(attr)
    }

    pub fn attr_value<T: Any + Clone>(&self, name: &str, attr: &str) -> Result<T> {
        self.lookup(name)?.attr_value(attr)
    }

    fn lookup(&self, name: &str) -> Result<&Arc<LazyImport>> {
        self.bindings
            .get(name)
            .ok_or_else(|| Error::NameNotBound(name.to_string()))
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(Importer::with_builtins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::Module;

    fn importer() -> Importer {
        let importer = Importer::new();
        importer.register("pkg.tools", || {
            Ok(Module::new("pkg.tools")
                .with_attr("a", 1i64)
                .with_attr("b", 2i64))
        });
        importer
    }

    #[test]
    fn test_default_name_is_last_segment() {
        let mut ns = Namespace::new(importer());
        let bound = ns.import_lazy("pkg.tools", None, None, false).unwrap();
        assert_eq!(bound, vec!["tools"]);
        assert!(ns.contains("tools"));
        assert_eq!(ns.attr_value::<i64>("tools", "b").unwrap(), 2);
    }

    #[test]
    fn test_alias() {
        let mut ns = Namespace::new(importer());
        ns.import_lazy("pkg.tools", None, Some("t"), false).unwrap();
        assert!(ns.contains("t"));
        assert!(!ns.contains("tools"));
    }

    #[test]
    fn test_named_imports() {
        let mut ns = Namespace::new(importer());
        ns.import_lazy("pkg.tools", Some(&["a", "b"]), None, false)
            .unwrap();
        assert_eq!(ns.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(ns.value::<i64>("a").unwrap(), 1);
    }

    #[test]
    fn test_alias_with_names_rejected() {
        let mut ns = Namespace::new(importer());
        let err = ns
            .import_lazy("pkg.tools", Some(&["a"]), Some("x"), false)
            .unwrap_err();
        assert!(matches!(err, Error::AliasWithNames));
        assert!(ns.is_empty());
    }

    #[test]
    fn test_unbound_name() {
        let ns = Namespace::new(importer());
        let err = ns.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "name 'missing' is not bound");
    }
}
