//! Importable modules and their type-erased attributes

use crate::error::{Error, Result};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased attribute value.
///
/// Cloning is cheap and preserves identity, so two clones compare equal
/// under [`Value::ptr_eq`].
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the value as `T` if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}

/// A named collection of attributes, produced by a loader.
#[derive(Clone, Default)]
pub struct Module {
    name: String,
    attrs: BTreeMap<String, Value>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attr<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr<T: Any + Send + Sync>(&mut self, name: &str, value: T) {
        self.attrs.insert(name.to_string(), Value::new(value));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute, failing the way a missing `from m import x` would.
    pub fn attr(&self, name: &str) -> Result<Value> {
        self.attrs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingAttribute {
                module: self.name.clone(),
                attr: name.to_string(),
            })
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<module '{}'>", self.name)
    }
}

/// What a lazy handle resolves to: the whole module or one attribute of it.
#[derive(Clone)]
pub enum Resolved {
    Module(Arc<Module>),
    Attr(Value),
}

impl Resolved {
    pub fn as_module(&self) -> Option<&Arc<Module>> {
        match self {
            Self::Module(m) => Some(m),
            Self::Attr(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Attr(v) => Some(v),
            Self::Module(_) => None,
        }
    }

    /// Attribute access delegated to the resolved module.
    pub fn attr(&self, name: &str) -> Result<Value> {
        match self {
            Self::Module(m) => m.attr(name),
            Self::Attr(v) => Err(Error::MissingAttribute {
                module: v.type_name().to_string(),
                attr: name.to_string(),
            }),
        }
    }

    /// Identity comparison; equal only when both point at the same allocation.
    pub fn ptr_eq(&self, other: &Resolved) -> bool {
        match (self, other) {
            (Self::Module(a), Self::Module(b)) => Arc::ptr_eq(a, b),
            (Self::Attr(a), Self::Attr(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(m) => m.fmt(f),
            Self::Attr(v) => v.fmt(f),
        }
    }
}
