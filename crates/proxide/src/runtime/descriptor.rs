//! Proxy descriptors.
//!
//! A [`ProxyDescriptor`] is the reusable recipe shared by every proxy created
//! for one interface set and [`Mode`]: the interfaces in canonical order, the
//! [`MethodCatalog`] and a [`DispatchTable`] resolving `(interface, method)`
//! pairs to catalog ordinals. Descriptors are built by [`ProxyBuilder`] on the
//! cold path and are immutable afterwards.

use crate::error::{Error, Result};
use crate::runtime::cache::CacheKey;
use crate::runtime::catalog::{MethodCatalog, MethodDescriptor};
use crate::runtime::contract::{Interface, InterfaceId};
use fxhash::FxHashMap;
use std::fmt;

/// Binding mode of a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Calls are forwarded through an interceptor that may proceed to a target.
    WithTarget,
    /// Calls are answered by a handler alone.
    WithoutTarget,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::WithTarget => "with-target",
            Mode::WithoutTarget => "without-target",
        })
    }
}

/// Resolves method declarations to catalog ordinals.
///
/// Runtime-built interfaces may declare several methods with one name; their
/// ordinals are kept in catalog order.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    slots: FxHashMap<InterfaceId, FxHashMap<&'static str, Vec<usize>>>,
}

impl DispatchTable {
    fn from_catalog(catalog: &MethodCatalog) -> Self {
        let mut slots: FxHashMap<InterfaceId, FxHashMap<&'static str, Vec<usize>>> =
            FxHashMap::default();
        for declaration in catalog.declarations() {
            slots
                .entry(declaration.interface)
                .or_default()
                .entry(declaration.name)
                .or_default()
                .push(declaration.ordinal);
        }
        Self { slots }
    }

    /// Returns `true` if `interface` has entries in this table.
    #[must_use]
    pub fn covers(&self, interface: InterfaceId) -> bool {
        self.slots.contains_key(&interface)
    }

    /// Ordinals of the methods named `name` declared by `interface`.
    #[must_use]
    pub fn lookup(&self, interface: InterfaceId, name: &str) -> &[usize] {
        self.slots
            .get(&interface)
            .and_then(|methods| methods.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Shared construction recipe for proxies of one interface set and mode.
pub struct ProxyDescriptor {
    key: CacheKey,
    interfaces: Vec<&'static Interface>,
    catalog: MethodCatalog,
    table: DispatchTable,
}

impl ProxyDescriptor {
    /// The cache key this descriptor was built for.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Binding mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.key.mode()
    }

    /// Implemented interfaces in canonical order.
    #[must_use]
    pub fn interfaces(&self) -> &[&'static Interface] {
        &self.interfaces
    }

    /// The method catalog.
    #[must_use]
    pub const fn catalog(&self) -> &MethodCatalog {
        &self.catalog
    }

    /// The dispatch table.
    #[must_use]
    pub const fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Returns `true` if proxies built from this descriptor implement `interface`.
    #[must_use]
    pub fn implements(&self, interface: &Interface) -> bool {
        self.interfaces.iter().any(|i| i.id() == interface.id())
    }

    /// Resolves the first method named `name` declared by `interface`.
    ///
    /// # Errors
    ///
    /// - `Error::MethodNotProxied` - `interface` is not implemented
    /// - `Error::MethodNotFound` - `interface` declares no such method
    pub fn resolve(&self, interface: &Interface, name: &str) -> Result<MethodDescriptor> {
        self.resolve_all(interface, name)?
            .next()
            .ok_or_else(|| Error::MethodNotFound {
                interface: interface.qualified_name(),
                method: name.to_string(),
            })
    }

    /// Resolves every method named `name` declared by `interface`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MethodNotProxied` if `interface` is not implemented.
    pub fn resolve_all<'a>(
        &'a self,
        interface: &Interface,
        name: &str,
    ) -> Result<impl Iterator<Item = MethodDescriptor> + 'a> {
        if !self.implements(interface) {
            return Err(Error::MethodNotProxied {
                interface: interface.qualified_name(),
                method: name.to_string(),
            });
        }
        Ok(self
            .table
            .lookup(interface.id(), name)
            .iter()
            .filter_map(|&ordinal| self.catalog.get(ordinal).copied()))
    }
}

impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.interfaces.iter().map(|i| i.qualified_name()).collect();
        f.debug_struct("ProxyDescriptor")
            .field("interfaces", &names)
            .field("mode", &self.mode())
            .field("methods", &self.catalog.len())
            .finish()
    }
}

/// Assembles a [`ProxyDescriptor`] from a method catalog.
pub struct ProxyBuilder {
    key: CacheKey,
    interfaces: Vec<&'static Interface>,
}

impl ProxyBuilder {
    /// Starts a descriptor for `interfaces`, which must already be in
    /// canonical order, under `key`.
    #[must_use]
    pub const fn new(key: CacheKey, interfaces: Vec<&'static Interface>) -> Self {
        Self { key, interfaces }
    }

    /// Interfaces the descriptor will implement.
    #[must_use]
    pub fn interfaces(&self) -> &[&'static Interface] {
        &self.interfaces
    }

    /// Compiles the dispatch table for `catalog` and finishes the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the catalog leaves a requested interface
    /// method without a slot.
    pub fn build(self, catalog: MethodCatalog) -> Result<ProxyDescriptor> {
        let table = DispatchTable::from_catalog(&catalog);

        for iface in &self.interfaces {
            for method in iface.methods() {
                if table.lookup(iface.id(), method.name()).is_empty() {
                    return Err(Error::Internal(format!(
                        "no catalog slot for {}::{}",
                        iface.qualified_name(),
                        method.name()
                    )));
                }
            }
        }

        tracing::debug!(
            interfaces = ?self.interfaces.iter().map(|i| i.name()).collect::<Vec<_>>(),
            mode = %self.key.mode(),
            methods = catalog.len(),
            "built proxy descriptor"
        );

        Ok(ProxyDescriptor {
            key: self.key,
            interfaces: self.interfaces,
            catalog,
            table,
        })
    }
}
