//! Method catalogs.
//!
//! A [`MethodCatalog`] enumerates every method of a set of interfaces into a
//! deterministic table. Each entry receives an ordinal that stays fixed for the
//! lifetime of the descriptor owning the catalog.
//!
//! # Ordering
//!
//! Methods are sorted by name, then by their parameter type names joined with
//! `_`. The sort is stable, so remaining ties keep interface order and then
//! declaration order. Interfaces are supplied in canonical order (see
//! [`CacheKey`](crate::runtime::CacheKey)), which makes ordinals identical for
//! every request of the same interface set.
//!
//! Identically shaped methods declared by two interfaces stay separate entries
//! unless de-duplication is requested.

use crate::error::{Error, Result};
use crate::runtime::contract::{ContractKind, Interface, InterfaceId, MethodSignature, Visibility};
use crate::runtime::value::{Value, ValueType};
use std::fmt;

/// Identity of one catalogued method.
///
/// Descriptors are small and `Copy`; they point into interface metadata that
/// lives for the program duration.
#[derive(Clone, Copy)]
pub struct MethodDescriptor {
    ordinal: usize,
    interface: &'static Interface,
    signature: &'static MethodSignature,
}

impl MethodDescriptor {
    /// Position of this method in its catalog.
    #[inline]
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The declaring interface.
    #[inline]
    #[must_use]
    pub const fn interface(&self) -> &'static Interface {
        self.interface
    }

    /// The declared signature.
    #[inline]
    #[must_use]
    pub const fn signature(&self) -> &'static MethodSignature {
        self.signature
    }

    /// Method name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.signature.name()
    }

    /// Returns `true` if the method returns nothing.
    #[inline]
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.signature.is_void()
    }

    /// Converts a captured result to the declared return type `R`.
    ///
    /// # Errors
    ///
    /// - `Error::MissingResult` - nothing was captured
    /// - `Error::InvalidReturnType` - the captured value is not an `R`
    pub fn convert_return<R: ValueType>(&self, captured: Option<Value>) -> Result<R> {
        let value = captured.ok_or_else(|| Error::MissingResult {
            method: self.to_string(),
        })?;
        value.into_inner::<R>().map_err(|value| Error::InvalidReturnType {
            method: self.to_string(),
            expected: std::any::type_name::<R>(),
            got: value.type_name(),
        })
    }
}

impl PartialEq for MethodDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.interface.id() == other.interface.id() && self.signature.same_shape(other.signature)
    }
}

impl Eq for MethodDescriptor {}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("ordinal", &self.ordinal)
            .field("interface", &self.interface.name())
            .field("signature", &self.signature.to_string())
            .finish()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.interface.name(), self.signature.name())
    }
}

/// A method declaration and the catalog slot serving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    /// Declaring interface.
    pub interface: InterfaceId,
    /// Method name.
    pub name: &'static str,
    /// Catalog ordinal.
    pub ordinal: usize,
}

/// Ordered method table of a set of interfaces.
#[derive(Debug, Clone)]
pub struct MethodCatalog {
    methods: Vec<MethodDescriptor>,
    declarations: Vec<Declaration>,
}

impl MethodCatalog {
    /// Catalogs the methods of `interfaces`.
    ///
    /// With `deduplicate`, identically shaped methods of different interfaces
    /// share the slot of the first one.
    ///
    /// # Errors
    ///
    /// Fails if any contract is not a public interface, see [`validate`].
    pub fn build(interfaces: &[&'static Interface], deduplicate: bool) -> Result<Self> {
        validate(interfaces)?;

        let mut candidates: Vec<(&'static Interface, &'static MethodSignature, String)> = interfaces
            .iter()
            .flat_map(|&iface| iface.methods().iter().map(move |m| (iface, m, m.parameter_key())))
            .collect();
        candidates.sort_by(|a, b| a.1.name().cmp(b.1.name()).then_with(|| a.2.cmp(&b.2)));

        let mut methods: Vec<MethodDescriptor> = Vec::with_capacity(candidates.len());
        let mut declarations = Vec::with_capacity(candidates.len());

        for (interface, signature, _) in candidates {
            let shared = if deduplicate {
                methods
                    .iter()
                    .find(|m| m.signature.same_shape(signature))
                    .map(MethodDescriptor::ordinal)
            } else {
                None
            };

            let ordinal = shared.unwrap_or_else(|| {
                let ordinal = methods.len();
                methods.push(MethodDescriptor {
                    ordinal,
                    interface,
                    signature,
                });
                ordinal
            });

            declarations.push(Declaration {
                interface: interface.id(),
                name: signature.name(),
                ordinal,
            });
        }

        Ok(Self {
            methods,
            declarations,
        })
    }

    /// Catalogued methods by ordinal.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Every method declaration with the slot it resolves to.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Returns the method at `ordinal`.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&MethodDescriptor> {
        self.methods.get(ordinal)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no interface declares a method.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Checks that every contract is a public interface.
///
/// # Errors
///
/// - `Error::NoInterfaces` - `interfaces` is empty
/// - `Error::NotAnInterface` - a contract is not interface-shaped
/// - `Error::NotVisible` - a contract is not public
pub fn validate(interfaces: &[&'static Interface]) -> Result<()> {
    if interfaces.is_empty() {
        return Err(Error::NoInterfaces);
    }
    for iface in interfaces {
        if iface.kind() != ContractKind::Interface {
            return Err(Error::NotAnInterface {
                interface: iface.qualified_name(),
            });
        }
        if iface.visibility() != Visibility::Public {
            return Err(Error::NotVisible {
                interface: iface.qualified_name(),
                visibility: iface.visibility(),
            });
        }
    }
    Ok(())
}
