//! Interface contracts.
//!
//! An [`Interface`] describes the methods a proxy must implement. Interfaces
//! are **registered for the program duration**: those declared with
//! [`interface!`](crate::interface) live in a lazily initialized static, and
//! those assembled at run time with [`InterfaceBuilder::build`] are leaked.
//! Either way they are handed around as `&'static Interface` and compared by
//! [`InterfaceId`].
//!
//! # Example
//!
//! ```rust
//! use proxide::{ContractKind, Interface, MethodSignature};
//!
//! let iface = Interface::builder("Clock")
//!     .method(MethodSignature::new("now").returns("u64"))
//!     .build();
//!
//! assert_eq!(iface.kind(), ContractKind::Interface);
//! assert_eq!(iface.methods().len(), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for interface identities.
static NEXT_INTERFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a registered interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceId(u64);

impl InterfaceId {
    fn next() -> Self {
        Self(NEXT_INTERFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Shape of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// Method-only contract that proxies can implement.
    Interface,
    /// Concrete type description; never proxiable.
    Concrete,
}

/// Declared visibility of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`, `pub(super)` or `pub(in ...)`
    Restricted,
    /// No visibility qualifier.
    Private,
}

impl Visibility {
    /// Parses the stringified visibility qualifier of a declaration.
    ///
    /// ```rust
    /// use proxide::Visibility;
    ///
    /// assert_eq!(Visibility::from_tokens("pub"), Visibility::Public);
    /// assert_eq!(Visibility::from_tokens("pub(crate)"), Visibility::Restricted);
    /// assert_eq!(Visibility::from_tokens(""), Visibility::Private);
    /// ```
    #[must_use]
    pub fn from_tokens(tokens: &str) -> Self {
        match tokens.trim() {
            "" => Visibility::Private,
            "pub" => Visibility::Public,
            _ => Visibility::Restricted,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Restricted => "restricted",
            Visibility::Private => "private",
        })
    }
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    type_name: &'static str,
}

impl Parameter {
    /// Parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type, as written.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A generic parameter of a method with its constraint names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    name: &'static str,
    constraints: Vec<&'static str>,
}

impl GenericParam {
    /// Generic parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Trait constraints declared on the parameter.
    #[must_use]
    pub fn constraints(&self) -> &[&'static str] {
        &self.constraints
    }
}

/// Signature of one interface method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: &'static str,
    parameters: Vec<Parameter>,
    returns: Option<&'static str>,
    generics: Vec<GenericParam>,
}

impl MethodSignature {
    /// Starts a signature for a method taking no arguments and returning nothing.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parameters: Vec::new(),
            returns: None,
            generics: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: &'static str, type_name: &'static str) -> Self {
        self.parameters.push(Parameter { name, type_name });
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, type_name: &'static str) -> Self {
        self.returns = Some(type_name);
        self
    }

    /// Appends a generic parameter.
    #[must_use]
    pub fn generic(mut self, name: &'static str, constraints: &[&'static str]) -> Self {
        self.generics.push(GenericParam {
            name,
            constraints: constraints.to_vec(),
        });
        self
    }

    /// Method name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared return type, `None` for methods returning nothing.
    #[must_use]
    pub const fn return_type(&self) -> Option<&'static str> {
        self.returns
    }

    /// Returns `true` if the method returns nothing.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.returns.is_none()
    }

    /// Generic parameters in declaration order.
    #[must_use]
    pub fn generics(&self) -> &[GenericParam] {
        &self.generics
    }

    /// Returns `true` if the method declares generic parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }

    /// Parameter type names joined with `_`, the secondary catalog sort key.
    #[must_use]
    pub fn parameter_key(&self) -> String {
        self.parameters
            .iter()
            .map(Parameter::type_name)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Returns `true` if both signatures have the same name, parameter types
    /// and return type.
    #[must_use]
    pub fn same_shape(&self, other: &MethodSignature) -> bool {
        self.name == other.name
            && self.returns == other.returns
            && self.generics == other.generics
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.type_name == b.type_name)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.generics.is_empty() {
            let names: Vec<_> = self.generics.iter().map(GenericParam::name).collect();
            write!(f, "<{}>", names.join(", "))?;
        }
        let params: Vec<_> = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_name))
            .collect();
        write!(f, "({})", params.join(", "))?;
        if let Some(ret) = self.returns {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// A registered interface contract.
#[derive(Debug)]
pub struct Interface {
    id: InterfaceId,
    name: &'static str,
    module_path: &'static str,
    kind: ContractKind,
    visibility: Visibility,
    methods: Vec<MethodSignature>,
}

impl Interface {
    /// Starts building an interface.
    #[must_use]
    pub fn builder(name: &'static str) -> InterfaceBuilder {
        InterfaceBuilder::new(name)
    }

    /// Unique identity.
    #[must_use]
    pub const fn id(&self) -> InterfaceId {
        self.id
    }

    /// Interface name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Module path of the declaration (empty for runtime-built interfaces).
    #[must_use]
    pub const fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// `module::Name`, or just `Name` without a module path.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            self.name.to_string()
        } else {
            format!("{}::{}", self.module_path, self.name)
        }
    }

    /// Contract shape.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Declared visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Interface {}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Builder for [`Interface`]s.
///
/// Runtime-built interfaces default to public, interface-shaped contracts.
pub struct InterfaceBuilder {
    name: &'static str,
    module_path: &'static str,
    kind: ContractKind,
    visibility: Visibility,
    methods: Vec<MethodSignature>,
}

impl InterfaceBuilder {
    /// Creates a new builder.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            module_path: "",
            kind: ContractKind::Interface,
            visibility: Visibility::Public,
            methods: Vec::new(),
        }
    }

    /// Sets the module path.
    #[must_use]
    pub fn module_path(mut self, module_path: &'static str) -> Self {
        self.module_path = module_path;
        self
    }

    /// Sets the contract shape.
    #[must_use]
    pub fn kind(mut self, kind: ContractKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, signature: MethodSignature) -> Self {
        self.methods.push(signature);
        self
    }

    /// Finishes the interface without registering it.
    ///
    /// Used by [`interface!`](crate::interface) to initialize its static.
    #[must_use]
    pub fn finish(self) -> Interface {
        Interface {
            id: InterfaceId::next(),
            name: self.name,
            module_path: self.module_path,
            kind: self.kind,
            visibility: self.visibility,
            methods: self.methods,
        }
    }

    /// Registers the interface for the rest of the program.
    #[must_use]
    pub fn build(self) -> &'static Interface {
        Box::leak(Box::new(self.finish()))
    }
}

/// Compile-time handle to an interface.
///
/// Implemented by the `NameContract` marker generated by
/// [`interface!`](crate::interface).
pub trait Contract: 'static {
    /// Returns the registered interface.
    fn interface() -> &'static Interface;
}

/// A compile-time list of contracts, implemented for tuples.
///
/// ```rust,ignore
/// proxide::create_proxy_without_target::<(GreeterContract, ClockContract), _>(handler)?;
/// ```
pub trait ContractSet {
    /// Returns the interfaces in declaration order.
    fn interfaces() -> Vec<&'static Interface>;
}

macro_rules! contract_set_tuple {
    ($($name:ident),+) => {
        impl<$($name: Contract),+> ContractSet for ($($name,)+) {
            fn interfaces() -> Vec<&'static Interface> {
                vec![$($name::interface()),+]
            }
        }
    };
}

contract_set_tuple!(A);
contract_set_tuple!(A, B);
contract_set_tuple!(A, B, C);
contract_set_tuple!(A, B, C, D);
contract_set_tuple!(A, B, C, D, E);
contract_set_tuple!(A, B, C, D, E, F);
contract_set_tuple!(A, B, C, D, E, F, G);
contract_set_tuple!(A, B, C, D, E, F, G, H);
