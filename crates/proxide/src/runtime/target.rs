// Target binding for with-target proxies.
//
// A `Target<T>` owns the wrapped object and records which interfaces it
// conforms to. Conformance is explicit: each interface contributes a
// `TargetAdapter` whose forwarding function unboxes arguments, calls the
// object through the interface trait and boxes the result. The factory checks
// the recorded conformances against the requested interfaces before any proxy
// is built.

use crate::error::{Error, Result};
use crate::runtime::catalog::MethodDescriptor;
use crate::runtime::contract::{Contract, ContractSet, Interface};
use crate::runtime::value::Value;
use std::fmt;
use std::sync::Arc;

/// Type-erased forwarding from a captured call to a target method.
pub type Forward<T> = fn(&T, &MethodDescriptor, &[Value]) -> Result<Option<Value>>;

/// Forwards calls of one interface to targets of type `T`.
///
/// Implemented by the `NameContract` markers generated by
/// [`interface!`](crate::interface) for every `T` implementing the trait.
pub trait TargetAdapter<T>: Contract {
    /// Invokes `method` on `target` with `arguments`.
    ///
    /// # Errors
    ///
    /// - `Error::ArgumentTypeMismatch` / `Error::ArgumentCountMismatch` when
    ///   the arguments do not fit the method
    /// - `Error::OpenGenericMethod` for generic methods
    /// - any error raised by the target
    fn forward(target: &T, method: &MethodDescriptor, arguments: &[Value]) -> Result<Option<Value>>;
}

/// A set of contracts a target of type `T` conforms to, implemented for tuples.
pub trait AdapterSet<T>: ContractSet {
    /// Records every contract of the set on `target`.
    fn conform(target: Target<T>) -> Target<T>;
}

macro_rules! adapter_set_tuple {
    ($($name:ident),+) => {
        impl<T, $($name),+> AdapterSet<T> for ($($name,)+)
        where
            T: Send + Sync + 'static,
            $($name: TargetAdapter<T>),+
        {
            fn conform(target: Target<T>) -> Target<T> {
                target$(.conform::<$name>())+
            }
        }
    };
}

adapter_set_tuple!(A);
adapter_set_tuple!(A, B);
adapter_set_tuple!(A, B, C);
adapter_set_tuple!(A, B, C, D);
adapter_set_tuple!(A, B, C, D, E);
adapter_set_tuple!(A, B, C, D, E, F);
adapter_set_tuple!(A, B, C, D, E, F, G);
adapter_set_tuple!(A, B, C, D, E, F, G, H);

struct Conformance<T> {
    interface: &'static Interface,
    forward: Forward<T>,
}

impl<T> Clone for Conformance<T> {
    fn clone(&self) -> Self {
        Self {
            interface: self.interface,
            forward: self.forward,
        }
    }
}

/// The object wrapped by a with-target proxy.
pub struct Target<T> {
    object: Arc<T>,
    conformances: Vec<Conformance<T>>,
}

impl<T: Send + Sync + 'static> Target<T> {
    /// Wraps `object` with no recorded conformances.
    #[must_use]
    pub fn new(object: T) -> Self {
        Self::from_arc(Arc::new(object))
    }

    /// Wraps an already shared object.
    #[must_use]
    pub const fn from_arc(object: Arc<T>) -> Self {
        Self {
            object,
            conformances: Vec::new(),
        }
    }

    /// Records that the object implements contract `C`.
    #[must_use]
    pub fn conform<C: TargetAdapter<T>>(mut self) -> Self {
        let interface = C::interface();
        if !self.conforms_to(interface) {
            self.conformances.push(Conformance {
                interface,
                forward: C::forward,
            });
        }
        self
    }

    /// The wrapped object.
    #[inline]
    #[must_use]
    pub fn object(&self) -> &T {
        &self.object
    }

    /// The shared handle to the wrapped object.
    #[must_use]
    pub const fn shared(&self) -> &Arc<T> {
        &self.object
    }

    /// Returns `true` if a conformance to `interface` was recorded.
    #[must_use]
    pub fn conforms_to(&self, interface: &Interface) -> bool {
        self.conformances
            .iter()
            .any(|c| c.interface.id() == interface.id())
    }

    /// Interfaces the object conforms to, in recording order.
    pub fn interfaces(&self) -> impl Iterator<Item = &'static Interface> + '_ {
        self.conformances.iter().map(|c| c.interface)
    }

    /// Checks that the object conforms to every interface.
    ///
    /// # Errors
    ///
    /// Returns `Error::TargetInterfaceMismatch` naming the first interface, in
    /// the given order, without a recorded conformance.
    pub fn check(&self, interfaces: &[&'static Interface]) -> Result<()> {
        match interfaces.iter().find(|i| !self.conforms_to(i)) {
            Some(missing) => Err(Error::TargetInterfaceMismatch {
                interface: missing.qualified_name(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn forwarder(&self, interface: &Interface) -> Option<Forward<T>> {
        self.conformances
            .iter()
            .find(|c| c.interface.id() == interface.id())
            .map(|c| c.forward)
    }
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        Self {
            object: Arc::clone(&self.object),
            conformances: self.conformances.clone(),
        }
    }
}

impl<T> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.conformances.iter().map(|c| c.interface.name()).collect();
        f.debug_struct("Target")
            .field("type", &std::any::type_name::<T>())
            .field("conforms_to", &names)
            .finish()
    }
}

/// Target type of without-target proxies.
///
/// Every interface declared with [`interface!`](crate::interface) is
/// implemented for `NoTarget`; all of its methods fail with
/// `Error::NoTarget`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTarget;
