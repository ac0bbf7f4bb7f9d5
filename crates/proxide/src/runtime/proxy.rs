// Proxy instances and the per-call dispatch protocol.
//
// A `Proxy<T>` pairs a shared `ProxyDescriptor` with its own binding: a
// handler (without-target) or an interceptor plus target (with-target).
// Interface traits are implemented for `Proxy<T>` by `interface!`; each
// generated method boxes its arguments, resolves its `MethodDescriptor` and
// calls `Proxy::dispatch`, which runs the protocol:
//
//   captured -> handler                      -> result
//   captured -> interceptor [-> proceed]*    -> result slot
//
// and finally converts the result to the declared return type. `send`
// offers the same protocol for callers that only know the interface and
// method name at run time.

use crate::error::{Error, Result};
use crate::runtime::catalog::MethodDescriptor;
use crate::runtime::contract::{Contract, Interface};
use crate::runtime::descriptor::{Mode, ProxyDescriptor};
use crate::runtime::interceptor::{Handler, InterceptionContext, Interceptor, Proceed};
use crate::runtime::invocation::Invocation;
use crate::runtime::target::{NoTarget, Target};
use crate::runtime::value::{TypeRef, Value};
use std::fmt;
use std::sync::Arc;

enum Binding<T> {
    Handler(Arc<dyn Handler>),
    Interceptor {
        interceptor: Arc<dyn Interceptor>,
        target: Arc<Target<T>>,
    },
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        match self {
            Binding::Handler(handler) => Binding::Handler(Arc::clone(handler)),
            Binding::Interceptor {
                interceptor,
                target,
            } => Binding::Interceptor {
                interceptor: Arc::clone(interceptor),
                target: Arc::clone(target),
            },
        }
    }
}

/// An object implementing a set of interfaces by routing every call through a
/// handler or interceptor.
///
/// Proxies are created by [`ProxyFactory`](crate::ProxyFactory). Cloning a
/// proxy shares its binding.
///
/// # Interface membership
///
/// `interface!` implements every interface trait for every `Proxy<T>` whose
/// target type implements it, so a proxy coerces to `&dyn Trait` even when
/// `Trait` was not among the requested interfaces. Such calls fail at run
/// time with `Error::MethodNotProxied`. Use [`Proxy::implements`] to test
/// membership.
///
/// # Thread Safety
///
/// `Proxy<T>` is `Send + Sync` when `T` is; handlers and interceptors are
/// required to be `Send + Sync`. The engine adds no locking of its own.
pub struct Proxy<T = NoTarget> {
    descriptor: Arc<ProxyDescriptor>,
    binding: Binding<T>,
}

impl Proxy<NoTarget> {
    pub(crate) fn with_handler(
        descriptor: Arc<ProxyDescriptor>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            descriptor,
            binding: Binding::Handler(handler),
        }
    }
}

impl<T: Send + Sync + 'static> Proxy<T> {
    pub(crate) fn with_interceptor(
        descriptor: Arc<ProxyDescriptor>,
        interceptor: Arc<dyn Interceptor>,
        target: Target<T>,
    ) -> Self {
        Self {
            descriptor,
            binding: Binding::Interceptor {
                interceptor,
                target: Arc::new(target),
            },
        }
    }

    /// The shared descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &Arc<ProxyDescriptor> {
        &self.descriptor
    }

    /// Binding mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.descriptor.mode()
    }

    /// Returns `true` if this proxy implements contract `C`.
    #[must_use]
    pub fn implements<C: Contract>(&self) -> bool {
        self.descriptor.implements(C::interface())
    }

    /// The bound target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Target<T>> {
        match &self.binding {
            Binding::Handler(_) => None,
            Binding::Interceptor { target, .. } => Some(target.as_ref()),
        }
    }

    /// Resolves method `name` of `interface`.
    ///
    /// # Errors
    ///
    /// - `Error::MethodNotProxied` - this proxy does not implement `interface`
    /// - `Error::MethodNotFound` - `interface` declares no such method
    pub fn method(&self, interface: &Interface, name: &str) -> Result<MethodDescriptor> {
        self.descriptor.resolve(interface, name)
    }

    /// Runs the dispatch protocol for one call.
    ///
    /// `proceed` performs the typed call on the target; it is only reached
    /// when an interceptor proceeds. Returns the captured result, `None` for
    /// void methods.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the handler, interceptor or target.
    pub fn dispatch<F>(
        &self,
        method: MethodDescriptor,
        arguments: Vec<Value>,
        generic_arguments: Vec<TypeRef>,
        proceed: F,
    ) -> Result<Option<Value>>
    where
        F: Fn(&T, &[Value]) -> Result<Option<Value>>,
    {
        tracing::trace!(%method, arguments = arguments.len(), mode = %self.mode(), "dispatch");
        let invocation =
            Invocation::new(method, arguments).with_generic_arguments(generic_arguments);

        let captured = match &self.binding {
            Binding::Handler(handler) => handler.handle(&invocation)?,
            Binding::Interceptor {
                interceptor,
                target,
            } => {
                let forward = |arguments: &[Value]| proceed(target.object(), arguments);
                let mut context =
                    InterceptionContext::new(invocation, Some(&forward as Proceed<'_>));
                interceptor.intercept(&mut context)?;
                context.into_result()
            }
        };

        if method.is_void() {
            Ok(None)
        } else {
            Ok(captured)
        }
    }

    /// Calls method `name` of `interface` with boxed `arguments`.
    ///
    /// Runtime-built interfaces may overload a name. The overload with the
    /// matching arity is chosen; when several share it, the one whose declared
    /// parameter types name the argument types, module paths aside. The
    /// result is returned boxed without any conversion.
    ///
    /// # Errors
    ///
    /// - `Error::MethodNotProxied` / `Error::MethodNotFound` - unknown method
    /// - `Error::ArgumentCountMismatch` - no overload takes that many arguments
    /// - `Error::NoMatchingOverload` / `Error::AmbiguousOverload` - the
    ///   argument types select no overload, or more than one
    /// - `Error::MissingResult` - a non-void call produced nothing
    /// - any error of the dispatch itself
    pub fn send(
        &self,
        interface: &Interface,
        name: &str,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>> {
        let method = self.select(interface, name, &arguments)?;

        let forward = self
            .target()
            .map(|target| {
                target.forwarder(interface).ok_or_else(|| {
                    Error::Internal(format!(
                        "target bound without a forwarder for {}",
                        interface.qualified_name()
                    ))
                })
            })
            .transpose()?;

        let captured = self.dispatch(method, arguments, Vec::new(), |object, arguments| {
            match forward {
                Some(forward) => forward(object, &method, arguments),
                None => Err(Error::NoTarget {
                    method: method.to_string(),
                }),
            }
        })?;

        if captured.is_none() && !method.is_void() {
            return Err(Error::MissingResult {
                method: method.to_string(),
            });
        }
        Ok(captured)
    }

    fn select(
        &self,
        interface: &Interface,
        name: &str,
        arguments: &[Value],
    ) -> Result<MethodDescriptor> {
        let overloads: Vec<MethodDescriptor> =
            self.descriptor.resolve_all(interface, name)?.collect();
        let Some(&first) = overloads.first() else {
            return Err(Error::MethodNotFound {
                interface: interface.qualified_name(),
                method: name.to_string(),
            });
        };

        let candidates: Vec<MethodDescriptor> = overloads
            .into_iter()
            .filter(|method| method.signature().parameters().len() == arguments.len())
            .collect();
        match candidates.as_slice() {
            [] => Err(Error::ArgumentCountMismatch {
                method: first.to_string(),
                expected: first.signature().parameters().len(),
                got: arguments.len(),
            }),
            [method] => Ok(*method),
            _ => {
                let matching: Vec<MethodDescriptor> = candidates
                    .into_iter()
                    .filter(|method| accepts(method, arguments))
                    .collect();
                match matching.as_slice() {
                    [method] => Ok(*method),
                    [] => Err(Error::NoMatchingOverload {
                        method: format!("{}::{name}", interface.name()),
                        arguments: arguments
                            .iter()
                            .map(Value::type_name)
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                    several => Err(Error::AmbiguousOverload {
                        method: format!("{}::{name}", interface.name()),
                        candidates: several.len(),
                    }),
                }
            }
        }
    }
}

/// Returns `true` if every argument's type matches the declared parameter
/// type, ignoring module paths.
fn accepts(method: &MethodDescriptor, arguments: &[Value]) -> bool {
    method
        .signature()
        .parameters()
        .iter()
        .zip(arguments)
        .all(|(parameter, argument)| {
            unqualified(parameter.type_name()) == unqualified(argument.type_name())
        })
}

/// Strips module paths and whitespace from a type name:
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
fn unqualified(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut path_start = 0;
    let mut chars = type_name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(path_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else if !c.is_whitespace() {
            out.push(c);
            path_start = out.len();
        }
    }
    out
}

impl<T> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            binding: self.binding.clone(),
        }
    }
}

impl<T> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.binding {
            Binding::Handler(_) => None,
            Binding::Interceptor { target, .. } => Some(target),
        };
        f.debug_struct("Proxy")
            .field("descriptor", &self.descriptor)
            .field("target", &target)
            .finish()
    }
}
