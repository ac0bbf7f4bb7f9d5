// Handlers, interceptors and the per-call interception context.
//
// A without-target proxy routes every call to a `Handler`, which fully decides
// the result. A with-target proxy routes every call to an `Interceptor`, which
// receives an `InterceptionContext` and may rewrite arguments, forward the
// call to the target any number of times, and override the result.
//
// The context borrows the forwarding closure from the dispatching proxy, so
// it cannot outlive the call that created it.

use crate::error::{Error, Result};
use crate::runtime::catalog::MethodDescriptor;
use crate::runtime::invocation::Invocation;
use crate::runtime::value::{Value, ValueType};
use std::fmt;

// ============================================================================
// Capabilities
// ============================================================================

/// Capability bound to a without-target proxy.
///
/// Returns the call result. For void methods the returned value is ignored;
/// for non-void methods it must be exactly the declared return type.
pub trait Handler: Send + Sync {
    /// Handles one call.
    ///
    /// # Errors
    ///
    /// Any error is returned unchanged to the proxy caller.
    fn handle(&self, invocation: &Invocation) -> Result<Option<Value>>;
}

/// Capability bound to a with-target proxy.
pub trait Interceptor: Send + Sync {
    /// Intercepts one call.
    ///
    /// # Errors
    ///
    /// Any error is returned unchanged to the proxy caller.
    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()>;
}

/// [`Handler`] backed by a closure, see [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&Invocation) -> Result<Option<Value>> + Send + Sync,
{
    fn handle(&self, invocation: &Invocation) -> Result<Option<Value>> {
        (self.0)(invocation)
    }
}

/// Wraps a closure as a [`Handler`].
///
/// ```rust
/// use proxide::{handler_fn, Value};
///
/// let handler = handler_fn(|_invocation| Ok(Some(Value::new(1u32))));
/// # let _ = handler;
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Invocation) -> Result<Option<Value>> + Send + Sync,
{
    FnHandler(f)
}

/// [`Interceptor`] backed by a closure, see [`interceptor_fn`].
pub struct FnInterceptor<F>(F);

impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(&mut InterceptionContext<'_>) -> Result<()> + Send + Sync,
{
    fn intercept(&self, context: &mut InterceptionContext<'_>) -> Result<()> {
        (self.0)(context)
    }
}

/// Wraps a closure as an [`Interceptor`].
///
/// ```rust
/// use proxide::interceptor_fn;
///
/// let passthrough = interceptor_fn(|context| context.proceed());
/// # let _ = passthrough;
/// ```
pub fn interceptor_fn<F>(f: F) -> FnInterceptor<F>
where
    F: Fn(&mut InterceptionContext<'_>) -> Result<()> + Send + Sync,
{
    FnInterceptor(f)
}

// ============================================================================
// Interception Context
// ============================================================================

/// Forwards the current arguments to the bound target.
pub(crate) type Proceed<'a> = &'a dyn Fn(&[Value]) -> Result<Option<Value>>;

/// Mutable state of one intercepted call.
///
/// Arguments may be rewritten before [`proceed`](Self::proceed); the result
/// slot may be read or overwritten after it.
pub struct InterceptionContext<'a> {
    invocation: Invocation,
    result: Option<Value>,
    proceed: Option<Proceed<'a>>,
    proceeded: usize,
}

impl<'a> InterceptionContext<'a> {
    pub(crate) const fn new(invocation: Invocation, proceed: Option<Proceed<'a>>) -> Self {
        Self {
            invocation,
            result: None,
            proceed,
            proceeded: 0,
        }
    }

    /// The captured call.
    #[inline]
    #[must_use]
    pub const fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The invoked method.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> &MethodDescriptor {
        self.invocation.method()
    }

    /// Current arguments.
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        self.invocation.arguments()
    }

    /// Mutable access to the current arguments.
    #[inline]
    pub fn arguments_mut(&mut self) -> &mut [Value] {
        self.invocation.arguments_mut()
    }

    /// Borrows argument `index` as `T`.
    #[must_use]
    pub fn argument<T: 'static>(&self, index: usize) -> Option<&T> {
        self.invocation.argument(index)
    }

    /// Replaces argument `index` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ArgumentIndexOutOfRange` if `index` is out of range.
    pub fn set_argument<T: ValueType>(&mut self, index: usize, value: T) -> Result<()> {
        self.invocation.set_argument(index, Value::new(value))
    }

    /// The result slot.
    #[inline]
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Overwrites the result slot.
    pub fn set_result<T: ValueType>(&mut self, value: T) {
        self.result = Some(Value::new(value));
    }

    /// Overwrites the result slot with an already boxed value.
    pub fn set_result_value(&mut self, value: Value) {
        self.result = Some(value);
    }

    /// Empties the result slot, returning its content.
    pub fn take_result(&mut self) -> Option<Value> {
        self.result.take()
    }

    /// Returns `true` if [`proceed`](Self::proceed) can reach a target.
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.proceed.is_some()
    }

    /// Forwards the call to the target with the current arguments.
    ///
    /// A non-void return value replaces the result slot. May be called more
    /// than once; each call invokes the target again.
    ///
    /// # Errors
    ///
    /// - `Error::NoTarget` - no target is bound
    /// - `Error::ArgumentTypeMismatch` - an argument was replaced with a value
    ///   of the wrong type
    /// - any error raised by the target
    pub fn proceed(&mut self) -> Result<()> {
        let proceed = self.proceed.ok_or_else(|| Error::NoTarget {
            method: self.invocation.method().to_string(),
        })?;

        tracing::trace!(method = %self.invocation.method(), "proceeding to target");
        self.proceeded += 1;
        if let Some(value) = proceed(self.invocation.arguments())? {
            self.result = Some(value);
        }
        Ok(())
    }

    /// Number of completed or attempted [`proceed`](Self::proceed) calls.
    #[must_use]
    pub const fn proceed_count(&self) -> usize {
        self.proceeded
    }

    /// Consumes the context, returning the result slot.
    #[must_use]
    pub fn into_result(self) -> Option<Value> {
        self.result
    }
}

impl fmt::Debug for InterceptionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionContext")
            .field("invocation", &self.invocation)
            .field("result", &self.result)
            .field("has_target", &self.has_target())
            .field("proceeded", &self.proceeded)
            .finish()
    }
}
