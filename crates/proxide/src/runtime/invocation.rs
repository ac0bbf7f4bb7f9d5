//! Invocation records.
//!
//! An [`Invocation`] captures one call: which method was invoked, with which
//! boxed arguments, and (for generic methods) with which closed type
//! arguments. A record is created for every call and owned by that call.
//!
//! # Example
//!
//! ```rust,ignore
//! let handler = proxide::handler_fn(|invocation: &proxide::Invocation| {
//!     println!("{} called with {} arguments", invocation.method(), invocation.arguments().len());
//!     Ok(None)
//! });
//! ```

use crate::error::{Error, Result};
use crate::runtime::catalog::MethodDescriptor;
use crate::runtime::value::{TypeRef, Value, ValueType};

/// One captured method call.
///
/// Methods without parameters capture an empty argument sequence.
#[derive(Debug, Clone)]
pub struct Invocation {
    method: MethodDescriptor,
    arguments: Vec<Value>,
    generic_arguments: Vec<TypeRef>,
}

impl Invocation {
    /// Creates a record for `method` called with `arguments`.
    #[must_use]
    pub const fn new(method: MethodDescriptor, arguments: Vec<Value>) -> Self {
        Self {
            method,
            arguments,
            generic_arguments: Vec::new(),
        }
    }

    /// Attaches the closed type arguments of a generic method call.
    #[must_use]
    pub fn with_generic_arguments(mut self, generic_arguments: Vec<TypeRef>) -> Self {
        self.generic_arguments = generic_arguments;
        self
    }

    /// The invoked method.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Arguments in call order.
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Mutable access to the arguments.
    ///
    /// The sequence length is fixed; individual values may be replaced.
    #[inline]
    pub fn arguments_mut(&mut self) -> &mut [Value] {
        &mut self.arguments
    }

    /// Type arguments of a generic method call, empty otherwise.
    #[inline]
    #[must_use]
    pub fn generic_arguments(&self) -> &[TypeRef] {
        &self.generic_arguments
    }

    /// Borrows argument `index` as `T`.
    ///
    /// Returns `None` if the index is out of range or the value is not a `T`.
    #[must_use]
    pub fn argument<T: 'static>(&self, index: usize) -> Option<&T> {
        self.arguments.get(index)?.downcast_ref::<T>()
    }

    /// Replaces argument `index`.
    ///
    /// The new value is not type checked here; a mismatch surfaces as
    /// `Error::ArgumentTypeMismatch` when the call is forwarded.
    ///
    /// # Errors
    ///
    /// Returns `Error::ArgumentIndexOutOfRange` if `index` is out of range.
    pub fn set_argument(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.arguments.len();
        let slot = self
            .arguments
            .get_mut(index)
            .ok_or_else(|| Error::ArgumentIndexOutOfRange {
                method: self.method.to_string(),
                index,
                len,
            })?;
        *slot = value;
        Ok(())
    }

    /// Consumes the record, returning its arguments.
    #[must_use]
    pub fn into_arguments(self) -> Vec<Value> {
        self.arguments
    }
}

/// Reads a captured argument sequence back into typed values.
///
/// Each [`next`](Self::next) call unboxes the following argument, checking
/// its runtime type against the requested parameter type.
pub struct ArgumentReader<'a> {
    method: &'a MethodDescriptor,
    arguments: &'a [Value],
    position: usize,
}

impl<'a> ArgumentReader<'a> {
    /// Creates a reader over `arguments` of a call to `method`.
    #[must_use]
    pub const fn new(method: &'a MethodDescriptor, arguments: &'a [Value]) -> Self {
        Self {
            method,
            arguments,
            position: 0,
        }
    }

    /// Unboxes the next argument as `T`.
    ///
    /// # Errors
    ///
    /// - `Error::ArgumentCountMismatch` - the sequence is exhausted
    /// - `Error::ArgumentTypeMismatch` - the value is not a `T`
    pub fn next<T: ValueType>(&mut self) -> Result<T> {
        let index = self.position;
        let value = self
            .arguments
            .get(index)
            .ok_or_else(|| Error::ArgumentCountMismatch {
                method: self.method.to_string(),
                expected: self.method.signature().parameters().len(),
                got: self.arguments.len(),
            })?;
        let typed = value.cast::<T>().ok_or_else(|| Error::ArgumentTypeMismatch {
            method: self.method.to_string(),
            index,
            expected: std::any::type_name::<T>(),
            got: value.type_name(),
        })?;
        self.position += 1;
        Ok(typed)
    }

    /// Number of arguments not read yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.arguments.len() - self.position
    }
}
