//! Dynamic values crossing the proxy boundary.
//!
//! Arguments and results travel between proxies, handlers, interceptors and
//! targets as [`Value`]s: a shared, type-erased payload tagged with its
//! [`TypeRef`]. Unboxing is an exact type check against the requested type.
//! There is no implicit numeric widening: an `i32` is never readable as `i64`.
//!
//! # Example
//!
//! ```rust
//! use proxide::Value;
//!
//! let value = Value::new(42i32);
//! assert!(value.is::<i32>());
//! assert_eq!(value.cast::<i32>(), Some(42));
//! assert_eq!(value.cast::<i64>(), None);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Runtime identity of a Rust type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    /// Returns the `TypeRef` of `T`.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the identity of `T`.
    #[inline]
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Types that can be captured as arguments or results.
///
/// Values are shared between the caller, the interceptor and the target, and
/// `proceed` may run more than once per call, so unboxing clones.
pub trait ValueType: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> ValueType for T {}

/// Type-erased argument or result value.
///
/// Cloning a `Value` is cheap: the payload is reference counted.
#[derive(Clone)]
pub struct Value {
    ty: TypeRef,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Boxes `value`.
    #[must_use]
    pub fn new<T: ValueType>(value: T) -> Self {
        Self {
            ty: TypeRef::of::<T>(),
            payload: Arc::new(value),
        }
    }

    /// Returns the runtime type of the payload.
    #[inline]
    #[must_use]
    pub const fn type_ref(&self) -> TypeRef {
        self.ty
    }

    /// Returns the name of the payload type.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name
    }

    /// Returns `true` if the payload is exactly a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Borrows the payload as `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Returns a copy of the payload as `T`.
    #[must_use]
    pub fn cast<T: ValueType>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Unboxes the payload as `T`, avoiding a clone when this is the only
    /// handle to it.
    ///
    /// # Errors
    ///
    /// Returns the value unchanged if the payload is not a `T`.
    pub fn into_inner<T: ValueType>(self) -> std::result::Result<T, Value> {
        let ty = self.ty;
        match self.payload.downcast::<T>() {
            Ok(shared) => Ok(Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone())),
            Err(payload) => Err(Value { ty, payload }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.ty.name)
    }
}
