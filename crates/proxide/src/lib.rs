//! `Proxide`: Runtime Proxies for Rust Traits
//!
//! `Proxide` builds objects that implement one or more interface traits by
//! routing every method call through user code. It is the runtime building
//! block for cross-cutting behavior such as logging, retries, caching or
//! metrics, without a hand-written wrapper per trait.
//!
//! - **Without target**: a [`Handler`] answers every call on its own.
//! - **With target**: an [`Interceptor`] sees every call, may rewrite its
//!   arguments, forwards it to a real object with
//!   [`InterceptionContext::proceed`], and may override the result.
//!
//! # Architecture
//!
//! - **Declaration layer**: [`interface!`] generates the trait, its contract
//!   marker and the dispatch adapters at compile time.
//! - **Descriptor layer**: a [`MethodCatalog`] and dispatch table per interface
//!   set and [`Mode`], built once and cached by the [`ProxyFactory`].
//! - **Call layer**: [`Proxy`] captures arguments as [`Value`]s, runs the
//!   handler or interceptor and converts the result back, with exact runtime
//!   type checks at every boundary.
//!
//! # Example
//!
//! ```rust
//! use proxide::{interface, interceptor_fn, Value};
//!
//! interface! {
//!     pub trait Pricing {
//!         fn quote(&self, item: String) -> u32;
//!     }
//! }
//!
//! struct Catalog;
//!
//! impl Pricing for Catalog {
//!     fn quote(&self, item: String) -> proxide::Result<u32> {
//!         Ok(item.len() as u32 * 10)
//!     }
//! }
//!
//! let discount = interceptor_fn(|context| {
//!     context.proceed()?;
//!     let price = context.result().and_then(Value::cast::<u32>).unwrap_or_default();
//!     context.set_result(price / 2);
//!     Ok(())
//! });
//!
//! let pricing =
//!     proxide::create_proxy_for_target::<(PricingContract,), _, _>(discount, Catalog).unwrap();
//! assert_eq!(pricing.quote("tea".into()).unwrap(), 15);
//! ```

pub mod error;
mod macros;
pub mod runtime;

#[doc(hidden)]
pub mod __private {
    pub use paste;
}

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use runtime::{
    AdapterSet, ArgumentReader, CacheKey, Contract, ContractKind, ContractSet, DescriptorCache,
    FactoryConfig, Handler, InterceptionContext, Interceptor, Interface, InterfaceBuilder,
    Invocation, MethodCatalog, MethodDescriptor, MethodSignature, Mode, NoTarget, Proxy,
    ProxyDescriptor, ProxyFactory, Target, TargetAdapter, TypeRef, Value, ValueType, Visibility,
    create_proxy_for_target, create_proxy_without_target, handler_fn, interceptor_fn,
};
