//! `Proxide` runtime module.
//!
//! # Architecture
//!
//! The runtime is organized leaf-first:
//!
//! - [`value`]: tagged dynamic values crossing the proxy boundary
//! - [`contract`]: interface metadata and compile-time contract handles
//! - [`catalog`]: deterministic method tables with stable ordinals
//! - [`invocation`]: per-call invocation records
//! - [`interceptor`]: handlers, interceptors and the interception context
//! - [`descriptor`]: shared proxy descriptors and their builder
//! - [`cache`]: the build-once descriptor cache
//! - [`target`]: target binding and type-erased forwarding
//! - [`proxy`]: proxy instances and the dispatch protocol
//! - [`factory`]: validation and proxy creation
//!
//! # Lifetimes
//!
//! Interface metadata is registered for the program duration. Descriptors
//! live as long as the cache holding them or the last proxy using them.
//! Invocation records and interception contexts never outlive their call.

pub mod cache;
pub mod catalog;
pub mod contract;
pub mod descriptor;
pub mod factory;
pub mod interceptor;
pub mod invocation;
pub mod proxy;
pub mod target;
pub mod value;

pub use cache::{CacheKey, DescriptorCache};
pub use catalog::{Declaration, MethodCatalog, MethodDescriptor};
pub use contract::{
    Contract, ContractKind, ContractSet, GenericParam, Interface, InterfaceBuilder, InterfaceId,
    MethodSignature, Parameter, Visibility,
};
pub use descriptor::{DispatchTable, Mode, ProxyBuilder, ProxyDescriptor};
pub use factory::{
    FactoryConfig, ProxyFactory, create_proxy_for_target, create_proxy_without_target,
};
pub use interceptor::{
    FnHandler, FnInterceptor, Handler, InterceptionContext, Interceptor, handler_fn, interceptor_fn,
};
pub use invocation::{ArgumentReader, Invocation};
pub use proxy::Proxy;
pub use target::{AdapterSet, Forward, NoTarget, Target, TargetAdapter};
pub use value::{TypeRef, Value, ValueType};
