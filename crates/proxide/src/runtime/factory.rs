//! Proxy factory.
//!
//! The factory is the entry point of the engine. It validates a request
//! eagerly, resolves the [`ProxyDescriptor`] for the interface set through its
//! [`DescriptorCache`], and binds a new [`Proxy`] to the supplied handler or
//! interceptor and target. Configuration errors are always raised here, never
//! on first use of the proxy.
//!
//! # Example
//!
//! ```rust
//! use proxide::{handler_fn, interface, Value};
//!
//! interface! {
//!     pub trait Greeter {
//!         fn greet(&self, name: String) -> String;
//!     }
//! }
//!
//! let greeter = handler_fn(|invocation| {
//!     let name = invocation.argument::<String>(0).cloned().unwrap_or_default();
//!     Ok(Some(Value::new(format!("hello {name}"))))
//! });
//! let proxy = proxide::create_proxy_without_target::<(GreeterContract,), _>(greeter).unwrap();
//!
//! assert_eq!(proxy.greet("ada".into()).unwrap(), "hello ada");
//! ```

use crate::error::Result;
use crate::runtime::cache::{CacheKey, DescriptorCache};
use crate::runtime::catalog::{self, MethodCatalog};
use crate::runtime::contract::{ContractSet, Interface};
use crate::runtime::descriptor::{Mode, ProxyBuilder, ProxyDescriptor};
use crate::runtime::interceptor::{Handler, Interceptor};
use crate::runtime::proxy::Proxy;
use crate::runtime::target::{AdapterSet, NoTarget, Target};
use std::sync::{Arc, LazyLock};

/// Process-wide factory, created on first use.
static GLOBAL_FACTORY: LazyLock<ProxyFactory> = LazyLock::new(ProxyFactory::new);

/// Factory behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Collapse identically shaped methods of different interfaces into one
    /// catalog slot. Off by default: every declaration gets its own slot.
    pub deduplicate_signatures: bool,
}

/// Creates proxies and owns the descriptor cache they share.
#[derive(Debug, Default)]
pub struct ProxyFactory {
    cache: DescriptorCache,
    config: FactoryConfig,
}

impl ProxyFactory {
    /// Creates a factory with the default configuration and an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    /// Creates a factory with `config` and an empty cache.
    #[must_use]
    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            cache: DescriptorCache::new(),
            config,
        }
    }

    /// The process-wide factory used by [`create_proxy_without_target`] and
    /// [`create_proxy_for_target`].
    #[must_use]
    pub fn global() -> &'static ProxyFactory {
        &GLOBAL_FACTORY
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> FactoryConfig {
        self.config
    }

    /// The descriptor cache.
    #[must_use]
    pub const fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    /// Returns the descriptor for `interfaces` in `mode`, building it on first
    /// request.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if any contract is not a public
    /// interface.
    pub fn descriptor(
        &self,
        interfaces: &[&'static Interface],
        mode: Mode,
    ) -> Result<Arc<ProxyDescriptor>> {
        validate(interfaces)?;
        self.resolve(interfaces, mode)
    }

    /// Creates a proxy answering every call with `handler`.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if any contract is not a public
    /// interface.
    pub fn create_without_target<H>(
        &self,
        interfaces: &[&'static Interface],
        handler: H,
    ) -> Result<Proxy<NoTarget>>
    where
        H: Handler + 'static,
    {
        validate(interfaces)?;
        let descriptor = self.resolve(interfaces, Mode::WithoutTarget)?;
        tracing::debug!(?descriptor, "created proxy without target");
        Ok(Proxy::with_handler(descriptor, Arc::new(handler)))
    }

    /// Creates a proxy routing every call through `interceptor`, which may
    /// proceed to `target`.
    ///
    /// # Errors
    ///
    /// - a configuration error if any contract is not a public interface
    /// - `Error::TargetInterfaceMismatch` naming the first interface `target`
    ///   does not conform to
    pub fn create_with_target<T, I>(
        &self,
        interfaces: &[&'static Interface],
        interceptor: I,
        target: Target<T>,
    ) -> Result<Proxy<T>>
    where
        T: Send + Sync + 'static,
        I: Interceptor + 'static,
    {
        validate(interfaces)?;
        target.check(interfaces).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected proxy target");
        })?;
        let descriptor = self.resolve(interfaces, Mode::WithTarget)?;
        tracing::debug!(?descriptor, ?target, "created proxy with target");
        Ok(Proxy::with_interceptor(descriptor, Arc::new(interceptor), target))
    }

    fn resolve(
        &self,
        interfaces: &[&'static Interface],
        mode: Mode,
    ) -> Result<Arc<ProxyDescriptor>> {
        let key = CacheKey::new(interfaces, mode);
        self.cache.get_or_build(key, |key| {
            let canonical = canonical_order(interfaces);
            let catalog = MethodCatalog::build(&canonical, self.config.deduplicate_signatures)?;
            ProxyBuilder::new(key.clone(), canonical).build(catalog)
        })
    }
}

fn validate(interfaces: &[&'static Interface]) -> Result<()> {
    catalog::validate(interfaces).inspect_err(|err| {
        tracing::debug!(error = %err, "rejected proxy configuration");
    })
}

/// Sorts interfaces by qualified name, then identity, dropping repeats.
fn canonical_order(interfaces: &[&'static Interface]) -> Vec<&'static Interface> {
    let mut canonical = interfaces.to_vec();
    canonical.sort_by(|a, b| {
        a.qualified_name()
            .cmp(&b.qualified_name())
            .then_with(|| a.id().cmp(&b.id()))
    });
    canonical.dedup_by_key(|i| i.id());
    canonical
}

/// Creates a proxy for the contracts `S` through the global factory,
/// answering every call with `handler`.
///
/// # Errors
///
/// Fails with a configuration error if any contract of `S` is not public.
pub fn create_proxy_without_target<S, H>(handler: H) -> Result<Proxy<NoTarget>>
where
    S: ContractSet,
    H: Handler + 'static,
{
    ProxyFactory::global().create_without_target(&S::interfaces(), handler)
}

/// Creates a proxy for the contracts `S` through the global factory, routing
/// every call through `interceptor` with `target` as the real object.
///
/// Conformance of `target` to every contract of `S` is checked by the type
/// system.
///
/// # Errors
///
/// Fails with a configuration error if any contract of `S` is not public.
pub fn create_proxy_for_target<S, T, I>(interceptor: I, target: T) -> Result<Proxy<T>>
where
    S: AdapterSet<T>,
    T: Send + Sync + 'static,
    I: Interceptor + 'static,
{
    let target = S::conform(Target::new(target));
    ProxyFactory::global().create_with_target(&S::interfaces(), interceptor, target)
}
