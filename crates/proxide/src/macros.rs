//! Compile-time adapter generation.
//!
//! [`interface!`](crate::interface) declares an interface trait together with
//! everything the runtime needs to proxy it:
//!
//! - the trait, with every method returning `proxide::Result<R>`
//! - a `NameContract` marker implementing [`Contract`](crate::Contract), whose
//!   interface metadata is built lazily and lives for the program duration
//! - `impl Name for Proxy<T>` running the dispatch protocol for every method
//! - `impl TargetAdapter<T> for NameContract` for dynamic forwarding
//! - `impl Name for NoTarget`, making without-target proxies implement it
//!
//! Receivers must be `&self`. Parameter and return types must be
//! [`ValueType`](crate::ValueType)s; shared references are passed as `Arc<T>`.
//! Generic parameters get an implicit `ValueType` bound; further bounds are
//! single trait names in scope, joined with `+`.
//! A method's generic parameters must not be named `T`, which the generated
//! proxy impls use for the target type.

/// Declares a proxiable interface.
///
/// ```rust
/// use proxide::{interceptor_fn, interface};
///
/// interface! {
///     /// A counter.
///     pub trait Counter {
///         fn add(&self, amount: u64) -> u64;
///         fn reset(&self);
///     }
/// }
///
/// struct Fixed(u64);
///
/// impl Counter for Fixed {
///     fn add(&self, amount: u64) -> proxide::Result<u64> {
///         Ok(self.0 + amount)
///     }
///
///     fn reset(&self) -> proxide::Result<()> {
///         Ok(())
///     }
/// }
///
/// let doubling = interceptor_fn(|context| {
///     let amount = context.argument::<u64>(0).copied().unwrap_or_default();
///     context.set_argument(0, amount * 2)?;
///     context.proceed()
/// });
///
/// let proxy =
///     proxide::create_proxy_for_target::<(CounterContract,), _, _>(doubling, Fixed(1)).unwrap();
/// assert_eq!(proxy.add(5).unwrap(), 11);
/// ```
#[macro_export]
macro_rules! interface {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$mmeta:meta])*
                fn $method:ident
                    $(< $($gen:ident $(: $gb0:ident $(+ $gbn:ident)*)?),* >)?
                    (&self $(, $arg:ident : $ty:ty)*)
                    $(-> $ret:ty)?;
            )*
        }
    ) => {
        $crate::__private::paste::paste! {
            $(#[$meta])*
            $vis trait $name {
                $(
                    $(#[$mmeta])*
                    fn $method $(< $($gen: $crate::ValueType $(+ $gb0 $(+ $gbn)*)?),* >)?
                        (&self $(, $arg: $ty)*) -> $crate::Result<$crate::__return_type!($($ret)?)>;
                )*
            }

            #[doc = concat!("Contract marker of [`", stringify!($name), "`].")]
            #[derive(Debug, Clone, Copy, Default)]
            $vis struct [<$name Contract>];

            impl $crate::Contract for [<$name Contract>] {
                fn interface() -> &'static $crate::Interface {
                    static INTERFACE: ::std::sync::LazyLock<$crate::Interface> =
                        ::std::sync::LazyLock::new(|| {
                            $crate::Interface::builder(stringify!($name))
                                .module_path(module_path!())
                                .visibility($crate::Visibility::from_tokens(stringify!($vis)))
                                $(
                                    .method(
                                        $crate::MethodSignature::new(stringify!($method))
                                            $($(.generic(
                                                stringify!($gen),
                                                &[$(stringify!($gb0) $(, stringify!($gbn))*)?],
                                            ))*)?
                                            $(.param(stringify!($arg), stringify!($ty)))*
                                            $(.returns(stringify!($ret)))?
                                    )
                                )*
                                .finish()
                        });
                    &INTERFACE
                }
            }

            impl<T> $name for $crate::Proxy<T>
            where
                T: $name + ::std::marker::Send + ::std::marker::Sync + 'static,
            {
                $(
                    fn $method $(< $($gen: $crate::ValueType $(+ $gb0 $(+ $gbn)*)?),* >)?
                        (&self $(, $arg: $ty)*) -> $crate::Result<$crate::__return_type!($($ret)?)>
                    {
                        let method = $crate::Proxy::<T>::method(
                            self,
                            <[<$name Contract>] as $crate::Contract>::interface(),
                            stringify!($method),
                        )?;
                        let captured = $crate::Proxy::<T>::dispatch(
                            self,
                            method,
                            ::std::vec![$($crate::Value::new($arg)),*],
                            ::std::vec![$($($crate::TypeRef::of::<$gen>()),*)?],
                            |target: &T, arguments: &[$crate::Value]| {
                                #[allow(unused_mut, unused_variables)]
                                let mut reader = $crate::ArgumentReader::new(&method, arguments);
                                $(let $arg: $ty = reader.next::<$ty>()?;)*
                                $crate::__box_return!(
                                    <T as $name>::$method $(::<$($gen),*>)? (target $(, $arg)*);
                                    $($ret)?
                                )
                            },
                        )?;
                        $crate::__convert_return!(method, captured $(, $ret)?)
                    }
                )*
            }

            impl<T> $crate::TargetAdapter<T> for [<$name Contract>]
            where
                T: $name + ::std::marker::Send + ::std::marker::Sync + 'static,
            {
                fn forward(
                    target: &T,
                    method: &$crate::MethodDescriptor,
                    arguments: &[$crate::Value],
                ) -> $crate::Result<::std::option::Option<$crate::Value>> {
                    match method.name() {
                        $(
                            stringify!($method) => $crate::__erased_call!(
                                target, method, arguments, $name, $method,
                                [$($($gen)*)?],
                                ($($arg: $ty),*),
                                ($($ret)?)
                            ),
                        )*
                        other => ::std::result::Result::Err($crate::Error::MethodNotFound {
                            interface: <Self as $crate::Contract>::interface().qualified_name(),
                            method: ::std::string::ToString::to_string(other),
                        }),
                    }
                }
            }

            impl $name for $crate::NoTarget {
                $(
                    #[allow(unused_variables)]
                    fn $method $(< $($gen: $crate::ValueType $(+ $gb0 $(+ $gbn)*)?),* >)?
                        (&self $(, $arg: $ty)*) -> $crate::Result<$crate::__return_type!($($ret)?)>
                    {
                        ::std::result::Result::Err($crate::Error::NoTarget {
                            method: ::std::format!(
                                "{}::{}",
                                stringify!($name),
                                stringify!($method)
                            ),
                        })
                    }
                )*
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __return_type {
    () => { () };
    ($ret:ty) => { $ret };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __box_return {
    ($call:expr;) => {{
        $call?;
        ::std::result::Result::Ok(::std::option::Option::None)
    }};
    ($call:expr; $ret:ty) => {
        ::std::result::Result::Ok(::std::option::Option::Some($crate::Value::new::<$ret>($call?)))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __convert_return {
    ($method:ident, $captured:ident) => {{
        let _ = $captured;
        ::std::result::Result::Ok(())
    }};
    ($method:ident, $captured:ident, $ret:ty) => {
        $method.convert_return::<$ret>($captured)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __erased_call {
    (
        $target:ident, $method:ident, $arguments:ident, $name:ident, $m:ident,
        [], ($($arg:ident : $ty:ty),*), ($($ret:ty)?)
    ) => {{
        #[allow(unused_mut)]
        let mut reader = $crate::ArgumentReader::new($method, $arguments);
        $(let $arg: $ty = reader.next::<$ty>()?;)*
        $crate::__box_return!(<_ as $name>::$m($target $(, $arg)*); $($ret)?)
    }};
    (
        $target:ident, $method:ident, $arguments:ident, $name:ident, $m:ident,
        [$($gen:ident)+], $args:tt, $ret:tt
    ) => {{
        let _ = ($target, $arguments);
        ::std::result::Result::Err($crate::Error::OpenGenericMethod {
            method: ::std::string::ToString::to_string($method),
        })
    }};
}
