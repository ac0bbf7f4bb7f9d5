//! Interception tests for proxies bound to a target.
//!
//! Covers argument rewriting, proceed semantics, result overrides, type
//! checks at both boundaries and generic methods.

mod common;

use common::{
    Calculator, IConvert, IConvertContract, IFoo, IFooContract, IOne, IOneContract, ITwo,
    ITwoContract,
};
use proxide::{
    Contract, Error, ErrorKind, Mode, Proxy, TypeRef, Value, create_proxy_for_target,
    interceptor_fn,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn passthrough_foo() -> Proxy<Calculator> {
    create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| context.proceed()),
        Calculator::default(),
    )
    .unwrap()
}

fn target_of(proxy: &Proxy<Calculator>) -> &Calculator {
    proxy.target().map(|t| t.object()).unwrap()
}

#[test]
fn test_passthrough_reaches_target() {
    let proxy = passthrough_foo();

    assert_eq!(proxy.baz(4).unwrap(), 8);
    proxy.foo().unwrap();
    assert_eq!(target_of(&proxy).calls(), 2);
    assert_eq!(proxy.mode(), Mode::WithTarget);
}

#[test]
fn test_rewritten_argument_reaches_target() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| {
            context.set_argument(0, 100i32)?;
            context.proceed()
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.baz(1).unwrap(), 200);
    assert_eq!(*target_of(&proxy).seen.lock().unwrap(), [100]);
}

#[test]
fn test_result_override_wins() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| {
            context.proceed()?;
            assert_eq!(context.result().and_then(Value::cast::<i32>), Some(6));
            context.set_result(-1i32);
            Ok(())
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.baz(3).unwrap(), -1);
}

#[test]
fn test_wrong_result_override_rejected() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| {
            context.proceed()?;
            context.set_result("not a number".to_string());
            Ok(())
        }),
        Calculator::default(),
    )
    .unwrap();

    let err = proxy.baz(3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidReturnType);
    assert_eq!(target_of(&proxy).calls(), 1);
}

#[test]
fn test_wrong_argument_rejected_at_proceed() {
    let observed = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&observed);
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(move |context| {
            context.set_argument(0, 1.5f64)?;
            let result = context.proceed();
            if matches!(result, Err(Error::ArgumentTypeMismatch { index: 0, .. })) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
            result
        }),
        Calculator::default(),
    )
    .unwrap();

    let err = proxy.baz(3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
    assert_eq!(observed.load(Ordering::SeqCst), 1);
    assert_eq!(target_of(&proxy).calls(), 0);
}

#[test]
fn test_interceptor_without_proceed() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|_| Ok(())),
        Calculator::default(),
    )
    .unwrap();

    proxy.foo().unwrap();
    assert!(matches!(proxy.baz(1), Err(Error::MissingResult { .. })));
    assert_eq!(target_of(&proxy).calls(), 0);
}

#[test]
fn test_short_circuit_result() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| {
            context.set_result(9i32);
            Ok(())
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.baz(1).unwrap(), 9);
    assert_eq!(target_of(&proxy).calls(), 0);
}

#[test]
fn test_repeated_proceed_calls_target_again() {
    let proxy = create_proxy_for_target::<(IFooContract,), _, _>(
        interceptor_fn(|context| {
            context.proceed()?;
            context.set_argument(0, 10i32)?;
            context.proceed()?;
            assert_eq!(context.proceed_count(), 2);
            Ok(())
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.baz(1).unwrap(), 20);
    assert_eq!(*target_of(&proxy).seen.lock().unwrap(), [1, 10]);
}

#[test]
fn test_multi_interface_cast() {
    let intercepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&intercepted);
    let proxy = create_proxy_for_target::<(ITwoContract, IOneContract), _, _>(
        interceptor_fn(move |context| {
            counter.fetch_add(1, Ordering::SeqCst);
            context.proceed()
        }),
        Calculator::default(),
    )
    .unwrap();

    let one: &dyn IOne = &proxy;
    assert_eq!(one.one().unwrap(), "one");
    assert_eq!(proxy.two(1).unwrap(), 3);
    assert_eq!(intercepted.load(Ordering::SeqCst), 2);
}

#[test]
fn test_interceptor_sees_method_identity() {
    let proxy = create_proxy_for_target::<(ITwoContract, IOneContract), _, _>(
        interceptor_fn(|context| {
            let name = context.method().name();
            let interface = context.method().interface().name();
            context.proceed()?;
            if name == "two" && interface == "ITwo" {
                context.set_result(0u32);
            }
            Ok(())
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.two(5).unwrap(), 0);
    assert_eq!(proxy.one().unwrap(), "one");
}

#[test]
fn test_generic_methods_close_at_call_site() {
    let proxy = create_proxy_for_target::<(IConvertContract,), _, _>(
        interceptor_fn(|context| {
            if context.method().name() == "convert" {
                assert_eq!(context.invocation().generic_arguments(), [TypeRef::of::<u8>()]);
            }
            context.proceed()
        }),
        Calculator::default(),
    )
    .unwrap();

    assert_eq!(proxy.convert(5u8).unwrap(), "<5>");
    assert_eq!(proxy.echo("same".to_string()).unwrap(), "same");
    assert_eq!(proxy.echo(vec![1u16, 2]).unwrap(), [1, 2]);
}

#[test]
fn test_send_forwards_through_adapter() {
    let proxy = create_proxy_for_target::<(ITwoContract, IOneContract), _, _>(
        interceptor_fn(|context| context.proceed()),
        Calculator::default(),
    )
    .unwrap();

    let out = proxy
        .send(ITwoContract::interface(), "two", vec![Value::new(40u32)])
        .unwrap();
    assert_eq!(out.and_then(|v| v.cast::<u32>()), Some(42));

    let err = proxy
        .send(ITwoContract::interface(), "two", vec![Value::new(40i32)])
        .unwrap_err();
    assert!(matches!(err, Error::ArgumentTypeMismatch { index: 0, .. }));
}

#[test]
fn test_send_cannot_close_generic_methods() {
    let proxy = create_proxy_for_target::<(IConvertContract,), _, _>(
        interceptor_fn(|context| context.proceed()),
        Calculator::default(),
    )
    .unwrap();

    let err = proxy
        .send(IConvertContract::interface(), "echo", vec![Value::new(1u8)])
        .unwrap_err();
    assert!(matches!(err, Error::OpenGenericMethod { .. }));
}
