//! Proxy creation validation tests.
//!
//! Every configuration error is raised by the factory, before any descriptor
//! is built.

mod common;

use common::{Calculator, IFooContract, IOneContract, ITwoContract};
use proxide::{
    Contract, ContractKind, Error, ErrorKind, Interface, MethodSignature, ProxyFactory, Target,
    Visibility, create_proxy_without_target, handler_fn, interceptor_fn, interface,
};

interface! {
    trait Hidden {
        fn hide(&self);
    }
}

interface! {
    pub(crate) trait Internal {
        fn peek(&self) -> u8;
    }
}

#[test]
fn test_concrete_contract_rejected() {
    let factory = ProxyFactory::new();
    let widget = Interface::builder("Widget")
        .module_path("shop")
        .kind(ContractKind::Concrete)
        .method(MethodSignature::new("price").returns("u32"))
        .build();

    let err = factory
        .create_without_target(&[widget], handler_fn(|_| Ok(None)))
        .unwrap_err();
    assert_eq!(
        err,
        Error::NotAnInterface {
            interface: "shop::Widget".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(factory.cache().is_empty());
}

#[test]
fn test_private_interface_rejected() {
    let err =
        create_proxy_without_target::<(HiddenContract,), _>(handler_fn(|_| Ok(None))).unwrap_err();
    assert!(matches!(
        err,
        Error::NotVisible {
            visibility: Visibility::Private,
            ..
        }
    ));
    assert_eq!(HiddenContract::interface().visibility(), Visibility::Private);
}

#[test]
fn test_restricted_interface_rejected() {
    let err =
        create_proxy_without_target::<(IOneContract, InternalContract), _>(handler_fn(|_| Ok(None)))
            .unwrap_err();
    assert!(matches!(
        err,
        Error::NotVisible {
            visibility: Visibility::Restricted,
            ..
        }
    ));
}

#[test]
fn test_no_interfaces_rejected() {
    let factory = ProxyFactory::new();
    let err = factory
        .create_without_target(&[], handler_fn(|_| Ok(None)))
        .unwrap_err();
    assert_eq!(err, Error::NoInterfaces);
}

#[test]
fn test_target_mismatch_names_first_missing_interface() {
    let factory = ProxyFactory::new();
    let target = Target::new(Calculator::default()).conform::<IOneContract>();

    let err = factory
        .create_with_target(
            &[
                IOneContract::interface(),
                ITwoContract::interface(),
                IFooContract::interface(),
            ],
            interceptor_fn(|c| c.proceed()),
            target,
        )
        .unwrap_err();

    match err {
        Error::TargetInterfaceMismatch { interface } => assert!(interface.ends_with("::ITwo")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(factory.cache().is_empty());
}

#[test]
fn test_target_shape_checked_before_conformance() {
    let factory = ProxyFactory::new();
    let hidden = Interface::builder("Sealed")
        .visibility(Visibility::Restricted)
        .build();

    let err = factory
        .create_with_target(&[hidden], interceptor_fn(|c| c.proceed()), Target::new(0u8))
        .unwrap_err();
    assert!(matches!(err, Error::NotVisible { .. }));
}

#[test]
fn test_interface_metadata() {
    let iface = IFooContract::interface();
    assert_eq!(iface.name(), "IFoo");
    assert!(iface.qualified_name().ends_with("common::IFoo"));
    assert_eq!(iface.kind(), ContractKind::Interface);
    assert_eq!(iface.visibility(), Visibility::Public);

    let baz = iface.method("baz").unwrap();
    assert_eq!(baz.parameters()[0].name(), "value");
    assert_eq!(baz.parameters()[0].type_name(), "i32");
    assert_eq!(baz.return_type(), Some("i32"));
    assert!(iface.method("foo").unwrap().is_void());
    assert!(std::ptr::eq(iface, IFooContract::interface()));
}

#[test]
fn test_generic_metadata_keeps_constraints() {
    let iface = common::IConvertContract::interface();
    let convert = iface.method("convert").unwrap();
    assert!(convert.is_generic());
    assert_eq!(convert.generics()[0].name(), "U");
    assert_eq!(convert.generics()[0].constraints(), ["Display"]);
    assert!(iface.method("echo").unwrap().generics()[0].constraints().is_empty());
}
