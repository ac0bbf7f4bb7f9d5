// Proxy benchmarks for the Proxide runtime
//
// These benchmarks compare a direct trait call with the same call through a
// without-target proxy and a with-target proxy, and measure proxy creation
// on a warm descriptor cache.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use proxide::{
    Value, create_proxy_for_target, create_proxy_without_target, handler_fn, interceptor_fn,
    interface,
};

interface! {
    pub trait Adder {
        fn add(&self, a: i64, b: i64) -> i64;
        fn touch(&self);
    }
}

struct Plain;

impl Adder for Plain {
    fn add(&self, a: i64, b: i64) -> proxide::Result<i64> {
        Ok(a + b)
    }

    fn touch(&self) -> proxide::Result<()> {
        Ok(())
    }
}

/// Benchmark call overhead against a direct call.
fn bench_call_overhead(c: &mut Criterion) {
    let direct = Plain;
    let without = create_proxy_without_target::<(AdderContract,), _>(handler_fn(|invocation| {
        let a = invocation.argument::<i64>(0).copied().unwrap_or_default();
        let b = invocation.argument::<i64>(1).copied().unwrap_or_default();
        Ok(Some(Value::new(a + b)))
    }))
    .unwrap();
    let passthrough = interceptor_fn(|context| context.proceed());
    let with = create_proxy_for_target::<(AdderContract,), _, _>(passthrough, Plain).unwrap();

    let mut group = c.benchmark_group("call_overhead");

    group.bench_function("direct", |b| {
        b.iter(|| black_box(direct.add(black_box(1), black_box(2)).unwrap()));
    });

    group.bench_function("without_target", |b| {
        b.iter(|| black_box(without.add(black_box(1), black_box(2)).unwrap()));
    });

    group.bench_function("with_target", |b| {
        b.iter(|| black_box(with.add(black_box(1), black_box(2)).unwrap()));
    });

    group.bench_function("with_target_void", |b| {
        b.iter(|| with.touch().unwrap());
    });

    group.finish();
}

/// Benchmark proxy creation once the descriptor is cached.
fn bench_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation");

    group.bench_function("without_target", |b| {
        b.iter(|| {
            let proxy =
                create_proxy_without_target::<(AdderContract,), _>(handler_fn(|_| Ok(None)))
                    .unwrap();
            black_box(proxy);
        });
    });

    group.bench_function("with_target", |b| {
        b.iter(|| {
            let proxy = create_proxy_for_target::<(AdderContract,), _, _>(
                interceptor_fn(|context| context.proceed()),
                Plain,
            )
            .unwrap();
            black_box(proxy);
        });
    });

    group.finish();
}

/// Benchmark dynamic sends by argument count.
fn bench_send(c: &mut Criterion) {
    let passthrough = interceptor_fn(|context| context.proceed());
    let proxy = create_proxy_for_target::<(AdderContract,), _, _>(passthrough, Plain).unwrap();
    let iface = <AdderContract as proxide::Contract>::interface();

    let mut group = c.benchmark_group("send");
    for (name, args) in [("touch", 0usize), ("add", 2)] {
        group.bench_with_input(BenchmarkId::new("send", name), &args, |b, &args| {
            b.iter(|| {
                let arguments = (0..args).map(|i| Value::new(i as i64)).collect();
                black_box(proxy.send(iface, name, arguments).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_call_overhead, bench_creation, bench_send);
criterion_main!(benches);
