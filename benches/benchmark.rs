use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use intermark::{Class, Registry, Value};
use serde_json::json;

fn fields() -> intermark::construct::Fields {
    json!({"key": 123}).as_object().cloned().unwrap_or_default()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let registry = Registry::new();

    // native: a plain four level hierarchy, nothing bound
    let native_foo = Class::new("NativeFoo");
    let native_bar = Class::extends("NativeBar", &native_foo);
    let native_base = Class::extends("NativeClassBase", &native_bar);
    let native_class = Class::extends("NativeClass", &native_base);

    // marker: interfaces bound, implementation declared
    let foo = Class::new("IFoo");
    registry.bind_new_marker(&foo).unwrap();
    let bar = Class::new("IBar");
    registry.bind_new_marker(&bar).unwrap();
    let base = Class::new("IClassBase");
    registry.implements_interface(&base, &[&foo]).unwrap();
    let custom = Class::extends("CustomClass", &base);
    registry.implements_interface(&custom, &[&bar]).unwrap();

    c.bench_function("native if", |b| {
        b.iter(|| {
            let ins = Value::from(native_class.instantiate(fields()));
            for class in [&native_foo, &native_bar, &native_base, &native_class] {
                black_box(registry.satisfies(&ins, class));
            }
        })
    });
    c.bench_function("marker if", |b| {
        b.iter(|| {
            let ins = Value::from(custom.instantiate(fields()));
            for class in [&foo, &bar, &base, &custom] {
                black_box(registry.satisfies(&ins, class));
            }
        })
    });
    let ins = Value::from(custom.instantiate(fields()));
    c.bench_function("marker check only", |b| {
        b.iter(|| black_box(registry.satisfies(black_box(&ins), &foo)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
