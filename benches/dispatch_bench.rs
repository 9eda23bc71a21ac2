use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::prelude::*;
use serde_json::json;
use sockserver::{ConnectionState, Registry, Store};

fn utility_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("utility");
    let registry = Registry::standard();

    group.bench_function("echo", |b| {
        let mut conn = ConnectionState::new(Store::new());
        b.iter(|| registry.dispatch(r#"{"type":"echo","data":"benchmark"}"#, &mut conn));
    });

    group.bench_function("addmany", |b| {
        let mut rng = thread_rng();
        let mut conn = ConnectionState::new(Store::new());
        b.iter_batched(
            || {
                let nums: Vec<i32> = (0..100).map(|_| rng.gen_range(-1000..1000)).collect();
                json!({"type": "addmany", "nums": nums}).to_string()
            },
            |raw| registry.dispatch(&raw, &mut conn),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("not_json", |b| {
        let mut conn = ConnectionState::new(Store::new());
        b.iter(|| registry.dispatch("Invalid JSON", &mut conn));
    });

    group.finish();
}

fn inventory_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory");
    let registry = Registry::standard();

    group.bench_function("add_then_buy", |b| {
        let mut rng = thread_rng();
        let mut conn = ConnectionState::new(Store::new());
        b.iter_batched(
            || {
                let product = format!("product{}", rng.gen_range(0..100));
                let add = json!({
                    "type": "inventory",
                    "task": "add",
                    "productName": product,
                    "quantity": 2
                });
                let buy = json!({
                    "type": "inventory",
                    "task": "buy",
                    "productName": product,
                    "quantity": 1
                });
                (add.to_string(), buy.to_string())
            },
            |(add, buy)| {
                registry.dispatch(&add, &mut conn);
                registry.dispatch(&buy, &mut conn)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, utility_bench, inventory_bench);
criterion_main!(benches);
