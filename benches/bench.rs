use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use kvhttp::{KvsEngine, MemoryStore, Value};
use rand::prelude::*;
use std::thread;

fn set_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_bench");
    group.bench_function("memory", |b| {
        b.iter_batched(
            MemoryStore::new,
            |store| {
                for i in 1..(1 << 12) {
                    store
                        .set(format!("key{}", i), Value::from("value"))
                        .unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn get_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_bench");
    for i in &vec![8, 12, 16, 20] {
        group.bench_with_input(format!("memory_{}", i), i, |b, i| {
            let store = MemoryStore::new();
            for key_i in 1..(1 << i) {
                store
                    .set(format!("key{}", key_i), Value::from("value"))
                    .unwrap();
            }
            let mut rng = SmallRng::from_seed([0; 16]);
            b.iter(|| {
                store
                    .get(format!("key{}", rng.gen_range(1, 1 << i)))
                    .unwrap();
            })
        });
    }
    group.finish();
}

fn write_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_bench");
    for i in &vec![4, 8, 16, 32] {
        group.bench_with_input(format!("threads_{i}"), i, |b, i| {
            let store = MemoryStore::new();
            b.iter(|| {
                let handles: Vec<_> = (0..*i)
                    .map(|t| {
                        let store = store.clone();
                        thread::spawn(move || {
                            let mut rng = SmallRng::from_seed([t as u8; 16]);
                            for _ in 0..64 {
                                let n = rng.gen_range(1, 32);
                                store
                                    .set(format!("key{}", n), Value::from(format!("value{}", n)))
                                    .unwrap();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, set_bench, get_bench, write_bench);
criterion_main!(benches);
