use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use enumerize::{Attribute, Input};

pub fn criterion_benchmark(c: &mut Criterion) {
    let small = Attribute::<()>::builder("status")
        .stored([("active", 1), ("blocked", 2)])
        .default("active")
        .build()
        .unwrap();
    let names: Vec<String> = (0..1000).map(|n| format!("member_{}", n)).collect();
    let large = Attribute::<()>::builder("code")
        .list(names.iter().cloned())
        .multiple(true)
        .build()
        .unwrap();
    println!("{:?}", small);

    c.bench_function("coerce name", |b| b.iter(|| small.coerce(&(), black_box("blocked"))));
    c.bench_function("coerce integer", |b| b.iter(|| small.coerce(&(), black_box(2))));
    c.bench_function("coerce nil", |b| b.iter(|| small.coerce(&(), black_box(Input::Nil))));
    c.bench_function("coerce unknown", |b| b.iter(|| small.coerce(&(), black_box("archived"))));
    c.bench_function("coerce last of 1k", |b| {
        b.iter(|| large.find(black_box("member_999")))
    });
    let inputs: Vec<&str> = names.iter().rev().take(100).map(String::as_str).collect();
    c.bench_function("collection of 100 from 1k", |b| {
        b.iter(|| large.coerce_collection(black_box(inputs.iter().copied())))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
