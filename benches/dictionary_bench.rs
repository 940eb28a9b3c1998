use chain_dict::{hash_key, Dictionary};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (Dictionary<u64>, Vec<String>) {
    let mut d = Dictionary::new();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        d.put(k, i as u64);
    }
    (d, keys)
}

fn bench_hash(c: &mut Criterion) {
    let k = key(42);
    c.bench_function("one_at_a_time_hash_17b", |b| {
        b.iter(|| black_box(hash_key(black_box(k.as_bytes()))))
    });
}

fn bench_put(c: &mut Criterion) {
    // Starts at the default capacity, so this includes every doubling.
    c.bench_function("dictionary_put_10k", |b| {
        let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
        b.iter_batched(
            Dictionary::<u64>::new,
            |mut d| {
                for (i, k) in keys.iter().enumerate() {
                    d.put(k, i as u64);
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("dictionary_get_hit", |b| {
        let (d, keys) = filled(7, 20_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(d.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("dictionary_get_miss", |b| {
        let (d, _keys) = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(d.get(&k));
        })
    });
}

fn bench_clean_with_destructor(c: &mut Criterion) {
    c.bench_function("dictionary_clean_10k_destructor", |b| {
        let keys: Vec<_> = lcg(3).take(10_000).map(key).collect();
        b.iter_batched(
            || {
                let mut d = Dictionary::with_destructor(|v: u64| {
                    black_box(v);
                });
                for (i, k) in keys.iter().enumerate() {
                    d.put(k, i as u64);
                }
                d
            },
            |mut d| {
                d.clean();
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_hash, bench_put, bench_get_hit, bench_get_miss, bench_clean_with_destructor
}
criterion_main!(benches);
