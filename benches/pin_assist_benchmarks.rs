//! Pin Assist Benchmarks
//!
//! Benchmarks for the loose dictionary lookups and mutations, implemented
//! with the Criterion framework.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use pin_assist_lib::data_structures::loose_dictionary::LooseDictionary;
use std::time::Duration;

const OBJECT_KINDS: [&str; 8] = [
    "minerock", "pickable", "leviathan", "tree", "stub", "chest", "spawner", "vein",
];
const MATERIALS: [&str; 8] = [
    "copper", "tin", "iron", "silver", "obsidian", "flametal", "blackmetal", "stone",
];

fn tracked_keys(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{}_{}{}",
                OBJECT_KINDS[i % OBJECT_KINDS.len()],
                MATERIALS[(i / OBJECT_KINDS.len()) % MATERIALS.len()],
                i / (OBJECT_KINDS.len() * MATERIALS.len())
            )
        })
        .collect()
}

fn dictionary_with(count: usize) -> LooseDictionary<usize> {
    let mut dictionary = LooseDictionary::new();
    for (i, key) in tracked_keys(count).iter().enumerate() {
        let _ = dictionary.add(key, i, None, i % 5 == 0);
    }
    dictionary
}

/// Benchmark the lookup strategies against decorated object names.
fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("loose_dictionary_lookup");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    for size in [64, 512, 4096].iter() {
        let dictionary = dictionary_with(*size);
        let queries: Vec<String> = tracked_keys(*size)
            .iter()
            .step_by(7)
            .map(|key| format!("Spawned_{key}(Clone)"))
            .collect();
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_with_input(BenchmarkId::new("exact", size), &queries, |b, queries| {
            b.iter(|| {
                for query in queries {
                    black_box(dictionary.lookup_exact(black_box(query)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("loose", size), &queries, |b, queries| {
            b.iter(|| {
                for query in queries {
                    black_box(dictionary.lookup_loose(black_box(query), false));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("loose_lite", size), &queries, |b, queries| {
            b.iter(|| {
                for query in queries {
                    black_box(dictionary.lookup_loose_lite(black_box(query)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("fuzzy", size), &queries, |b, queries| {
            b.iter(|| {
                for query in queries {
                    black_box(dictionary.lookup_fuzzy(black_box(query), false));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark registration and removal, which also run the conflict check and pruning.
fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("loose_dictionary_mutation");
    group.measurement_time(Duration::from_secs(2));

    for size in [64, 512, 4096].iter() {
        let keys = tracked_keys(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("add", size), &keys, |b, keys| {
            b.iter(|| {
                let mut dictionary = LooseDictionary::new();
                for (i, key) in keys.iter().enumerate() {
                    let _ = dictionary.add(black_box(key), i, None, false);
                }
                dictionary
            });
        });

        group.bench_with_input(BenchmarkId::new("remove", size), &keys, |b, keys| {
            b.iter_batched(
                || dictionary_with(keys.len()),
                |mut dictionary| {
                    for key in keys {
                        let _ = dictionary.remove(black_box(key));
                    }
                    dictionary
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookups, bench_mutations);
criterion_main!(benches);
