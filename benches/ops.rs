use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indexed_heap::{Entry, Slot};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::collections::BinaryHeap;

fn random_priorities(size: usize) -> Vec<u64> {
    let mut rng = XorShiftRng::seed_from_u64(size as u64);
    (0..size).map(|_| rng.gen_range(0, 1_000_000)).collect()
}

/// Benchmark filling a heap and draining it again
fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let priorities = random_priorities(*size);

        group.bench_with_input(BenchmarkId::new("IndexedHeap", size), size, |b, &size| {
            let mut heap = Vec::with_capacity(size);
            let mut index = vec![Slot::Absent; size];

            b.iter(|| {
                for (key, &priority) in priorities.iter().enumerate() {
                    heap.push(Entry::new(priority, key));
                    indexed_heap::push(&mut heap, &mut index);
                }
                while !heap.is_empty() {
                    indexed_heap::pop(&mut heap, &mut index);
                    black_box(heap.pop());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BinaryHeap", size), size, |b, &size| {
            let mut heap = BinaryHeap::with_capacity(size);

            b.iter(|| {
                for (key, &priority) in priorities.iter().enumerate() {
                    heap.push((priority, key));
                }
                while let Some(top) = heap.pop() {
                    black_box(top);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark changing the priority of random keys in a full heap
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for size in [1_000, 100_000].iter() {
        let priorities = random_priorities(*size);
        let mut heap: Vec<_> = priorities
            .iter()
            .enumerate()
            .map(|(key, &priority)| Entry::new(priority, key))
            .collect();
        let mut index = vec![Slot::Absent; *size];
        indexed_heap::make(&mut heap, &mut index);

        let mut rng = XorShiftRng::seed_from_u64(42);
        group.bench_function(BenchmarkId::new("IndexedHeap", size), |b| {
            b.iter(|| {
                let key = rng.gen_range(0, heap.len());
                let priority = rng.gen_range(0, 1_000_000);
                black_box(indexed_heap::update(&mut heap, &mut index, &key, priority));
            });
        });
    }

    group.finish();
}

/// Benchmark removing and re-inserting a random key
fn bench_pop_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_key");

    for size in [1_000, 100_000].iter() {
        let priorities = random_priorities(*size);
        let mut heap: Vec<_> = priorities
            .iter()
            .enumerate()
            .map(|(key, &priority)| Entry::new(priority, key))
            .collect();
        let mut index = vec![Slot::Absent; *size];
        indexed_heap::make(&mut heap, &mut index);

        let mut rng = XorShiftRng::seed_from_u64(7);
        group.bench_function(BenchmarkId::new("IndexedHeap", size), |b| {
            b.iter(|| {
                let key = rng.gen_range(0, heap.len());
                indexed_heap::pop_key(&mut heap, &mut index, &key);
                indexed_heap::push(&mut heap, &mut index); // Put it back for next iteration
            });
        });
    }

    group.finish();
}

/// Benchmark heapify followed by a full in-place sort
fn bench_make_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_sort");

    for size in [1_000, 100_000].iter() {
        let priorities = random_priorities(*size);
        let entries: Vec<_> = priorities
            .iter()
            .enumerate()
            .map(|(key, &priority)| Entry::new(priority, key))
            .collect();

        group.bench_with_input(BenchmarkId::new("IndexedHeap", size), size, |b, &size| {
            let mut index = vec![Slot::Absent; size];
            b.iter(|| {
                let mut heap = entries.clone();
                indexed_heap::make(&mut heap, &mut index);
                indexed_heap::sort(&mut heap, &mut index);
                black_box(heap);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_update, bench_pop_key, bench_make_sort);
criterion_main!(benches);
