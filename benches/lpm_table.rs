use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mrtlpm::{LpmTable, Prefix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::Ipv4Addr;

fn random_prefixes(count: usize, seed: u64) -> Vec<(Prefix, u32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let bits: u32 = rng.gen();
            let prefix_len: u8 = rng.gen_range(8..=32);
            let mask = if prefix_len == 0 {
                0
            } else {
                u32::MAX << (32 - prefix_len)
            };
            (
                Prefix {
                    addr: Ipv4Addr::from(bits & mask),
                    prefix_len,
                },
                i as u32,
            )
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let prefixes = random_prefixes(100_000, 1);
    c.bench_function("insert_100k_random_prefixes", |b| {
        b.iter(|| {
            let mut table = LpmTable::new();
            for (prefix, origin_as) in &prefixes {
                table.insert(*prefix, *origin_as).unwrap();
            }
            black_box(&table);
        });
    });
}

fn bench_lookup(c: &mut Criterion) {
    let prefixes = random_prefixes(100_000, 2);
    let mut table = LpmTable::new();
    for (prefix, origin_as) in &prefixes {
        table.insert(*prefix, *origin_as).unwrap();
    }
    let mut rng = StdRng::seed_from_u64(3);
    let addrs: Vec<Ipv4Addr> = (0..10_000).map(|_| Ipv4Addr::from(rng.gen::<u32>())).collect();

    c.bench_function("lookup_10k_random_addresses", |b| {
        b.iter(|| {
            for addr in &addrs {
                black_box(table.lookup(*addr));
            }
        });
    });
}

fn bench_save_load(c: &mut Criterion) {
    let prefixes = random_prefixes(20_000, 4);
    let mut table = LpmTable::new();
    for (prefix, origin_as) in &prefixes {
        table.insert(*prefix, *origin_as).unwrap();
    }

    c.bench_function("save_20k_entry_table", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            table.save(&mut buf).unwrap();
            black_box(buf.len());
        });
    });

    let mut buf = Vec::new();
    table.save(&mut buf).unwrap();
    c.bench_function("load_20k_entry_table", |b| {
        b.iter(|| {
            let loaded = LpmTable::load(&mut buf.as_slice()).unwrap();
            black_box(loaded);
        });
    });
}

criterion_group!(benches, bench_insert, bench_lookup, bench_save_load);
criterion_main!(benches);
