//! Cross-checks [mrtlpm::LpmTable] against a trivially-correct linear
//! LPM table under random prefix sets and random insertion orders.
//!
//! A real LPM table's final state never depends on the order prefixes
//! were inserted in -- only on the (prefix, origin AS) set itself, since
//! a more specific prefix always wins regardless of which arrived first.
//! A hash map keyed by `(masked address, prefix length)`, scanned from
//! length 32 down to 0 at lookup time, gets that property for free and
//! makes a good independent reference.

use mrtlpm::{LpmTable, Prefix};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::net::Ipv4Addr;

struct NaiveTable {
    entries: HashMap<(u32, u8), u32>,
}

impl NaiveTable {
    fn new() -> Self {
        NaiveTable {
            entries: HashMap::new(),
        }
    }

    fn insert(&mut self, prefix: Prefix, origin_as: u32) {
        let masked = mask(u32::from(prefix.addr), prefix.prefix_len);
        self.entries.insert((masked, prefix.prefix_len), origin_as);
    }

    fn lookup(&self, addr: Ipv4Addr) -> Option<u32> {
        let bits = u32::from(addr);
        for len in (0..=32u8).rev() {
            if let Some(origin_as) = self.entries.get(&(mask(bits, len), len)) {
                return Some(*origin_as);
            }
        }
        None
    }
}

fn mask(bits: u32, prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        bits & (u32::MAX << (32 - prefix_len))
    }
}

fn random_prefix(rng: &mut impl Rng) -> Prefix {
    let bits: u32 = rng.gen();
    let prefix_len: u8 = rng.gen_range(0..=32);
    Prefix {
        addr: Ipv4Addr::from(mask(bits, prefix_len)),
        prefix_len,
    }
}

#[test]
fn test_random_prefixes_match_naive_table_regardless_of_insertion_order() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for trial in 0..20 {
        let count = 50;
        let mut prefixes: Vec<(Prefix, u32)> = (0..count)
            .map(|i| (random_prefix(&mut rng), 10_000 + trial * 1000 + i))
            .collect();

        let mut naive = NaiveTable::new();
        for (prefix, origin_as) in &prefixes {
            naive.insert(*prefix, *origin_as);
        }

        prefixes.shuffle(&mut rng);
        let mut table = LpmTable::new();
        for (prefix, origin_as) in &prefixes {
            table.insert(*prefix, *origin_as).unwrap();
        }

        for _ in 0..200 {
            let addr = Ipv4Addr::from(rng.gen::<u32>());
            assert_eq!(
                table.lookup(addr),
                naive.lookup(addr),
                "mismatch at trial {trial} for {addr}"
            );
        }
    }
}

/// Uses same-length prefixes only: equal-length networks never contain
/// one another, so deleting one can never expose the "delete doesn't
/// restore a shadowed shorter prefix" quirk, and a plain naive
/// recomputation over the surviving set stays a valid oracle.
#[test]
fn test_random_deletes_match_naive_table_minus_deleted_exact_prefixes() {
    let mut rng = StdRng::seed_from_u64(0xBADA55);

    let mut prefixes: Vec<(Prefix, u32)> = (0..40)
        .map(|i| {
            let octet1: u8 = rng.gen();
            let octet2: u8 = rng.gen();
            let octet3: u8 = rng.gen();
            (
                Prefix {
                    addr: Ipv4Addr::new(octet1, octet2, octet3, 0),
                    prefix_len: 24,
                },
                20_000 + i,
            )
        })
        .collect();
    prefixes.dedup_by_key(|(p, _)| (u32::from(p.addr), p.prefix_len));

    let mut table = LpmTable::new();
    let mut naive = NaiveTable::new();
    for (prefix, origin_as) in &prefixes {
        table.insert(*prefix, *origin_as).unwrap();
        naive.insert(*prefix, *origin_as);
    }

    let mut deleted = std::collections::HashSet::new();
    let mut to_delete = prefixes.clone();
    to_delete.shuffle(&mut rng);
    for (prefix, _) in to_delete.iter().take(prefixes.len() / 2) {
        table.delete(*prefix).unwrap();
        naive.entries.remove(&(u32::from(prefix.addr), prefix.prefix_len));
        deleted.insert((u32::from(prefix.addr), prefix.prefix_len));
    }

    for _ in 0..200 {
        let addr = Ipv4Addr::from(rng.gen::<u32>());
        assert_eq!(table.lookup(addr), naive.lookup(addr), "mismatch for {addr}");
    }
}
