/*!
A fixed-depth, four-level multibit trie for IPv4 longest-prefix-match
lookups, keyed by origin AS number.

The depth split -- 16/8/4/4 bits -- and the "span write" technique for
prefixes shorter than a level's full stride are both taken from a linear,
numpy-array-of-structs routing table. Here each level is a plain `Vec`
of a tagged [Slot] rather than a flat struct array with separate
`final`/`prefix_len`/`output_idx`/`children` fields, since a slot is
never in more than one of those shapes at once except where a shorter
prefix's value and a longer prefix's subtree genuinely coexist -- which
the `Branch` variant represents directly instead of through redundant
fields.
*/
mod persist;

use crate::error::TableError;
use std::io::{self, Read, Write};
use std::net::Ipv4Addr;

const LEVEL_SIZES: [usize; 4] = [1 << 16, 1 << 8, 1 << 4, 1 << 4];
const LEVEL_PREFIX_EDGE: [u8; 4] = [16, 24, 28, 32];

#[derive(Debug, Clone)]
enum Slot {
    Empty,
    Leaf {
        origin_as: u32,
        prefix_len: u8,
    },
    Internal(Box<Vec<Slot>>),
    Branch {
        origin_as: u32,
        prefix_len: u8,
        children: Box<Vec<Slot>>,
    },
}

/// An IPv4 prefix: `addr`'s trailing `32 - prefix_len` bits must be zero.
/// Callers are responsible for zero-padding (this is how RIB_IPV4_UNICAST
/// prefixes already arrive off the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
}

/// A longest-prefix-match table mapping IPv4 prefixes to origin AS
/// numbers.
///
/// Insertion order does not affect the final table: a shorter prefix
/// never overwrites a slot already carrying a value from a longer,
/// more specific prefix, regardless of which was inserted first.
/// Deletion only removes the leaf value at the deleted prefix's own
/// slot(s) -- it does not restore whatever shorter prefix used to cover
/// that space before the deleted one was inserted, and it does not
/// reclaim now-unused child tables.
#[derive(Debug, Clone)]
pub struct LpmTable {
    root: Vec<Slot>,
}

impl Default for LpmTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LpmTable {
    pub fn new() -> Self {
        LpmTable {
            root: vec![Slot::Empty; LEVEL_SIZES[0]],
        }
    }

    /// Rebuilds a fresh table from scratch out of `entries`. Building a
    /// new table and replacing the old one wholesale, rather than trying
    /// to patch deletions back in, is the supported way to un-shadow a
    /// prefix that a since-deleted more-specific prefix was covering.
    pub fn rebuild_from<I>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (Prefix, u32)>,
    {
        let mut table = Self::new();
        for (prefix, origin_as) in entries {
            table.insert(prefix, origin_as)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, prefix: Prefix, origin_as: u32) -> Result<(), TableError> {
        validate(prefix)?;
        let octets = prefix.addr.octets();
        let mut table = &mut self.root;
        let mut level = 0usize;

        loop {
            let idx_base = level_index(&octets, level);
            let edge = LEVEL_PREFIX_EDGE[level];

            if prefix.prefix_len <= edge {
                let span = 1usize << (edge - prefix.prefix_len);
                for slot in &mut table[idx_base..idx_base + span] {
                    apply_leaf(slot, origin_as, prefix.prefix_len);
                }
                return Ok(());
            }

            table = ensure_children(&mut table[idx_base], level);
            level += 1;
        }
    }

    pub fn delete(&mut self, prefix: Prefix) -> Result<(), TableError> {
        validate(prefix)?;
        let octets = prefix.addr.octets();
        let mut table = &mut self.root;
        let mut level = 0usize;

        loop {
            let idx_base = level_index(&octets, level);
            let edge = LEVEL_PREFIX_EDGE[level];

            if prefix.prefix_len <= edge {
                let span = 1usize << (edge - prefix.prefix_len);
                for slot in &mut table[idx_base..idx_base + span] {
                    clear_leaf(slot);
                }
                return Ok(());
            }

            table = match &mut table[idx_base] {
                Slot::Internal(children) => children,
                Slot::Branch { children, .. } => children,
                _ => return Ok(()),
            };
            level += 1;
        }
    }

    pub fn lookup(&self, addr: Ipv4Addr) -> Option<u32> {
        let octets = addr.octets();
        let mut table = &self.root;
        let mut matched = None;

        for level in 0..LEVEL_SIZES.len() {
            let idx = level_index(&octets, level);
            match &table[idx] {
                Slot::Empty => break,
                Slot::Leaf { origin_as, .. } => {
                    matched = Some(*origin_as);
                    break;
                }
                Slot::Internal(children) => table = children,
                Slot::Branch {
                    origin_as,
                    children,
                    ..
                } => {
                    matched = Some(*origin_as);
                    table = children;
                }
            }
        }

        matched
    }

    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        persist::save(self, writer)
    }

    pub fn load<R: Read>(reader: &mut R) -> io::Result<Self> {
        persist::load(reader)
    }
}

fn validate(prefix: Prefix) -> Result<(), TableError> {
    if prefix.prefix_len > 32 {
        return Err(TableError::BadPrefix {
            prefix_len: prefix.prefix_len,
        });
    }
    Ok(())
}

fn level_index(octets: &[u8; 4], level: usize) -> usize {
    match level {
        0 => ((octets[0] as usize) << 8) | octets[1] as usize,
        1 => octets[2] as usize,
        2 => (octets[3] as usize) >> 4,
        3 => (octets[3] as usize) & 0x0F,
        _ => unreachable!("the trie has exactly 4 levels"),
    }
}

fn ensure_children(slot: &mut Slot, level: usize) -> &mut Vec<Slot> {
    if !matches!(slot, Slot::Internal(_) | Slot::Branch { .. }) {
        let children = vec![Slot::Empty; LEVEL_SIZES[level + 1]];
        let old = std::mem::replace(slot, Slot::Empty);
        *slot = match old {
            Slot::Empty => Slot::Internal(Box::new(children)),
            Slot::Leaf {
                origin_as,
                prefix_len,
            } => Slot::Branch {
                origin_as,
                prefix_len,
                children: Box::new(children),
            },
            _ => unreachable!("already excluded by the matches! check above"),
        };
    }
    match slot {
        Slot::Internal(children) => children,
        Slot::Branch { children, .. } => children,
        _ => unreachable!("just ensured"),
    }
}

fn apply_leaf(slot: &mut Slot, origin_as: u32, new_len: u8) {
    let old = std::mem::replace(slot, Slot::Empty);
    *slot = match old {
        Slot::Empty => Slot::Leaf {
            origin_as,
            prefix_len: new_len,
        },
        Slot::Leaf {
            origin_as: old_as,
            prefix_len: old_len,
        } => {
            if new_len >= old_len {
                Slot::Leaf {
                    origin_as,
                    prefix_len: new_len,
                }
            } else {
                Slot::Leaf {
                    origin_as: old_as,
                    prefix_len: old_len,
                }
            }
        }
        Slot::Internal(children) => Slot::Branch {
            origin_as,
            prefix_len: new_len,
            children,
        },
        Slot::Branch {
            origin_as: old_as,
            prefix_len: old_len,
            children,
        } => {
            if new_len >= old_len {
                Slot::Branch {
                    origin_as,
                    prefix_len: new_len,
                    children,
                }
            } else {
                Slot::Branch {
                    origin_as: old_as,
                    prefix_len: old_len,
                    children,
                }
            }
        }
    };
}

fn clear_leaf(slot: &mut Slot) {
    let old = std::mem::replace(slot, Slot::Empty);
    *slot = match old {
        Slot::Leaf { .. } => Slot::Empty,
        Slot::Branch { children, .. } => Slot::Internal(children),
        other => other,
    };
}
