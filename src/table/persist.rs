/*!
On-disk binary format for an [super::LpmTable]: a 4-byte magic header
followed by a pre-order traversal of the trie. Each slot is written as a
one-byte tag, then the leaf fields (if any), then -- recursively -- the
child table (if any). Level sizes are fixed constants, so no table needs
a length prefix; only the tag byte tells the reader what follows.

This format exists on its own terms rather than piggybacking on a
general-purpose array serializer: the tree is irregular (slots carry a
leaf value, a child table, both, or neither) in a way a flat numeric
array format has no natural way to express, and a bespoke reader/writer
pair keeps the two pieces in the same module where both sides of the
format stay visibly in sync.
*/
use super::{LpmTable, Slot, LEVEL_SIZES};
use std::io::{self, Read, Write};

const MAGIC: &[u8; 4] = b"LPM1";

const TAG_EMPTY: u8 = 0;
const TAG_LEAF: u8 = 1;
const TAG_INTERNAL: u8 = 2;
const TAG_BRANCH: u8 = 3;

pub fn save<W: Write>(table: &LpmTable, writer: &mut W) -> io::Result<()> {
    writer.write_all(MAGIC)?;
    write_level(writer, &table.root)
}

pub fn load<R: Read>(reader: &mut R) -> io::Result<LpmTable> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "not a recognized LPM table file",
        ));
    }
    let root = read_level(reader, 0)?;
    Ok(LpmTable { root })
}

fn write_level<W: Write>(writer: &mut W, table: &[Slot]) -> io::Result<()> {
    for slot in table {
        write_slot(writer, slot)?;
    }
    Ok(())
}

fn write_slot<W: Write>(writer: &mut W, slot: &Slot) -> io::Result<()> {
    match slot {
        Slot::Empty => writer.write_all(&[TAG_EMPTY]),
        Slot::Leaf {
            origin_as,
            prefix_len,
        } => {
            writer.write_all(&[TAG_LEAF])?;
            writer.write_all(&origin_as.to_be_bytes())?;
            writer.write_all(&[*prefix_len])
        }
        Slot::Internal(children) => {
            writer.write_all(&[TAG_INTERNAL])?;
            write_level(writer, children)
        }
        Slot::Branch {
            origin_as,
            prefix_len,
            children,
        } => {
            writer.write_all(&[TAG_BRANCH])?;
            writer.write_all(&origin_as.to_be_bytes())?;
            writer.write_all(&[*prefix_len])?;
            write_level(writer, children)
        }
    }
}

fn read_level<R: Read>(reader: &mut R, level: usize) -> io::Result<Vec<Slot>> {
    let size = LEVEL_SIZES[level];
    let mut table = Vec::with_capacity(size);
    for _ in 0..size {
        table.push(read_slot(reader, level)?);
    }
    Ok(table)
}

fn read_slot<R: Read>(reader: &mut R, level: usize) -> io::Result<Slot> {
    let mut tag = [0u8; 1];
    reader.read_exact(&mut tag)?;
    match tag[0] {
        TAG_EMPTY => Ok(Slot::Empty),
        TAG_LEAF => {
            let (origin_as, prefix_len) = read_leaf_fields(reader)?;
            Ok(Slot::Leaf {
                origin_as,
                prefix_len,
            })
        }
        TAG_INTERNAL => {
            let children = read_level(reader, level + 1)?;
            Ok(Slot::Internal(Box::new(children)))
        }
        TAG_BRANCH => {
            let (origin_as, prefix_len) = read_leaf_fields(reader)?;
            let children = read_level(reader, level + 1)?;
            Ok(Slot::Branch {
                origin_as,
                prefix_len,
                children: Box::new(children),
            })
        }
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unrecognized slot tag {}", other),
        )),
    }
}

fn read_leaf_fields<R: Read>(reader: &mut R) -> io::Result<(u32, u8)> {
    let mut asn_buf = [0u8; 4];
    reader.read_exact(&mut asn_buf)?;
    let mut len_buf = [0u8; 1];
    reader.read_exact(&mut len_buf)?;
    Ok((u32::from_be_bytes(asn_buf), len_buf[0]))
}

#[cfg(test)]
mod tests {
    use super::super::Prefix;
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_save_load_roundtrip() {
        let mut table = LpmTable::new();
        table
            .insert(
                Prefix {
                    addr: Ipv4Addr::new(202, 209, 199, 0),
                    prefix_len: 24,
                },
                230,
            )
            .unwrap();
        table
            .insert(
                Prefix {
                    addr: Ipv4Addr::new(202, 209, 199, 8),
                    prefix_len: 29,
                },
                232,
            )
            .unwrap();

        let mut buf = Vec::new();
        table.save(&mut buf).unwrap();

        let loaded = LpmTable::load(&mut buf.as_slice()).unwrap();
        assert_eq!(
            loaded.lookup(Ipv4Addr::new(202, 209, 199, 1)),
            table.lookup(Ipv4Addr::new(202, 209, 199, 1))
        );
        assert_eq!(
            loaded.lookup(Ipv4Addr::new(202, 209, 199, 9)),
            table.lookup(Ipv4Addr::new(202, 209, 199, 9))
        );
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = LpmTable::load(&mut [0u8; 4].as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
