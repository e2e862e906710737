/*!
Wires the framer, the peer-index decode context, and the LPM table
together into a single pass over an MRT dump.

The peer index is modeled as a plain local variable threaded through the
loop rather than a field the framer owns, so that "no PEER_INDEX_TABLE
seen yet" is just `None` instead of a framer invariant to maintain.
*/
use crate::error::ParserError;
use crate::models::bgp::origin_asn;
use crate::models::peer::PeerIndexTable;
use crate::models::rib::{MrtMessage, RibIpv4Unicast};
use crate::parser::{decode_payload, MrtReader};
use crate::table::{LpmTable, Prefix};
use std::io::Read;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub records_seen: u64,
    pub rib_entries_seen: u64,
    pub prefixes_inserted: u64,
    pub records_skipped: u64,
}

/// Reads every record from `source`, builds an [LpmTable] keyed by
/// origin AS number, and returns it alongside a summary of what was
/// skipped along the way.
///
/// Only frame-level failures -- a truncated payload, or an unrecognized
/// type on the very first record -- abort the whole ingest. Everything
/// else (an unsupported record type, a RIB entry referencing a peer
/// index this file never defined, a record with no usable AS_PATH) is
/// logged and skipped.
pub fn ingest(source: impl Read) -> Result<(LpmTable, IngestStats), ParserError> {
    let mut reader = MrtReader::new(source);
    let mut table = LpmTable::new();
    let mut peer_index: Option<PeerIndexTable> = None;
    let mut stats = IngestStats::default();

    while let Some((header, payload)) = reader.next_record()? {
        stats.records_seen += 1;
        match decode_payload(&header, payload) {
            Ok(MrtMessage::PeerIndexTable(parsed)) => {
                peer_index = Some(parsed);
            }
            Ok(MrtMessage::RibIpv4Unicast(rib)) => {
                stats.rib_entries_seen += rib.entries.len() as u64;
                match insert_rib_record(&mut table, peer_index.as_ref(), rib) {
                    Ok(()) => stats.prefixes_inserted += 1,
                    Err(e) => {
                        log::warn!("dropping RIB record: {}", e);
                        stats.records_skipped += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("skipping record: {}", e);
                stats.records_skipped += 1;
            }
        }
    }

    log::info!(
        "ingest complete: {} records seen, {} prefixes inserted, {} records skipped",
        stats.records_seen,
        stats.prefixes_inserted,
        stats.records_skipped
    );

    Ok((table, stats))
}

fn insert_rib_record(
    table: &mut LpmTable,
    peer_index: Option<&PeerIndexTable>,
    rib: RibIpv4Unicast,
) -> Result<(), ParserError> {
    let first_entry = rib.entries.first().ok_or_else(|| {
        ParserError::MalformedRibEntry(format!(
            "RIB record for {}/{} has no entries",
            rib.prefix.addr, rib.prefix.prefix_len
        ))
    })?;

    let found = peer_index.and_then(|t| t.get(first_entry.peer_index));
    if found.is_none() {
        return Err(ParserError::PeerIndexMissing {
            peer_index: first_entry.peer_index,
        });
    }

    let origin_as = origin_asn(&first_entry.attributes).ok_or_else(|| {
        ParserError::MalformedRibEntry(format!(
            "RIB record for {}/{} has no AS_PATH origin AS",
            rib.prefix.addr, rib.prefix.prefix_len
        ))
    })?;

    let prefix = Prefix {
        addr: rib.prefix.addr,
        prefix_len: rib.prefix.prefix_len,
    };
    table
        .insert(prefix, origin_as)
        .map_err(|e| ParserError::MalformedRibEntry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::peer::{Peer, PeerType};
    use std::net::{IpAddr, Ipv4Addr};

    fn mrt_header_bytes(entry_type: u16, entry_subtype: u16, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&entry_type.to_be_bytes());
        buf.extend_from_slice(&entry_subtype.to_be_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    fn peer_index_payload() -> Vec<u8> {
        let mut buf = vec![192, 0, 2, 1]; // collector BGP id
        buf.extend_from_slice(&0u16.to_be_bytes()); // empty view name
        buf.extend_from_slice(&1u16.to_be_bytes()); // 1 peer
        buf.push(PeerType::AS_SIZE_32BIT.bits());
        buf.extend_from_slice(&[192, 0, 2, 2]);
        buf.extend_from_slice(&[198, 51, 100, 1]);
        buf.extend_from_slice(&64500u32.to_be_bytes());
        buf
    }

    fn rib_payload(prefix: [u8; 3], prefix_len: u8, peer_index: u16, asns: &[u32]) -> Vec<u8> {
        let mut attrs = vec![0x40, 1, 1, 0]; // ORIGIN = IGP
        let mut as_path_value = vec![2u8, asns.len() as u8];
        for asn in asns {
            as_path_value.extend_from_slice(&asn.to_be_bytes());
        }
        attrs.push(0x40);
        attrs.push(2);
        attrs.push(as_path_value.len() as u8);
        attrs.extend(as_path_value);

        let mut entry = Vec::new();
        entry.extend_from_slice(&peer_index.to_be_bytes());
        entry.extend_from_slice(&0u32.to_be_bytes());
        entry.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        entry.extend(attrs);

        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_be_bytes()); // sequence number
        buf.push(prefix_len);
        buf.extend_from_slice(&prefix);
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend(entry);
        buf
    }

    #[test]
    fn test_ingest_builds_table_from_peer_index_then_rib() {
        let mut data = mrt_header_bytes(13, 1, &peer_index_payload());
        data.extend(mrt_header_bytes(
            13,
            2,
            &rib_payload([202, 209, 199], 24, 0, &[64500, 15169]),
        ));

        let (table, stats) = ingest(data.as_slice()).unwrap();
        assert_eq!(stats.records_seen, 2);
        assert_eq!(stats.prefixes_inserted, 1);
        assert_eq!(stats.records_skipped, 0);
        assert_eq!(
            table.lookup(Ipv4Addr::new(202, 209, 199, 1)),
            Some(15169)
        );
    }

    #[test]
    fn test_rib_before_peer_index_is_skipped_not_fatal() {
        let data = mrt_header_bytes(13, 2, &rib_payload([203, 0, 113], 24, 0, &[4826]));
        let (table, stats) = ingest(data.as_slice()).unwrap();
        assert_eq!(stats.records_skipped, 1);
        assert_eq!(table.lookup(Ipv4Addr::new(203, 0, 113, 1)), None);
    }

    #[test]
    fn test_invalid_first_record_type_is_fatal() {
        let data = mrt_header_bytes(99, 0, &[]);
        let err = ingest(data.as_slice()).unwrap_err();
        assert!(matches!(err, ParserError::InvalidMrtFile { entry_type: 99 }));
    }

    #[test]
    fn test_peer_lookup_resolves_expected_peer() {
        let payload = peer_index_payload();
        let table = crate::parser::decode_payload(
            &crate::models::mrt::CommonHeader {
                timestamp: 0,
                entry_type: 13,
                entry_subtype: 1,
                length: payload.len() as u32,
            },
            bytes::Bytes::from(payload),
        )
        .unwrap();
        match table {
            MrtMessage::PeerIndexTable(t) => {
                let peer: &Peer = t.get(0).unwrap();
                assert_eq!(peer.peer_address, IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)));
                assert_eq!(peer.peer_asn, 64500);
            }
            other => panic!("expected PeerIndexTable, got {:?}", other),
        }
    }
}
