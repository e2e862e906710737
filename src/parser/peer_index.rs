use crate::error::ParserError;
use crate::models::peer::{Peer, PeerIndexTable, PeerType};
use crate::parser::utils::TryBuf;
use bytes::{Buf, Bytes};
use std::net::IpAddr;

/// Decodes a PEER_INDEX_TABLE record body (RFC 6396 §4.3.1).
///
/// A peer entry that runs out of buffer ends the peer list early rather
/// than failing the whole record: the collector BGP ID and view name are
/// already captured, and a partial peer list just means RIB entries that
/// reference the missing tail end up dropped downstream with
/// [ParserError::PeerIndexMissing] instead of resolving to a peer. A
/// short read in the fixed-size header fields (before any peers are
/// reached) is not recoverable and fails the whole record.
///
/// A structurally invalid peer entry -- an unknown peer-type byte -- is a
/// different kind of failure from running out of buffer: it means this
/// record doesn't match the wire format at all, not merely that it was
/// cut short. That propagates as [ParserError::MalformedPeerEntry] and
/// drops the whole record, per §4.2/§7.
pub fn parse_peer_index_table(mut buf: Bytes) -> Result<PeerIndexTable, ParserError> {
    let collector_bgp_id = buf
        .try_ipv4()
        .map_err(|e| ParserError::MalformedPeerEntry(e.to_string()))?;

    let view_name_len = buf
        .try_u16()
        .map_err(|e| ParserError::MalformedPeerEntry(e.to_string()))? as usize;
    let view_name_bytes = buf
        .try_copy_to_bytes(view_name_len)
        .map_err(|e| ParserError::MalformedPeerEntry(e.to_string()))?;
    let view_name = String::from_utf8_lossy(&view_name_bytes).into_owned();

    let peer_count = buf
        .try_u16()
        .map_err(|e| ParserError::MalformedPeerEntry(e.to_string()))?;

    let mut peers = Vec::with_capacity(peer_count as usize);
    for _ in 0..peer_count {
        match parse_peer_entry(&mut buf) {
            Ok(peer) => peers.push(peer),
            // A bad peer-type byte is a structural error, not a benign
            // truncation -- it drops the whole record rather than ending
            // the peer list early.
            Err(e @ ParserError::MalformedPeerEntry(_)) => return Err(e),
            Err(e) => {
                log::warn!(
                    "peer index table truncated after {} of {} peers: {}",
                    peers.len(),
                    peer_count,
                    e
                );
                break;
            }
        }
    }

    Ok(PeerIndexTable {
        collector_bgp_id,
        view_name,
        peers,
    })
}

fn parse_peer_entry(buf: &mut Bytes) -> Result<Peer, ParserError> {
    let peer_type_byte = buf.try_u8()?;
    let peer_type = PeerType::from_bits(peer_type_byte).ok_or_else(|| {
        ParserError::MalformedPeerEntry(format!("unknown peer type byte {peer_type_byte}"))
    })?;
    let peer_bgp_id = buf.try_ipv4()?;

    let peer_address = if peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6) {
        let octets: [u8; 16] = buf
            .try_copy_to_bytes(16)?
            .as_ref()
            .try_into()
            .expect("exactly 16 bytes");
        IpAddr::from(octets)
    } else {
        IpAddr::from(buf.try_ipv4()?)
    };

    let peer_asn = if peer_type.contains(PeerType::AS_SIZE_32BIT) {
        buf.try_u32()?
    } else {
        buf.try_u16()? as u32
    };

    Ok(Peer {
        peer_type,
        peer_bgp_id,
        peer_address,
        peer_asn,
    })
}
