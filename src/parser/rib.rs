use crate::error::ParserError;
use crate::models::rib::{Ipv4Prefix, RibEntry, RibIpv4Unicast};
use crate::parser::attributes::parse_attributes;
use crate::parser::utils::TryBuf;
use bytes::{Buf, Bytes};
use std::net::Ipv4Addr;

/// Decodes a RIB_IPV4_UNICAST record body (RFC 6396 §4.3.2).
///
/// Mirrors [crate::parser::peer_index::parse_peer_index_table]'s
/// lenient-loop-break behavior: a sub-entry whose fixed fields can't be
/// read ends the entry list early rather than discarding the whole
/// record, since the prefix and sequence number -- the part callers
/// actually key the LPM table on -- are already known good at that
/// point.
pub fn parse_rib_ipv4_unicast(mut buf: Bytes) -> Result<RibIpv4Unicast, ParserError> {
    let sequence_number = buf
        .try_u32()
        .map_err(|e| ParserError::MalformedRibEntry(e.to_string()))?;
    let prefix = parse_ipv4_prefix(&mut buf)
        .map_err(|e| ParserError::MalformedRibEntry(e.to_string()))?;

    let entry_count = buf
        .try_u16()
        .map_err(|e| ParserError::MalformedRibEntry(e.to_string()))?;

    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        match parse_rib_entry(&mut buf) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                log::warn!(
                    "RIB record for {}/{} truncated after {} of {} entries: {}",
                    prefix.addr,
                    prefix.prefix_len,
                    entries.len(),
                    entry_count,
                    e
                );
                break;
            }
        }
    }

    Ok(RibIpv4Unicast {
        sequence_number,
        prefix,
        entries,
    })
}

fn parse_ipv4_prefix(buf: &mut Bytes) -> Result<Ipv4Prefix, ParserError> {
    let prefix_len = buf.try_u8()?;
    if prefix_len > 32 {
        return Err(ParserError::ParseError(format!(
            "IPv4 prefix length {} exceeds 32",
            prefix_len
        )));
    }
    let prefix_bytes = (prefix_len as usize).div_ceil(8);
    let raw = buf.try_copy_to_bytes(prefix_bytes)?;

    let mut octets = [0u8; 4];
    octets[..prefix_bytes].copy_from_slice(&raw);

    Ok(Ipv4Prefix {
        addr: Ipv4Addr::from(octets),
        prefix_len,
    })
}

fn parse_rib_entry(buf: &mut Bytes) -> Result<RibEntry, ParserError> {
    let peer_index = buf.try_u16()?;
    let originated_time = buf.try_u32()?;
    let attr_len = buf.try_u16()? as usize;
    let attr_bytes = buf.try_copy_to_bytes(attr_len)?;

    let (attributes, reason) = parse_attributes(attr_bytes);
    if let Some(reason) = reason {
        log::warn!(
            "RIB entry for peer {} has truncated attributes: {}",
            peer_index,
            reason
        );
    }

    Ok(RibEntry {
        peer_index,
        originated_time,
        attributes,
    })
}
