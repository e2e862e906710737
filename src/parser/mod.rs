mod attributes;
pub mod framer;
mod mrt_header;
mod peer_index;
mod rib;
mod utils;

pub use framer::MrtReader;

use crate::error::ParserError;
use crate::models::mrt::{
    CommonHeader, MRT_TYPE_TABLE_DUMP_V2, TABLE_DUMP_V2_PEER_INDEX_TABLE,
    TABLE_DUMP_V2_RIB_IPV4_UNICAST,
};
use crate::models::rib::MrtMessage;
use bytes::Bytes;

/// Decodes a record's payload given its already-parsed common header.
///
/// Only TABLE_DUMP_V2 PEER_INDEX_TABLE and RIB_IPV4_UNICAST bodies are
/// understood; everything else -- TABLE_DUMP, RIB_IPV6_UNICAST, BGP4MP,
/// and any other registered MRT type -- comes back as
/// [ParserError::UnsupportedRecord] so the caller can log and move on to
/// the next record without aborting the file.
pub fn decode_payload(header: &CommonHeader, payload: Bytes) -> Result<MrtMessage, ParserError> {
    match (header.entry_type, header.entry_subtype) {
        (MRT_TYPE_TABLE_DUMP_V2, TABLE_DUMP_V2_PEER_INDEX_TABLE) => {
            peer_index::parse_peer_index_table(payload).map(MrtMessage::PeerIndexTable)
        }
        (MRT_TYPE_TABLE_DUMP_V2, TABLE_DUMP_V2_RIB_IPV4_UNICAST) => {
            rib::parse_rib_ipv4_unicast(payload).map(MrtMessage::RibIpv4Unicast)
        }
        (entry_type, entry_subtype) => Err(ParserError::UnsupportedRecord {
            entry_type,
            entry_subtype,
        }),
    }
}
