use crate::models::mrt::CommonHeader;
use zerocopy::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Wire layout of the 12-byte MRT common header, parsed with a single
/// bounds check instead of four sequential cursor reads.
#[derive(FromBytes, KnownLayout, Immutable)]
#[repr(C)]
struct RawCommonHeader {
    timestamp: U32,
    entry_type: U16,
    entry_subtype: U16,
    length: U32,
}

const _: () = assert!(core::mem::size_of::<RawCommonHeader>() == 12);

pub const COMMON_HEADER_LEN: usize = 12;

/// Parses a 12-byte MRT common header. `bytes` must be exactly
/// [COMMON_HEADER_LEN] long; the framer is responsible for accumulating
/// that much data (or detecting a short read) before calling this.
pub fn parse_common_header(bytes: &[u8]) -> Option<CommonHeader> {
    let raw = RawCommonHeader::ref_from_bytes(bytes).ok()?;
    Some(CommonHeader {
        timestamp: raw.timestamp.get(),
        entry_type: raw.entry_type.get(),
        entry_subtype: raw.entry_subtype.get(),
        length: raw.length.get(),
    })
}
