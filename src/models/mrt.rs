/// MRT common header (RFC 6396 §4.1), 12 bytes on the wire, big-endian.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Message... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    pub timestamp: u32,
    pub entry_type: u16,
    pub entry_subtype: u16,
    /// Length of the payload only; does not include this 12-byte header.
    pub length: u32,
}

/// The MRT type codes this decoder recognizes as valid at the start of a
/// file (RFC 6396 + the IANA MRT type registry). Only TABLE_DUMP (12) and
/// TABLE_DUMP_V2 (13) have handlers; the rest are accepted at open time
/// but yield [crate::error::ParserError::UnsupportedRecord] once decoded.
pub const KNOWN_MRT_TYPES: [u16; 9] = [11, 12, 13, 16, 17, 32, 33, 48, 49];

pub const MRT_TYPE_TABLE_DUMP: u16 = 12;
pub const MRT_TYPE_TABLE_DUMP_V2: u16 = 13;

pub const TABLE_DUMP_V2_PEER_INDEX_TABLE: u16 = 1;
pub const TABLE_DUMP_V2_RIB_IPV4_UNICAST: u16 = 2;
pub const TABLE_DUMP_V2_RIB_IPV6_UNICAST: u16 = 4;
