/*!
Wire-format data structures for MRT records, BGP attributes, and the
peer index table. These are plain data holders; parsing lives in
[crate::parser], the LPM trie lives in [crate::table].
*/
pub mod bgp;
pub mod mrt;
pub mod peer;
pub mod rib;

pub use bgp::{AsPath, AsPathSegment, AsPathSegmentType, AttrKind, AttrValue, Attributes, Origin};
pub use mrt::{CommonHeader, KNOWN_MRT_TYPES};
pub use peer::{Peer, PeerIndexTable, PeerType};
pub use rib::{Ipv4Prefix, MrtMessage, RibEntry, RibIpv4Unicast};
