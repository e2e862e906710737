use num_enum::TryFromPrimitive;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// BGP `ORIGIN` path attribute value (attribute type 1).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum Origin {
    IGP = 0,
    EGP = 1,
    INCOMPLETE = 2,
}

/// AS_PATH segment type (RFC 4271 §4.3, RFC 5065 for the confederation
/// variants). Only used to tag a segment; origin-AS extraction does not
/// distinguish between them (see [AsPath::origin_asn]).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum AsPathSegmentType {
    AS_SET = 1,
    AS_SEQUENCE = 2,
    AS_CONFED_SEQUENCE = 3,
    AS_CONFED_SET = 4,
}

/// One `(segment_type, segment_length, segment_length x u32 AS numbers)`
/// triple from an AS_PATH attribute. `segment_type` is `None` when the
/// wire byte was outside the known range -- kept instead of rejected so
/// the rest of the path can still be walked for its ASes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsPathSegment {
    pub segment_type: Option<AsPathSegmentType>,
    pub asns: Vec<u32>,
}

/// A BGP AS_PATH attribute: an ordered sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsPath {
    pub segments: Vec<AsPathSegment>,
}

impl AsPath {
    /// The "origin AS": the last AS number of the last segment, as
    /// stored on the wire.
    ///
    /// This does not special-case AS_SET segments (an unordered set has
    /// no well-defined "last" AS, but the last element as stored is used
    /// verbatim regardless). This matches the behavior of the original
    /// tool this decoder's semantics were distilled from, which was not
    /// observed to special-case AS_SET either -- preserved rather than
    /// "fixed" since downstream consumers may depend on it.
    pub fn origin_asn(&self) -> Option<u32> {
        self.segments.last().and_then(|seg| seg.asns.last().copied())
    }
}

/// Which relevant BGP path attributes were present on a RIB entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttrKind {
    Origin,
    AsPath,
    NextHop,
}

/// The decoded value of a relevant BGP path attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Origin(Origin),
    AsPath(AsPath),
    NextHop(Ipv4Addr),
}

/// The subset of a RIB entry's BGP path attributes this decoder models:
/// ORIGIN, AS_PATH, and NEXT_HOP. Any other attribute type is skipped by
/// its declared length and never makes it into this map.
pub type Attributes = BTreeMap<AttrKind, AttrValue>;

pub(crate) fn origin_asn(attrs: &Attributes) -> Option<u32> {
    match attrs.get(&AttrKind::AsPath) {
        Some(AttrValue::AsPath(path)) => path.origin_asn(),
        _ => None,
    }
}
