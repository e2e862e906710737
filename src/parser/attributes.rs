use crate::error::ParserError;
use crate::models::bgp::{
    AsPath, AsPathSegment, AsPathSegmentType, AttrKind, AttrValue, Attributes, Origin,
};
use crate::parser::utils::TryBuf;
use bytes::{Buf, Bytes};

const ATTR_FLAG_EXTENDED_LENGTH: u8 = 0x10;

const ATTR_TYPE_ORIGIN: u8 = 1;
const ATTR_TYPE_AS_PATH: u8 = 2;
const ATTR_TYPE_NEXT_HOP: u8 = 3;

/// Decodes the TLV-encoded BGP path attributes that follow a RIB entry's
/// fixed fields.
///
/// Unknown attribute types are skipped by their declared length, not
/// rejected -- a dump with attributes this crate doesn't model (MED,
/// LOCAL_PREF, communities, ...) still yields ORIGIN/AS_PATH/NEXT_HOP.
///
/// If the buffer runs out mid-attribute, decoding stops and whatever was
/// parsed so far is returned alongside a reason, rather than discarding
/// the whole entry -- the caller decides whether a partial set of
/// attributes is still usable (it always is for origin-AS extraction, as
/// long as AS_PATH made it in before the cutoff).
pub fn parse_attributes(mut buf: Bytes) -> (Attributes, Option<String>) {
    let mut attrs = Attributes::new();
    while buf.remaining() > 0 {
        match parse_one_attribute(&mut buf, &mut attrs) {
            Ok(()) => {}
            Err(e) => return (attrs, Some(e.to_string())),
        }
    }
    (attrs, None)
}

fn parse_one_attribute(buf: &mut Bytes, attrs: &mut Attributes) -> Result<(), ParserError> {
    let flags = buf.try_u8()?;
    let attr_type = buf.try_u8()?;
    let extended_length = flags & ATTR_FLAG_EXTENDED_LENGTH != 0;
    let len = if extended_length {
        buf.try_u16()? as usize
    } else {
        buf.try_u8()? as usize
    };
    let mut value = buf.try_copy_to_bytes(len)?;

    match attr_type {
        // Expect len == 1; any other length drops the attribute but does
        // not halt the rest of the TLV walk -- its bytes were already
        // consumed above via `try_copy_to_bytes`.
        ATTR_TYPE_ORIGIN if value.remaining() == 1 => {
            let raw = value.get_u8();
            if let Ok(origin) = Origin::try_from(raw) {
                attrs.insert(AttrKind::Origin, AttrValue::Origin(origin));
            }
        }
        ATTR_TYPE_AS_PATH => {
            let path = parse_as_path(&mut value)?;
            attrs.insert(AttrKind::AsPath, AttrValue::AsPath(path));
        }
        // Expect len == 4; anything else is dropped, same rationale as ORIGIN.
        ATTR_TYPE_NEXT_HOP if value.remaining() == 4 => {
            let ip = value.try_ipv4()?;
            attrs.insert(AttrKind::NextHop, AttrValue::NextHop(ip));
        }
        _ => {}
    }

    Ok(())
}

fn parse_as_path(buf: &mut Bytes) -> Result<AsPath, ParserError> {
    let mut segments = Vec::new();
    while buf.remaining() > 0 {
        let segment_type_raw = buf.try_u8()?;
        let segment_length = buf.try_u8()? as usize;
        let mut asns = Vec::with_capacity(segment_length);
        for _ in 0..segment_length {
            asns.push(buf.try_u32()?);
        }
        segments.push(AsPathSegment {
            segment_type: AsPathSegmentType::try_from(segment_type_raw).ok(),
            asns,
        });
    }
    Ok(AsPath { segments })
}
