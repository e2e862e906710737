/*!
Checked, big-endian reads over a [bytes::Bytes] buffer.

[bytes::Buf]'s own `get_*` methods panic when the buffer is shorter than
requested. Truncated records need lenient, non-panicking handling (BGP
attribute parsing in particular must stop and return what it has rather
than abort the whole file), so every read here is fallible instead.
*/
use crate::error::ParserError;
use bytes::{Buf, Bytes};
use std::net::Ipv4Addr;

fn truncated() -> ParserError {
    ParserError::ParseError("unexpected end of buffer".to_string())
}

pub trait TryBuf: Buf {
    fn try_u8(&mut self) -> Result<u8, ParserError> {
        if self.remaining() < 1 {
            return Err(truncated());
        }
        Ok(self.get_u8())
    }

    fn try_u16(&mut self) -> Result<u16, ParserError> {
        if self.remaining() < 2 {
            return Err(truncated());
        }
        Ok(self.get_u16())
    }

    fn try_u32(&mut self) -> Result<u32, ParserError> {
        if self.remaining() < 4 {
            return Err(truncated());
        }
        Ok(self.get_u32())
    }

    fn try_ipv4(&mut self) -> Result<Ipv4Addr, ParserError> {
        Ok(Ipv4Addr::from(self.try_u32()?))
    }

    fn try_copy_to_bytes(&mut self, n: usize) -> Result<Bytes, ParserError> {
        if self.remaining() < n {
            return Err(truncated());
        }
        Ok(self.copy_to_bytes(n))
    }
}

impl<T: Buf> TryBuf for T {}
