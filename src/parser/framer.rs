use crate::error::ParserError;
use crate::models::mrt::{CommonHeader, KNOWN_MRT_TYPES};
use crate::parser::mrt_header::{parse_common_header, COMMON_HEADER_LEN};
use bytes::{Bytes, BytesMut};
use std::io::Read;

/// Splits a byte stream into MRT records without requiring `Seek`.
///
/// The first record's type is validated against the known MRT type
/// registry; an unknown type there is fatal ([ParserError::InvalidMrtFile])
/// since it almost certainly means the stream isn't an MRT dump at all.
/// Every later record's type is left to the payload decoder to accept or
/// reject, so a file that mixes known and "currently unhandled" record
/// types still streams through.
pub struct MrtReader<R> {
    inner: R,
    checked_first_record: bool,
    done: bool,
}

impl<R: Read> MrtReader<R> {
    pub fn new(inner: R) -> Self {
        MrtReader {
            inner,
            checked_first_record: false,
            done: false,
        }
    }

    /// Reads the next `(header, payload)` pair, or `Ok(None)` at a clean
    /// end of stream. A header read that comes up short -- even by a
    /// single byte -- is treated as end of stream rather than an error,
    /// since trailing partial bytes are indistinguishable from a dump
    /// that was truncated exactly on a record boundary. A short payload
    /// read, by contrast, means the header promised more than the stream
    /// delivered and is a genuine [ParserError::BadFrame].
    pub fn next_record(&mut self) -> Result<Option<(CommonHeader, Bytes)>, ParserError> {
        let mut header_buf = [0u8; COMMON_HEADER_LEN];
        let mut filled = 0usize;
        while filled < COMMON_HEADER_LEN {
            let n = self.inner.read(&mut header_buf[filled..])?;
            if n == 0 {
                return Ok(None);
            }
            filled += n;
        }

        let header = parse_common_header(&header_buf).expect("buffer is exactly 12 bytes");

        if !self.checked_first_record {
            self.checked_first_record = true;
            if !KNOWN_MRT_TYPES.contains(&header.entry_type) {
                return Err(ParserError::InvalidMrtFile {
                    entry_type: header.entry_type,
                });
            }
        }

        let mut payload = BytesMut::zeroed(header.length as usize);
        self.inner
            .read_exact(&mut payload)
            .map_err(|_| ParserError::BadFrame)?;

        Ok(Some((header, payload.freeze())))
    }
}

impl<R: Read> Iterator for MrtReader<R> {
    type Item = Result<(CommonHeader, Bytes), ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
