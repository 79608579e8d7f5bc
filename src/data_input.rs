//! Little-endian binary cursor used by the WMF parser

use crate::error::{ConvertError, ConvertResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// Sequential reader over a WMF byte stream.
///
/// Keeps a per-record byte counter so the parser can compute how much of a
/// record's declared payload is left, and optionally enforces that limit so a
/// record can never be decoded past its own end.
pub struct DataInput<R> {
    reader: R,
    count: usize,
    limit: Option<usize>,
    position: u64,
}

impl<R: Read> DataInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            count: 0,
            limit: None,
            position: 0,
        }
    }

    /// Total bytes consumed since the start of the stream.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes consumed since the last `reset_count`.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    /// Bound subsequent reads to `limit` bytes past the last `reset_count`.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /// Bytes left before the current limit; zero when no limit is set.
    pub fn remaining(&self) -> usize {
        self.limit.map_or(0, |limit| limit.saturating_sub(self.count))
    }

    fn claim(&self, n: usize) -> ConvertResult<()> {
        if let Some(limit) = self.limit {
            if self.count + n > limit {
                return Err(ConvertError::malformed(
                    0,
                    format!(
                        "read of {} bytes at offset {} crosses the declared size of {} bytes",
                        n, self.count, limit
                    ),
                ));
            }
        }
        Ok(())
    }

    fn advance(&mut self, n: usize) {
        self.count += n;
        self.position += n as u64;
    }

    fn map_io(&self, err: io::Error) -> ConvertError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ConvertError::TruncatedInput {
                offset: self.position,
            }
        } else {
            ConvertError::Io(err)
        }
    }

    pub fn read_u8(&mut self) -> ConvertResult<u8> {
        self.claim(1)?;
        let value = self.reader.read_u8().map_err(|e| self.map_io(e))?;
        self.advance(1);
        Ok(value)
    }

    pub fn read_i8(&mut self) -> ConvertResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> ConvertResult<u16> {
        self.claim(2)?;
        let value = self
            .reader
            .read_u16::<LittleEndian>()
            .map_err(|e| self.map_io(e))?;
        self.advance(2);
        Ok(value)
    }

    pub fn read_i16(&mut self) -> ConvertResult<i16> {
        self.claim(2)?;
        let value = self
            .reader
            .read_i16::<LittleEndian>()
            .map_err(|e| self.map_io(e))?;
        self.advance(2);
        Ok(value)
    }

    pub fn read_u32(&mut self) -> ConvertResult<u32> {
        self.claim(4)?;
        let value = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| self.map_io(e))?;
        self.advance(4);
        Ok(value)
    }

    pub fn read_i32(&mut self) -> ConvertResult<i32> {
        self.claim(4)?;
        let value = self
            .reader
            .read_i32::<LittleEndian>()
            .map_err(|e| self.map_io(e))?;
        self.advance(4);
        Ok(value)
    }

    pub fn read_bytes(&mut self, n: usize) -> ConvertResult<Vec<u8>> {
        self.claim(n)?;
        // sized by the bytes present, not the declared length
        let mut buf = Vec::new();
        let read = (&mut self.reader).take(n as u64).read_to_end(&mut buf)?;
        self.advance(read);
        if read < n {
            return Err(ConvertError::TruncatedInput {
                offset: self.position,
            });
        }
        Ok(buf)
    }

    /// Discard `n` bytes (record padding).
    pub fn skip(&mut self, n: usize) -> ConvertResult<()> {
        self.claim(n)?;
        let copied = io::copy(&mut (&mut self.reader).take(n as u64), &mut io::sink())?;
        self.advance(copied as usize);
        if copied < n as u64 {
            return Err(ConvertError::TruncatedInput {
                offset: self.position,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x34, 0x12, 0xFE, 0xFF, 0x78, 0x56, 0x34, 0x12];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        assert_eq!(input.read_u16().unwrap(), 0x1234);
        assert_eq!(input.read_i16().unwrap(), -2);
        assert_eq!(input.read_u32().unwrap(), 0x12345678);
        assert_eq!(input.position(), 8);
    }

    #[test]
    fn test_count_resets_per_record() {
        let data = [1u8, 0, 2, 0, 3, 0];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        input.read_u16().unwrap();
        input.reset_count();
        input.read_u16().unwrap();
        assert_eq!(input.count(), 2);
        assert_eq!(input.position(), 4);
    }

    #[test]
    fn test_truncated_read() {
        let data = [1u8];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        let err = input.read_u32().unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedInput { offset: 0 }));
    }

    #[test]
    fn test_limit_rejects_overrun() {
        let data = [0u8; 8];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        input.set_limit(Some(2));
        input.read_u16().unwrap();
        assert_eq!(input.remaining(), 0);
        let err = input.read_u16().unwrap_err();
        assert!(matches!(err, ConvertError::MalformedRecord { .. }));
    }

    #[test]
    fn test_skip_padding() {
        let data = [0u8, 0, 0, 0, 9, 0];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        input.skip(4).unwrap();
        assert_eq!(input.read_u16().unwrap(), 9);
        assert!(input.skip(1).is_err());
    }

    #[test]
    fn test_oversized_read_is_truncated() {
        let data = [1u8, 2, 3];
        let mut input = DataInput::new(Cursor::new(&data[..]));
        let err = input.read_bytes(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedInput { offset: 3 }));
    }
}
