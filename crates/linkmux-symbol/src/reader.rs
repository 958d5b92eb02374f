use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_symbol, RECORD_SIZE};
use crate::error::{Result, SymbolError};
use crate::symbol::Symbol;

const READ_CHUNK_SIZE: usize = 64 * RECORD_SIZE;

/// Reads symbol capture records from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete records.
pub struct CaptureReader<T> {
    inner: T,
    buf: BytesMut,
    eof: bool,
    failed: bool,
}

impl<T: Read> CaptureReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            eof: false,
            failed: false,
        }
    }

    /// Read the next symbol (blocking).
    ///
    /// Returns `Ok(None)` at a clean end of stream and
    /// `Err(SymbolError::Truncated)` if the stream ends inside a record.
    pub fn read_symbol(&mut self) -> Result<Option<Symbol>> {
        loop {
            if let Some(symbol) = decode_symbol(&mut self.buf)? {
                return Ok(Some(symbol));
            }
            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let trailing = self.buf.len();
                tracing::debug!(trailing, "capture ended inside a record");
                self.buf.clear();
                return Err(SymbolError::Truncated(trailing));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SymbolError::Io(err)),
            };

            if read == 0 {
                tracing::trace!(pending = self.buf.len(), "capture stream reached eof");
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for CaptureReader<T> {
    type Item = Result<Symbol>;

    /// Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.read_symbol().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::encode_symbol;

    fn capture(symbols: &[Symbol]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        for symbol in symbols {
            encode_symbol(symbol, &mut wire);
        }
        wire.to_vec()
    }

    #[test]
    fn reads_until_clean_eof() {
        let symbols = [Symbol::data(1), Symbol::data(2).with_sequence(1, false)];
        let mut reader = CaptureReader::new(Cursor::new(capture(&symbols)));

        assert_eq!(reader.read_symbol().unwrap(), Some(symbols[0]));
        assert_eq!(reader.read_symbol().unwrap(), Some(symbols[1]));
        assert_eq!(reader.read_symbol().unwrap(), None);
    }

    #[test]
    fn partial_reads_are_reassembled() {
        let bytes = capture(&[Symbol::data(0xABCD)]);
        let mut reader = CaptureReader::new(ByteByByteReader { bytes, pos: 0 });
        assert_eq!(reader.read_symbol().unwrap(), Some(Symbol::data(0xABCD)));
    }

    #[test]
    fn trailing_bytes_are_reported() {
        let mut bytes = capture(&[Symbol::data(1)]);
        bytes.extend_from_slice(&[0x09, 0x00, 0x00]);
        let results: Vec<_> = CaptureReader::new(Cursor::new(bytes)).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SymbolError::Truncated(3))));
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }
}
