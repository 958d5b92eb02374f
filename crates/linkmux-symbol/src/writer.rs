use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_symbol, RECORD_SIZE};
use crate::error::{Result, SymbolError};
use crate::symbol::Symbol;

const INITIAL_BUFFER_CAPACITY: usize = 64 * RECORD_SIZE;

/// Writes symbol capture records to any `Write` stream.
pub struct CaptureWriter<T> {
    inner: T,
    buf: BytesMut,
    written: u64,
}

impl<T: Write> CaptureWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            written: 0,
        }
    }

    /// Encode and write one symbol (blocking).
    pub fn write_symbol(&mut self, symbol: &Symbol) -> Result<()> {
        self.buf.clear();
        encode_symbol(symbol, &mut self.buf);
        self.write_buffered()?;
        self.written += 1;
        Ok(())
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(SymbolError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SymbolError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SymbolError::Io(err)),
            }
        }
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.written
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
