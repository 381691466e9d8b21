//! Upstream sources a filter can read from.

use std::io::Read;

use crate::error::{FilterError, Result};

/// A byte source with a bounded read.
///
/// `read(Some(n))` returns at most `n` bytes, `read(None)` everything that is
/// left. `Ok(None)` signals end of stream; a read that yields no bytes,
/// including `read(Some(0))`, is reported as `Ok(None)` too, so callers never
/// see an empty chunk.
pub trait Reader {
    fn read(&mut self, max_len: Option<usize>) -> Result<Option<Vec<u8>>>;
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn read(&mut self, max_len: Option<usize>) -> Result<Option<Vec<u8>>> {
        (**self).read(max_len)
    }
}

/// A filter whose configuration can be re-bound to another upstream.
pub trait ChainableReader: Reader {
    type Chained<U: Reader>: Reader;

    fn chain<U: Reader>(&self, upstream: U) -> Self::Chained<U>;
}

/// In-memory source.
#[derive(Debug, Clone, Default)]
pub struct BytesReader {
    data: Vec<u8>,
    pos: usize,
}

impl BytesReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }
}

impl Reader for BytesReader {
    fn read(&mut self, max_len: Option<usize>) -> Result<Option<Vec<u8>>> {
        let remaining = &self.data[self.pos..];
        let n = max_len.map_or(remaining.len(), |max| max.min(remaining.len()));
        if n == 0 {
            return Ok(None);
        }
        self.pos += n;
        Ok(Some(remaining[..n].to_vec()))
    }
}

/// Adapter over any [`std::io::Read`] (files, stdin).
pub struct IoReader<R> {
    inner: R,
}

impl<R: Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Reader for IoReader<R> {
    fn read(&mut self, max_len: Option<usize>) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let read = match max_len {
            Some(max) => (&mut self.inner).take(max as u64).read_to_end(&mut buf),
            None => self.inner.read_to_end(&mut buf),
        };
        read.map_err(|e| FilterError::io("reading input", e))?;
        Ok((!buf.is_empty()).then_some(buf))
    }
}

/// Read until end of stream, concatenating every chunk.
pub fn read_all(reader: &mut impl Reader) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    while let Some(chunk) = reader.read(None)? {
        out.extend_from_slice(&chunk);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_reader_bounded() {
        let mut r = BytesReader::new("abcdef");
        assert_eq!(r.read(Some(4)).unwrap().as_deref(), Some(&b"abcd"[..]));
        assert_eq!(r.read(Some(4)).unwrap().as_deref(), Some(&b"ef"[..]));
        assert_eq!(r.read(Some(4)).unwrap(), None);
    }

    #[test]
    fn test_bytes_reader_empty() {
        let mut r = BytesReader::new(Vec::new());
        assert_eq!(r.read(None).unwrap(), None);
    }

    #[test]
    fn test_zero_length_read_matches_across_readers() {
        let mut bytes = BytesReader::new("abc");
        let mut io = IoReader::new(&b"abc"[..]);
        assert_eq!(bytes.read(Some(0)).unwrap(), None);
        assert_eq!(io.read(Some(0)).unwrap(), None);
        assert_eq!(bytes.read(None).unwrap().as_deref(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_io_reader() {
        let mut r = IoReader::new(&b"body { color: red }"[..]);
        assert_eq!(r.read(Some(4)).unwrap().as_deref(), Some(&b"body"[..]));
        assert_eq!(
            r.read(None).unwrap().as_deref(),
            Some(&b" { color: red }"[..])
        );
        assert_eq!(r.read(None).unwrap(), None);
    }

    #[test]
    fn test_read_all() {
        let mut r = BytesReader::new("abc");
        assert_eq!(read_all(&mut r).unwrap(), b"abc");
    }
}
