use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

use super::error::ReadError;

/// Big-endian fixed-width reader over a seekable byte stream.
///
/// Every read starts at the current stream position and advances past the
/// bytes it consumed. The cursor holds no state besides the wrapped stream.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use dvdpgc_core::ByteCursor;
///
/// let mut cursor = ByteCursor::new(Cursor::new(vec![0x00, 0x01, 0x02, 0x03]));
/// cursor.seek(1)?;
/// assert_eq!(cursor.read_uint(2)?, 0x0102);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ByteCursor<R> {
    inner: R,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reposition the stream to an absolute offset.
    ///
    /// No bounds check is made here; reading past the end reports
    /// [`ReadError::TruncatedRead`].
    pub fn seek(&mut self, offset: u64) -> Result<u64, ReadError> {
        Ok(self.inner.seek(SeekFrom::Start(offset))?)
    }

    pub fn position(&mut self) -> Result<u64, ReadError> {
        Ok(self.inner.stream_position()?)
    }

    /// Read a big-endian unsigned integer of `width` bytes (1, 2, 4 or 8).
    ///
    /// # Errors
    /// Returns [`ReadError::UnsupportedWidth`] for any other width and
    /// [`ReadError::TruncatedRead`] when the stream ends early.
    pub fn read_uint(&mut self, width: usize) -> Result<u64, ReadError> {
        match width {
            1 => self.read_u8().map(u64::from),
            2 => self.read_u16().map(u64::from),
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            _ => Err(ReadError::UnsupportedWidth { width }),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        let offset = self.position()?;
        self.inner
            .read_u8()
            .map_err(|err| ReadError::from_io(err, offset, 1))
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let offset = self.position()?;
        self.inner
            .read_u16::<BigEndian>()
            .map_err(|err| ReadError::from_io(err, offset, 2))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let offset = self.position()?;
        self.inner
            .read_u32::<BigEndian>()
            .map_err(|err| ReadError::from_io(err, offset, 4))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        let offset = self.position()?;
        self.inner
            .read_u64::<BigEndian>()
            .map_err(|err| ReadError::from_io(err, offset, 8))
    }

    /// Read `N` raw bytes without interpreting them.
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let offset = self.position()?;
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|err| ReadError::from_io(err, offset, N))?;
        Ok(buf)
    }
}
