use thiserror::Error;

/// Errors returned by the byte cursor.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use dvdpgc_core::ByteCursor;
/// use dvdpgc_core::source::error::ReadError;
///
/// let err = ReadError::UnsupportedWidth { width: 3 };
/// assert!(err.to_string().contains("unsupported integer width"));
///
/// let mut cursor = ByteCursor::new(Cursor::new(vec![0u8; 3]));
/// let err = cursor.read_u32().unwrap_err();
/// assert!(matches!(err, ReadError::TruncatedRead { offset: 0, width: 4 }));
/// ```
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated read: need {width} bytes at offset {offset:#x}")]
    TruncatedRead { offset: u64, width: usize },
    #[error("unsupported integer width: {width} (expected 1, 2, 4 or 8)")]
    UnsupportedWidth { width: usize },
}

impl ReadError {
    /// Classify an I/O failure that happened while reading `width` bytes at `offset`.
    pub(crate) fn from_io(err: std::io::Error, offset: u64, width: usize) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ReadError::TruncatedRead { offset, width }
        } else {
            ReadError::Io(err)
        }
    }
}
