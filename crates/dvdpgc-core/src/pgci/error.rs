use thiserror::Error;

use crate::source::ReadError;

/// Errors returned by PGCI decoding.
///
/// Every variant aborts the whole decode; no partially filled table is ever
/// handed back.
///
/// # Examples
/// ```
/// use dvdpgc_core::PgciError;
///
/// let err = PgciError::UnknownFrameRate { code: 2 };
/// assert!(err.to_string().contains("unknown frame rate code"));
/// ```
#[derive(Debug, Error)]
pub enum PgciError {
    #[error("I/O error: {0}")]
    Io(std::io::Error),
    #[error("truncated read: need {width} bytes at offset {offset:#x}")]
    TruncatedRead { offset: u64, width: usize },
    #[error("unsupported integer width: {width}")]
    UnsupportedWidth { width: usize },
    #[error("unrecognized cell type {code} for cell {cell} at offset {offset:#x}")]
    UnrecognizedCellType { code: u8, cell: u8, offset: u64 },
    #[error("cell {cell} record lies before the start of the source (cell table at {cell_table:#x})")]
    CellRecordOutOfRange { cell: u8, cell_table: u64 },
    #[error("unknown frame rate code {code:#04b}")]
    UnknownFrameRate { code: u8 },
    #[error("frame flag not set in frame byte {byte:#04x}")]
    InvalidFrameFlag { byte: u8 },
}

impl From<ReadError> for PgciError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Io(err) => PgciError::Io(err),
            ReadError::TruncatedRead { offset, width } => {
                PgciError::TruncatedRead { offset, width }
            }
            ReadError::UnsupportedWidth { width } => PgciError::UnsupportedWidth { width },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PgciError;
    use crate::source::ReadError;

    #[test]
    fn read_errors_keep_their_kind() {
        let err = PgciError::from(ReadError::TruncatedRead {
            offset: 0xCC,
            width: 4,
        });
        assert!(matches!(
            err,
            PgciError::TruncatedRead {
                offset: 0xCC,
                width: 4
            }
        ));
        assert!(err.to_string().contains("0xcc"));

        let err = PgciError::from(ReadError::UnsupportedWidth { width: 3 });
        assert!(matches!(err, PgciError::UnsupportedWidth { width: 3 }));
    }
}
