use std::io::{Read, Seek};

use super::error::PgciError;
use super::layout::{self, FieldOffset};
use super::time::PlaybackTime;
use crate::source::ByteCursor;

/// Positioned field access for PGCI decoding.
///
/// Every read seeks to an absolute offset first, so callers never depend on
/// where the previous read left the stream.
pub struct PgciReader<R> {
    cursor: ByteCursor<R>,
}

impl<R: Read + Seek> PgciReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            cursor: ByteCursor::new(source),
        }
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    pub fn read_u8_at(&mut self, offset: u64) -> Result<u8, PgciError> {
        self.cursor.seek(offset)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u16_at(&mut self, offset: u64) -> Result<u16, PgciError> {
        self.cursor.seek(offset)?;
        Ok(self.cursor.read_u16()?)
    }

    pub fn read_u32_at(&mut self, offset: u64) -> Result<u32, PgciError> {
        self.cursor.seek(offset)?;
        Ok(self.cursor.read_u32()?)
    }

    pub fn read_u8_field<F: FieldOffset>(&mut self, base: u64, field: F) -> Result<u8, PgciError> {
        self.read_u8_at(field.at(base))
    }

    pub fn read_u16_field<F: FieldOffset>(
        &mut self,
        base: u64,
        field: F,
    ) -> Result<u16, PgciError> {
        self.read_u16_at(field.at(base))
    }

    pub fn read_u32_field<F: FieldOffset>(
        &mut self,
        base: u64,
        field: F,
    ) -> Result<u32, PgciError> {
        self.read_u32_at(field.at(base))
    }

    /// Read and decode a packed playback time at `offset`.
    pub fn read_playback_time_at(&mut self, offset: u64) -> Result<PlaybackTime, PgciError> {
        self.cursor.seek(offset)?;
        let bytes = self.cursor.read_bytes::<{ layout::PLAYBACK_TIME_LEN }>()?;
        PlaybackTime::decode(bytes)
    }

    /// Read the 2-bit cell category at the start of a cell playback record.
    ///
    /// The full 4-byte category word must be present even though only the
    /// top bits of its first byte are used.
    pub fn read_cell_category_at(&mut self, offset: u64) -> Result<u8, PgciError> {
        self.cursor.seek(offset)?;
        let bytes = self.cursor.read_bytes::<4>()?;
        Ok(bytes[0] >> 6)
    }
}
