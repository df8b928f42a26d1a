//! On-disc layout of the VTS program chain information table.
//!
//! Reference: <http://dvd.sourceforge.net/dvdinfo/pgc.html>

/// Logical block (sector) size of DVD media.
pub const LOGICAL_BLOCK_SIZE: u64 = 0x800;

/// Offset of the PGCI item count inside the table header.
pub const NB_PROGRAM_CHAINS_OFFSET: u64 = 0x0001;
/// Size of one search pointer in the PGCI directory.
pub const DIRECTORY_ENTRY_SIZE: u64 = 8;
/// Offset of the chain start address inside a search pointer.
pub const DIRECTORY_CHAIN_OFFSET: u64 = 4;

/// Size of one cell playback information record.
pub const CELL_PLAYBACK_INFO_SIZE: u64 = 0x18;
/// Offset of the cell playback time inside a cell playback record.
pub const CELL_PLAYBACK_TIME: u64 = 0x0004;

/// Length of a packed BCD playback time.
pub const PLAYBACK_TIME_LEN: usize = 4;

/// A named field inside a fixed on-disc structure.
///
/// Tables describe their layout as enums implementing this trait, so the
/// same reader helpers work for every structure that is resolved from a
/// base offset.
pub trait FieldOffset: Copy {
    fn offset(self) -> u64;

    /// Absolute position of this field in a structure starting at `base`.
    fn at(self, base: u64) -> u64 {
        base + self.offset()
    }
}

/// Fields of the VTS information header (VTSI), relative to the file start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum VtsiOffset {
    /// Start sector of the VTS_PGCI table.
    SectorPointerVtsPgci = 0x00CC,
}

impl FieldOffset for VtsiOffset {
    fn offset(self) -> u64 {
        self as u64
    }
}

/// Fields of a program chain, relative to the chain start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PgcOffset {
    NbPrograms = 0x0002,
    NbCells = 0x0003,
    PlaybackTime = 0x0004,
    Uops = 0x0008,
    PgcAstCtl = 0x000C,
    PgcSpstCtl = 0x001C,
    NextPgcn = 0x009C,
    PreviousPgcn = 0x009E,
    GoupPgcn = 0x00A0,
    PgcStillTime = 0x00A2,
    PgPlaybackMode = 0x00A3,
    Palette = 0x00A4,
    CommandsOffset = 0x00E4,
    ProgramMapOffset = 0x00E6,
    CellPlaybackInfoTableOffset = 0x00E8,
    CellPositionInfoTableOffset = 0x00EA,
}

impl FieldOffset for PgcOffset {
    fn offset(self) -> u64 {
        self as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldOffset, PgcOffset, VtsiOffset};

    #[test]
    fn chain_fields_match_format_offsets() {
        assert_eq!(PgcOffset::NbPrograms.offset(), 0x02);
        assert_eq!(PgcOffset::PlaybackTime.offset(), 0x04);
        assert_eq!(PgcOffset::ProgramMapOffset.offset(), 0xE6);
        assert_eq!(PgcOffset::CellPlaybackInfoTableOffset.offset(), 0xE8);
    }

    #[test]
    fn field_position_is_base_relative() {
        assert_eq!(PgcOffset::NbPrograms.at(0x1000), 0x1002);
        assert_eq!(VtsiOffset::SectorPointerVtsPgci.at(0), 0xCC);
    }
}
