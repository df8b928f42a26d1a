use std::io::{Read, Seek};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::error::PgciError;
use super::layout::{self, FieldOffset, PgcOffset, VtsiOffset};
use super::reader::PgciReader;
use super::time::PlaybackTime;

/// Decoded VTS program chain information table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgciTable {
    /// Number of program chains declared in the table header.
    pub nb_program_chains: u8,
    /// Program chains in directory order.
    pub program_chains: Vec<ProgramChain>,
}

/// One program chain of the PGCI directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramChain {
    /// Total playback time recorded in the chain header.
    pub duration: PlaybackTime,
    pub nb_program: u8,
    /// One entry per cell, in traversal order across all programs.
    pub playback_times: Vec<PlaybackTime>,
    /// Cell range decoded for each program, in program order.
    pub programs: Vec<ProgramCells>,
}

/// Inclusive, 1-based cell range owned by a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramCells {
    pub entry_cell: u8,
    pub exit_cell: u8,
}

impl ProgramCells {
    /// Cells covered by this program. An exit below the entry is empty.
    pub fn cells(&self) -> RangeInclusive<u8> {
        self.entry_cell..=self.exit_cell
    }

    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }
}

/// Decoder for the VTS_PGCI table of a VTS IFO file.
///
/// The source may be positioned anywhere; all reads are absolute. The
/// decoder takes exclusive use of the source for the duration of
/// [`PgciDecoder::load`].
///
/// # Examples
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
///
/// use dvdpgc_core::PgciDecoder;
///
/// let file = BufReader::new(File::open("VIDEO_TS/VTS_01_0.IFO")?);
/// let table = PgciDecoder::new(file).load()?;
/// println!("{} program chains", table.program_chains.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PgciDecoder<R> {
    reader: PgciReader<R>,
}

impl<R: Read + Seek> PgciDecoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: PgciReader::new(source),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Decode the whole table.
    ///
    /// # Errors
    /// Any read or validation failure aborts the decode and is returned as
    /// [`PgciError`]; no partial table is produced.
    pub fn load(&mut self) -> Result<PgciTable, PgciError> {
        let sector = self
            .reader
            .read_u32_field(0, VtsiOffset::SectorPointerVtsPgci)?;
        let table_base = u64::from(sector) * layout::LOGICAL_BLOCK_SIZE;
        let nb_program_chains = self
            .reader
            .read_u8_at(table_base + layout::NB_PROGRAM_CHAINS_OFFSET)?;
        debug!(sector, table_base, nb_program_chains, "resolved VTS_PGCI table");

        let mut program_chains = Vec::with_capacity(usize::from(nb_program_chains));
        for index in 1..=u64::from(nb_program_chains) {
            let chain_offset = self.reader.read_u32_at(
                table_base + layout::DIRECTORY_ENTRY_SIZE * index + layout::DIRECTORY_CHAIN_OFFSET,
            )?;
            let chain_base = table_base + u64::from(chain_offset);
            debug!(index, chain_offset, chain_base, "decoding program chain");
            program_chains.push(self.load_chain(chain_base)?);
        }

        Ok(PgciTable {
            nb_program_chains,
            program_chains,
        })
    }

    fn load_chain(&mut self, base: u64) -> Result<ProgramChain, PgciError> {
        let nb_program = self.reader.read_u8_field(base, PgcOffset::NbPrograms)?;
        let duration = self
            .reader
            .read_playback_time_at(PgcOffset::PlaybackTime.at(base))?;
        let program_map_offset = self
            .reader
            .read_u16_field(base, PgcOffset::ProgramMapOffset)?;
        let cell_table_offset = self
            .reader
            .read_u16_field(base, PgcOffset::CellPlaybackInfoTableOffset)?;
        let program_map = base + u64::from(program_map_offset);
        let cell_table = base + u64::from(cell_table_offset);

        let mut programs = Vec::with_capacity(usize::from(nb_program));
        let mut playback_times = Vec::new();
        for program in 0..u64::from(nb_program) {
            let entry_cell = self.reader.read_u8_at(program_map + program)?;
            let exit_cell = if program + 1 < u64::from(nb_program) {
                self.reader
                    .read_u8_at(program_map + program + 1)?
                    .saturating_sub(1)
            } else {
                entry_cell
            };
            let cells = ProgramCells {
                entry_cell,
                exit_cell,
            };
            trace!(program, entry_cell, exit_cell, "program cell range");

            for cell in cells.cells() {
                playback_times.push(self.load_cell_time(cell_table, cell)?);
            }
            programs.push(cells);
        }

        Ok(ProgramChain {
            duration,
            nb_program,
            playback_times,
            programs,
        })
    }

    fn load_cell_time(&mut self, cell_table: u64, cell: u8) -> Result<PlaybackTime, PgciError> {
        // Cell 0 addresses the record just before the table.
        let relative = (i64::from(cell) - 1) * layout::CELL_PLAYBACK_INFO_SIZE as i64;
        let record = cell_table
            .checked_add_signed(relative)
            .ok_or(PgciError::CellRecordOutOfRange { cell, cell_table })?;
        let code = self.reader.read_cell_category_at(record)?;
        if code > 1 {
            return Err(PgciError::UnrecognizedCellType {
                code,
                cell,
                offset: record,
            });
        }
        let time = self
            .reader
            .read_playback_time_at(record + layout::CELL_PLAYBACK_TIME)?;
        trace!(cell, record, %time, "cell playback time");
        Ok(time)
    }
}

/// Decode the VTS_PGCI table from an open IFO source.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use dvdpgc_core::load_vts_pgci;
///
/// // Sector pointer -> sector 1, empty directory.
/// let mut ifo = vec![0u8; 0x800 + 8];
/// ifo[0xCC..0xD0].copy_from_slice(&1u32.to_be_bytes());
/// let table = load_vts_pgci(&mut Cursor::new(ifo))?;
/// assert!(table.program_chains.is_empty());
/// # Ok::<(), dvdpgc_core::PgciError>(())
/// ```
pub fn load_vts_pgci<R: Read + Seek>(source: &mut R) -> Result<PgciTable, PgciError> {
    PgciDecoder::new(source).load()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{PgciDecoder, ProgramCells, load_vts_pgci};
    use crate::pgci::error::PgciError;
    use crate::pgci::time::{FrameRate, PlaybackTime};

    const CHAIN_OFFSET: usize = 0x10;
    const PROGRAM_MAP: usize = 0xEC;
    const CELL_TABLE: usize = 0xF0;

    /// Sector 1, one chain with the given program map and cell records.
    fn single_chain_image(program_map: &[u8], cells: &[[u8; 8]]) -> Vec<u8> {
        let base = 0x800;
        let chain = base + CHAIN_OFFSET;
        let mut ifo = vec![0u8; chain + CELL_TABLE + cells.len() * 0x18];
        ifo[0xCC..0xD0].copy_from_slice(&1u32.to_be_bytes());
        ifo[base + 1] = 1;
        ifo[base + 12..base + 16].copy_from_slice(&(CHAIN_OFFSET as u32).to_be_bytes());

        ifo[chain + 2] = program_map.len() as u8;
        ifo[chain + 4..chain + 8].copy_from_slice(&[0x00, 0x10, 0x00, 0x40]);
        ifo[chain + 0xE6..chain + 0xE8].copy_from_slice(&(PROGRAM_MAP as u16).to_be_bytes());
        ifo[chain + 0xE8..chain + 0xEA].copy_from_slice(&(CELL_TABLE as u16).to_be_bytes());
        ifo[chain + PROGRAM_MAP..chain + PROGRAM_MAP + program_map.len()]
            .copy_from_slice(program_map);
        for (i, cell) in cells.iter().enumerate() {
            let record = chain + CELL_TABLE + i * 0x18;
            ifo[record..record + 8].copy_from_slice(cell);
        }
        ifo
    }

    fn cell(category: u8, time: [u8; 4]) -> [u8; 8] {
        [category << 6, 0, 0, 0, time[0], time[1], time[2], time[3]]
    }

    #[test]
    fn decodes_single_cell_chain() {
        let ifo = single_chain_image(&[1], &[cell(0, [0x01, 0x02, 0x03, 0x40])]);
        let table = load_vts_pgci(&mut Cursor::new(ifo)).unwrap();

        assert_eq!(table.nb_program_chains, 1);
        let chain = &table.program_chains[0];
        assert_eq!(chain.nb_program, 1);
        assert_eq!(chain.duration.minutes, 10);
        assert_eq!(
            chain.playback_times,
            vec![PlaybackTime {
                fps: FrameRate::Pal,
                hours: 1,
                minutes: 2,
                seconds: 3,
                frames: 0,
            }]
        );
    }

    #[test]
    fn program_owns_cells_until_next_entry() {
        let cells = [
            cell(0, [0x00, 0x00, 0x01, 0x40]),
            cell(1, [0x00, 0x00, 0x02, 0x40]),
            cell(0, [0x00, 0x00, 0x03, 0x40]),
        ];
        let ifo = single_chain_image(&[1, 3], &cells);
        let chain = PgciDecoder::new(Cursor::new(ifo))
            .load()
            .unwrap()
            .program_chains
            .remove(0);

        assert_eq!(
            chain.programs,
            vec![
                ProgramCells {
                    entry_cell: 1,
                    exit_cell: 2
                },
                ProgramCells {
                    entry_cell: 3,
                    exit_cell: 3
                },
            ]
        );
        let seconds: Vec<u8> = chain.playback_times.iter().map(|t| t.seconds).collect();
        assert_eq!(seconds, vec![1, 2, 3]);
    }

    #[test]
    fn last_program_reads_only_its_entry_cell() {
        let cells = [
            cell(0, [0x00, 0x00, 0x01, 0x40]),
            cell(0, [0x00, 0x00, 0x02, 0x40]),
        ];
        let ifo = single_chain_image(&[1], &cells);
        let table = load_vts_pgci(&mut Cursor::new(ifo)).unwrap();
        assert_eq!(table.program_chains[0].playback_times.len(), 1);
    }

    #[test]
    fn unrecognized_cell_type_aborts() {
        for category in [2, 3] {
            let ifo = single_chain_image(&[1], &[cell(category, [0x00, 0x00, 0x01, 0x40])]);
            let err = load_vts_pgci(&mut Cursor::new(ifo)).unwrap_err();
            assert!(
                matches!(err, PgciError::UnrecognizedCellType { code, cell: 1, .. } if code == category)
            );
        }
    }

    #[test]
    fn cell_zero_reads_record_before_table() {
        let mut ifo = single_chain_image(&[0], &[]);
        let record = 0x800 + CHAIN_OFFSET + CELL_TABLE - 0x18;
        ifo[record + 4..record + 8].copy_from_slice(&[0x00, 0x00, 0x09, 0x40]);

        let table = load_vts_pgci(&mut Cursor::new(ifo)).unwrap();
        let chain = &table.program_chains[0];
        assert_eq!(chain.nb_program, 1);
        assert_eq!(
            chain.programs,
            vec![ProgramCells {
                entry_cell: 0,
                exit_cell: 0
            }]
        );
        assert_eq!(chain.playback_times.len(), 1);
        assert_eq!(chain.playback_times[0].seconds, 9);
    }

    #[test]
    fn cell_zero_before_start_of_file_is_rejected() {
        // Table at sector 0 with its only chain at offset 0.
        let mut ifo = vec![0u8; 0x110];
        ifo[1] = 1;
        ifo[2] = 1;
        ifo[4..8].copy_from_slice(&[0x00, 0x00, 0x01, 0x40]);
        ifo[0xE6..0xE8].copy_from_slice(&0x100u16.to_be_bytes());
        ifo[0xE8..0xEA].copy_from_slice(&0x10u16.to_be_bytes());

        let err = load_vts_pgci(&mut Cursor::new(ifo)).unwrap_err();
        assert!(matches!(
            err,
            PgciError::CellRecordOutOfRange {
                cell: 0,
                cell_table: 0x10
            }
        ));
    }

    #[test]
    fn missing_sector_pointer_is_truncated() {
        let err = load_vts_pgci(&mut Cursor::new(vec![0u8; 0xCE])).unwrap_err();
        assert!(matches!(
            err,
            PgciError::TruncatedRead {
                offset: 0xCC,
                width: 4
            }
        ));
    }

    #[test]
    fn cell_count_includes_cell_zero() {
        let cells = ProgramCells {
            entry_cell: 0,
            exit_cell: 2,
        };
        assert_eq!(cells.cell_count(), 3);
        let empty = ProgramCells {
            entry_cell: 4,
            exit_cell: 3,
        };
        assert_eq!(empty.cell_count(), 0);
    }
}
