//! VTS program chain information (VTS_PGCI) decoding.
//!
//! The table is reached through two levels of indirection: the VTSI header
//! holds the start sector of the table, and the table's directory holds the
//! start offset of each program chain relative to that sector. Chain bodies
//! are not contiguous and can only be found by following both levels.
//!
//! Module layout follows the other decoders of this crate:
//! - `layout`: byte offsets and record sizes (source of truth)
//! - `reader`: positioned field access and format conventions
//! - `parser`: domain-level decoding into [`PgciTable`]
//! - `time`: packed BCD playback times
//! - `error`: explicit, actionable errors
//!
//! Decoding is fail-fast: an unknown cell type or frame rate anywhere in the
//! table invalidates the whole result.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod time;

pub use error::PgciError;
pub use parser::{PgciDecoder, PgciTable, ProgramCells, ProgramChain, load_vts_pgci};
pub use time::{FrameRate, PlaybackTime};
