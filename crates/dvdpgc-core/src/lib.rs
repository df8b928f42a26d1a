//! dvdpgc core library for DVD-Video program chain decoding.
//!
//! This crate decodes the VTS_PGCI table of a Video Title Set IFO file into
//! chapter and cell playback times, without touching any audio or video
//! payload. A byte source (`source`) feeds the PGCI decoder (`pgci`, split
//! into layout/reader/parser), and `chapters` turns the decoded tree into
//! chapter timelines. The library opens no files; callers hand it an open
//! seekable stream.
//!
//! Invariants:
//! - A decode either returns the complete table or an error, never a partial
//!   result.
//! - Chain order matches the on-disc directory order.
//! - Playback times keep the exact frame rate (25 or 30000/1001).
//!
//! # Examples
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use dvdpgc_core::{load_vts_pgci, ogm_chapters};
//!
//! let mut ifo = BufReader::new(File::open("VIDEO_TS/VTS_01_0.IFO")?);
//! let table = load_vts_pgci(&mut ifo)?;
//! print!("{}", ogm_chapters(&table.program_chains[0]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod chapters;
pub mod pgci;
pub mod source;

pub use chapters::{Chapter, format_timestamp, ogm_chapters};
pub use pgci::{
    FrameRate, PgciDecoder, PgciError, PgciTable, PlaybackTime, ProgramCells, ProgramChain,
    load_vts_pgci,
};
pub use source::{ByteCursor, ReadError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Versioned PGCI report, as written by the command-line tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input IFO metadata.
    pub input: InputInfo,
    /// Decoded program chain information.
    pub pgci: PgciTable,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use dvdpgc_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "dvdpgc".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "dvdpgc");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Build a report around a decoded table.
///
/// # Examples
/// ```
/// use dvdpgc_core::{PgciTable, make_report};
///
/// let table = PgciTable {
///     nb_program_chains: 0,
///     program_chains: Vec::new(),
/// };
/// let report = make_report("VTS_01_0.IFO", 4096, "1970-01-01T00:00:00Z", table);
/// assert_eq!(report.report_version, dvdpgc_core::REPORT_VERSION);
/// ```
pub fn make_report(
    input_path: &str,
    input_bytes: u64,
    generated_at: &str,
    pgci: PgciTable,
) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "dvdpgc".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: generated_at.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        pgci,
    }
}
