//! Chapter timelines derived from decoded program chains.
//!
//! A chapter is a program; its start is the summed duration of every cell
//! that belongs to the programs before it.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pgci::ProgramChain;

/// Chapter start entry.
///
/// # Examples
/// ```
/// use dvdpgc_core::Chapter;
///
/// let chapter = Chapter {
///     number: 1,
///     start: "00:00:00.000".to_string(),
///     start_ms: 0,
/// };
/// assert_eq!(chapter.number, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based chapter (program) number.
    pub number: usize,
    /// Start offset formatted as `HH:MM:SS.mmm`.
    pub start: String,
    /// Start offset in milliseconds.
    pub start_ms: u64,
}

impl ProgramChain {
    /// Sum of all decoded cell durations.
    pub fn cells_duration(&self) -> Duration {
        self.playback_times.iter().map(|t| t.to_duration()).sum()
    }

    /// Start offset of each program, relative to the start of the chain.
    pub fn chapter_starts(&self) -> Vec<Duration> {
        let mut starts = Vec::with_capacity(self.programs.len());
        let mut elapsed = Duration::ZERO;
        let mut times = self.playback_times.iter();
        for program in &self.programs {
            starts.push(elapsed);
            for time in times.by_ref().take(program.cell_count()) {
                elapsed += time.to_duration();
            }
        }
        starts
    }

    pub fn chapters(&self) -> Vec<Chapter> {
        self.chapter_starts()
            .into_iter()
            .enumerate()
            .map(|(index, start)| Chapter {
                number: index + 1,
                start: format_timestamp(start),
                start_ms: whole_millis(start),
            })
            .collect()
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Format a duration as `HH:MM:SS.mmm`; sub-millisecond precision is truncated.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use dvdpgc_core::format_timestamp;
///
/// assert_eq!(format_timestamp(Duration::from_millis(3_723_040)), "01:02:03.040");
/// ```
pub fn format_timestamp(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        duration.subsec_millis()
    )
}

/// Render the chapters of a chain in OGM chapter format.
pub fn ogm_chapters(chain: &ProgramChain) -> String {
    let mut out = String::new();
    for chapter in chain.chapters() {
        let _ = writeln!(out, "CHAPTER{:02}={}", chapter.number, chapter.start);
        let _ = writeln!(
            out,
            "CHAPTER{:02}NAME=Chapter {:02}",
            chapter.number, chapter.number
        );
    }
    out
}
