use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::PgciError;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Frame rate of a playback time, kept as an exact rational.
///
/// # Examples
/// ```
/// use dvdpgc_core::FrameRate;
///
/// let ntsc = FrameRate::from_code(0x03).unwrap();
/// assert_eq!((ntsc.numerator(), ntsc.denominator()), (30000, 1001));
/// assert_eq!(ntsc.to_string(), "30000/1001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameRate {
    /// 25 frames per second.
    Pal,
    /// 30000/1001 frames per second.
    Ntsc,
}

impl FrameRate {
    /// Map the 2-bit rate code of a playback time to a frame rate.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(FrameRate::Pal),
            0x03 => Some(FrameRate::Ntsc),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FrameRate::Pal => 0x01,
            FrameRate::Ntsc => 0x03,
        }
    }

    pub fn numerator(self) -> u64 {
        match self {
            FrameRate::Pal => 25,
            FrameRate::Ntsc => 30000,
        }
    }

    pub fn denominator(self) -> u64 {
        match self {
            FrameRate::Pal => 1,
            FrameRate::Ntsc => 1001,
        }
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator() == 1 {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

impl FromStr for FrameRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "25" | "25/1" => Ok(FrameRate::Pal),
            "30000/1001" => Ok(FrameRate::Ntsc),
            other => Err(format!("unsupported frame rate '{other}'")),
        }
    }
}

impl TryFrom<String> for FrameRate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameRate> for String {
    fn from(value: FrameRate) -> Self {
        value.to_string()
    }
}

/// A decoded playback time (hours, minutes, seconds and frames).
///
/// Fields are taken from BCD as-is; a malformed disc can yield values
/// such as `seconds = 75`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackTime {
    pub fps: FrameRate,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

impl PlaybackTime {
    /// Decode a packed 4-byte playback time.
    ///
    /// Bytes 0..3 carry hours, minutes and seconds in BCD. In byte 3 the top
    /// two bits are the rate code and the low six bits the BCD frame count.
    /// The frame flag (bit 6) is the low bit of the rate code, so both
    /// checks look at the same bit; they are decoded independently as the
    /// format describes them. Rate is checked first.
    ///
    /// # Examples
    /// ```
    /// use dvdpgc_core::{FrameRate, PlaybackTime};
    ///
    /// let time = PlaybackTime::decode([0x01, 0x02, 0x03, 0xC0])?;
    /// assert_eq!(time.fps, FrameRate::Ntsc);
    /// assert_eq!((time.hours, time.minutes, time.seconds, time.frames), (1, 2, 3, 0));
    /// # Ok::<(), dvdpgc_core::PgciError>(())
    /// ```
    ///
    /// # Errors
    /// [`PgciError::UnknownFrameRate`] for an unrecognized rate code and
    /// [`PgciError::InvalidFrameFlag`] when the frame flag is clear.
    pub fn decode(bytes: [u8; 4]) -> Result<Self, PgciError> {
        let code = bytes[3] >> 6;
        let fps = FrameRate::from_code(code).ok_or(PgciError::UnknownFrameRate { code })?;
        let frames = decode_frames(bytes[3])?;

        Ok(Self {
            fps,
            hours: bcd_to_int(bytes[0]),
            minutes: bcd_to_int(bytes[1]),
            seconds: bcd_to_int(bytes[2]),
            frames,
        })
    }

    /// Whole seconds, ignoring frames.
    pub fn whole_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Duration of this playback time; frames are converted with the exact rate.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use dvdpgc_core::PlaybackTime;
    ///
    /// let time = PlaybackTime::decode([0x00, 0x00, 0x01, 0x40 | 0x10])?;
    /// assert_eq!(time.to_duration(), Duration::from_millis(1400));
    /// # Ok::<(), dvdpgc_core::PgciError>(())
    /// ```
    pub fn to_duration(&self) -> Duration {
        let frame_nanos = u64::from(self.frames) * NANOS_PER_SECOND * self.fps.denominator()
            / self.fps.numerator();
        Duration::from_secs(self.whole_seconds()) + Duration::from_nanos(frame_nanos)
    }
}

impl fmt::Display for PlaybackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

fn decode_frames(byte: u8) -> Result<u8, PgciError> {
    if (byte >> 6) & 0x01 != 1 {
        return Err(PgciError::InvalidFrameFlag { byte });
    }
    Ok(bcd_to_int(byte & 0x3F))
}

/// Decode one packed BCD byte. Nibbles above 9 are not rejected.
pub fn bcd_to_int(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}
