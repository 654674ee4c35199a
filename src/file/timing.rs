use crate::{
    HeaderError,
    reader::{ReadResult, Reader, inv_data},
};

/// The header division type.
///
/// Delta-times in every track are interpreted through this: either as ticks
/// per quarter note (musical time, the common case) or as SMPTE frames per
/// second with a tick subdivision per frame (absolute time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta-times count ticks of a quarter note
    TicksPerQuarterNote(u16),
    /// Delta-times count subdivisions of an SMPTE frame
    Smpte(SmpteTiming),
}

impl Timing {
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let bytes: [u8; 2] = reader.read_exact_size()?;
        match bytes[0] >> 7 {
            0 => Ok(Self::TicksPerQuarterNote(u16::from_be_bytes(bytes) & 0x7FFF)),
            _ => {
                // Bits 14 through 8 are one of the negated frame rates
                let byte = bytes[0] as i8;
                let fps = match byte {
                    -24 => SmpteFps::TwentyFour,
                    -25 => SmpteFps::TwentyFive,
                    -29 => SmpteFps::TwentyNine,
                    -30 => SmpteFps::Thirty,
                    _ => return Err(inv_data(reader, HeaderError::InvalidSmpteFps(byte))),
                };
                Ok(Self::Smpte(SmpteTiming {
                    fps,
                    ticks_per_frame: bytes[1],
                }))
            }
        }
    }

    /// Returns Some if the file's delta-times are defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }
}

/// The SMPTE form of the division word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteTiming {
    /// Frames per second
    pub fps: SmpteFps,
    /// Delta-time ticks within one frame
    pub ticks_per_frame: u8,
}

/// The possible FPS (frames per second) for SMPTE-timed files and offsets.
///
/// The MIDI specification defines only four frame rates. `TwentyNine` is the
/// NTSC drop-frame rate, 30000/1001 fps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second, the film standard
    TwentyFour,
    /// 25 frames per second, PAL/SECAM
    TwentyFive,
    /// 29.97 frames per second, NTSC drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The nominal integer rate used in division arithmetic.
    ///
    /// Drop-frame 29.97 returns 30 here; MIDI uses the nominal rate.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }

    /// The precise rate, including the fractional drop-frame value.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;

#[test]
fn tpqn_division() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x01, 0xE0]);
    let timing = Timing::read(&mut reader).unwrap();
    assert_eq!(timing, Timing::TicksPerQuarterNote(480));
    assert_eq!(timing.ticks_per_quarter_note(), Some(480));
}

#[test]
fn smpte_division() {
    use pretty_assertions::assert_eq;
    // -25 fps, 40 ticks per frame
    let mut reader = Reader::from_byte_slice(&[0xE7, 0x28]);
    let timing = Timing::read(&mut reader).unwrap();
    assert_eq!(
        timing,
        Timing::Smpte(SmpteTiming {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40,
        })
    );
    assert_eq!(timing.ticks_per_quarter_note(), None);
}

#[test]
fn smpte_division_bad_rate() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x28]);
    assert!(Timing::read(&mut reader).is_err());
}
