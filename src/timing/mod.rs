#![doc = r#"
Tick based timing: the file division and the tempo map
"#]

mod smpte;
pub use smpte::*;

mod tempo;
pub use tempo::*;

use crate::{ContainerError, ContainerResult};

/// Tempo of a sequence that never sets one: 120 BPM.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// The time division of a sequence.
///
/// This is either the number of ticks per quarter note or
/// an SMPTE frame rate with a tick count per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// Ticks are musical; their length follows the tempo map
    TicksPerQuarterNote(u16),
    /// Ticks are a fixed fraction of a video frame
    Smpte {
        /// Frame rate
        fps: SmpteFps,
        /// Ticks per frame
        ticks_per_frame: u8,
    },
}

impl Division {
    /// Decode a division word as found in a file header.
    pub fn from_raw(raw: u16) -> ContainerResult<Self> {
        if raw & 0x8000 == 0 {
            if raw == 0 {
                return Err(ContainerError::InvalidDivision(raw));
            }
            return Ok(Self::TicksPerQuarterNote(raw));
        }
        let [high, low] = raw.to_be_bytes();
        match SmpteFps::from_division_byte(high) {
            Some(fps) if low != 0 => Ok(Self::Smpte {
                fps,
                ticks_per_frame: low,
            }),
            _ => Err(ContainerError::InvalidDivision(raw)),
        }
    }

    /// Encode as a division word.
    pub const fn raw(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn & 0x7FFF,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => u16::from_be_bytes([fps.division_byte(), *ticks_per_frame]),
        }
    }

    /// Returns Some if the ticks are musical.
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }
}

/// Integer division rounding halves up.
pub(crate) const fn div_round(numerator: u128, denominator: u128) -> u128 {
    (numerator + denominator / 2) / denominator
}

#[test]
fn raw_division_round_trips() {
    assert_eq!(Division::from_raw(480), Ok(Division::TicksPerQuarterNote(480)));
    let smpte = Division::from_raw(0xE728).unwrap();
    assert_eq!(
        smpte,
        Division::Smpte {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40
        }
    );
    assert_eq!(smpte.raw(), 0xE728);
    assert_eq!(Division::from_raw(0), Err(ContainerError::InvalidDivision(0)));
    assert_eq!(
        Division::from_raw(0xE028),
        Err(ContainerError::InvalidDivision(0xE028))
    );
}
