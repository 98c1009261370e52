use crate::{SubsongId, TrackId};
use thiserror::Error;

#[doc = r#"
Contract violations surfaced by the [`Container`](crate::Container) and its parts.

Expected absence (a metadata item that isn't there, a sequence without a loop)
is never an error; those lookups return [`Option`] instead.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The container was mutated before [`Container::initialize`](crate::Container::initialize).
    #[error("Container used before initialization")]
    NotInitialized,
    /// Only formats 0, 1 and 2 exist.
    #[error("Invalid file format {0}")]
    InvalidFormat(u16),
    /// Ticks per quarter note of zero, or an SMPTE rate other than 24, 25, 29.97 and 30.
    #[error("Invalid time division {0:#06X}")]
    InvalidDivision(u16),
    /// The track handle does not name a track of this container.
    #[error("No track at {0}")]
    InvalidTrack(TrackId),
    /// The subsong handle does not name a subsong of this container.
    #[error("No subsong at {0}")]
    InvalidSubsong(SubsongId),
    /// A tempo entry was added before an entry already in the map.
    #[error("Tempo change at tick {timestamp} precedes the last change at tick {last}")]
    TempoOutOfOrder {
        /// The rejected timestamp
        timestamp: u32,
        /// The timestamp of the last entry in the map
        last: u32,
    },
    /// Variable length quantities hold at most 28 bits.
    #[error("Value {0:#X} does not fit a variable length quantity")]
    VlqOverflow(u32),
    /// Events of a track went back in time.
    #[error("Event at tick {timestamp} in {track} follows an event at tick {previous}")]
    EventsOutOfOrder {
        /// The offending track
        track: TrackId,
        /// Timestamp of the offending event
        timestamp: u32,
        /// Timestamp of the event before it
        previous: u32,
    },
    /// An SMF header can only count 65535 tracks.
    #[error("{0} tracks do not fit a file header")]
    TooManyTracks(usize),
    /// An extended event has no status byte, or a meta event has no type.
    #[error("Malformed event {index} in {track}")]
    MalformedEvent {
        /// The track holding the event
        track: TrackId,
        /// Position of the event in the track
        index: usize,
    },
}

/// The result type of fallible container operations (see [`ContainerError`]).
pub type ContainerResult<T> = Result<T, ContainerError>;
