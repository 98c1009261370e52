#![doc = r#"
An in-memory, canonical representation of a multi-track MIDI sequence.

A producer (an SMF, XMI or other format reader) fills a [`Container`]
track by track. The container keeps the derived timing state (one
[`TempoMap`] per subsong, channel masks, end timestamps), offers
transforms ([`Container::detect_loops`], [`Container::promote_to_type1`],
[`Container::split_by_instrument_changes`], [`Container::trim_start`])
and serializes either as a millisecond-stamped live stream for players
or as canonical Standard MIDI File bytes.

# Example
```rust
use midi_container::prelude::*;

let mut container = Container::new();
container.initialize(0, 480).unwrap();

let mut track = Track::new();
track.push(Event::meta(0, MetaKind::SetTempo, &[0x07, 0xA1, 0x20]));
track.push(Event::channel(0, EventKind::NoteOn, 0, &[60, 100]));
track.push(Event::channel(960, EventKind::NoteOff, 0, &[60, 0]));
container.add_track(track).unwrap();

let song = container.subsong(0).unwrap();
assert_eq!(container.duration(song, TimeUnit::Milliseconds), Ok(1000));

let bytes = container.serialize_as_smf(None).unwrap();
assert_eq!(&bytes[..4], b"MThd");
```
"#]
#![warn(missing_docs)]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
pub use error::*;

mod ids;
pub use ids::*;

pub mod event;

mod track;
pub use track::*;

pub mod timing;

mod sysex;
pub use sysex::*;

mod metadata;
pub use metadata::*;

mod range;
pub use range::*;

pub mod vlq;

mod container;
pub use container::*;

/// Commonly used types, gathered for glob import.
pub mod prelude {
    pub use crate::{
        container::*,
        error::*,
        event::{Event, EventKind, MetaKind, StatusCode, controller},
        ids::*,
        metadata::*,
        range::*,
        sysex::*,
        timing::{Division, SmpteFps, TempoItem, TempoMap},
        track::*,
    };
}
