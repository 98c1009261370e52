#![doc = r#"
Timestamped MIDI messages as stored in a [`Track`](crate::Track)

# Layout

Channel voice events keep their status nibble in [`EventKind`], the channel
in [`Event::channel`] and the one or two parameter bytes in [`Event::data`].

Everything else is [`EventKind::Extended`]. Its first data byte is the
concrete status:

```text
FF tt payload...   meta event (no length field; the payload is the rest)
F0 ...  F7         system exclusive, framing bytes included
F1..FE ...         system common / real-time
```
"#]

mod status;
pub use status::*;

use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The kind of a stored event. Discriminants are the status nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EventKind {
    /// Note released
    NoteOff = 0x80,
    /// Note pressed
    NoteOn = 0x90,
    /// Per-key pressure
    PolyphonicAftertouch = 0xA0,
    /// Controller change
    ControlChange = 0xB0,
    /// Instrument change
    ProgramChange = 0xC0,
    /// Channel-wide pressure
    ChannelPressureAftertouch = 0xD0,
    /// Pitch wheel
    PitchBendChange = 0xE0,
    /// SysEx, meta, system common and real-time messages
    Extended = 0xF0,
}

impl EventKind {
    /// Classify a status byte. Data bytes (below `0x80`) yield `None`.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status & 0xF0).ok()
    }

    /// Number of parameter bytes a channel voice message of this kind carries.
    pub const fn parameter_count(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressureAftertouch => 1,
            Self::Extended => 0,
            _ => 2,
        }
    }
}

/// One timestamped MIDI message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Absolute position in ticks
    pub timestamp: u32,
    /// Message kind
    pub kind: EventKind,
    /// Channel (0-15). Unused for [`EventKind::Extended`].
    pub channel: u8,
    /// Parameters, or the whole message for [`EventKind::Extended`]
    pub data: Vec<u8>,
}

impl Event {
    /// Create an event from its raw parts.
    pub fn new(timestamp: u32, kind: EventKind, channel: u8, data: &[u8]) -> Self {
        Self {
            timestamp,
            kind,
            channel: channel & 0x0F,
            data: data.to_vec(),
        }
    }

    /// Create a channel voice event.
    pub fn channel(timestamp: u32, kind: EventKind, channel: u8, params: &[u8]) -> Self {
        Self::new(timestamp, kind, channel, params)
    }

    /// Create a meta event `FF kind payload`.
    pub fn meta(timestamp: u32, kind: MetaKind, payload: &[u8]) -> Self {
        let mut data = Vec::with_capacity(payload.len() + 2);
        data.push(StatusCode::MetaData.into());
        data.push(kind.into());
        data.extend_from_slice(payload);
        Self {
            timestamp,
            kind: EventKind::Extended,
            channel: 0,
            data,
        }
    }

    /// Create a system exclusive event. `bytes` includes the `F0` and `F7` framing.
    pub fn sysex(timestamp: u32, bytes: &[u8]) -> Self {
        Self::new(timestamp, EventKind::Extended, 0, bytes)
    }

    /// The status byte of a channel voice event, channel included.
    ///
    /// For extended events this is the first data byte, if any.
    pub fn status(&self) -> Option<u8> {
        match self.kind {
            EventKind::Extended => self.data.first().copied(),
            kind => Some(u8::from(kind) | self.channel),
        }
    }

    /// The concrete status of an extended event.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self.kind {
            EventKind::Extended => StatusCode::try_from(*self.data.first()?).ok(),
            kind => StatusCode::try_from(u8::from(kind)).ok(),
        }
    }

    /// The raw meta type byte, if this is a meta event.
    pub fn meta_type(&self) -> Option<u8> {
        match (self.kind, self.data.as_slice()) {
            (EventKind::Extended, [0xFF, kind, ..]) => Some(*kind),
            _ => None,
        }
    }

    /// The meta type, if this is a meta event of a known type.
    pub fn meta_kind(&self) -> Option<MetaKind> {
        MetaKind::try_from(self.meta_type()?).ok()
    }

    /// True for a meta event of the given type.
    pub fn is_meta(&self, kind: MetaKind) -> bool {
        self.meta_type() == Some(u8::from(kind))
    }

    /// The bytes following the meta type byte.
    pub fn meta_payload(&self) -> &[u8] {
        match self.meta_type() {
            Some(_) => &self.data[2..],
            None => &[],
        }
    }

    /// True for `FF 2F`.
    pub fn is_end_of_track(&self) -> bool {
        self.is_meta(MetaKind::EndOfTrack)
    }

    /// True for an extended event starting with `F0`.
    pub fn is_sysex(&self) -> bool {
        self.kind == EventKind::Extended && self.data.first() == Some(&0xF0)
    }

    /// Microseconds per quarter note carried by a well formed `FF 51` event.
    pub fn tempo(&self) -> Option<u32> {
        if !self.is_meta(MetaKind::SetTempo) {
            return None;
        }
        match self.meta_payload() {
            [a, b, c, ..] => Some((*a as u32) << 16 | (*b as u32) << 8 | *c as u32),
            _ => None,
        }
    }

    /// `(controller, value)` of a control change.
    pub fn controller(&self) -> Option<(u8, u8)> {
        match (self.kind, self.data.as_slice()) {
            (EventKind::ControlChange, [number, value, ..]) => Some((*number, *value)),
            _ => None,
        }
    }

    /// The program of a program change.
    pub fn program(&self) -> Option<u8> {
        match (self.kind, self.data.as_slice()) {
            (EventKind::ProgramChange, [program, ..]) => Some(*program),
            _ => None,
        }
    }

    /// True for Note On and Note Off.
    pub fn is_note(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn | EventKind::NoteOff)
    }

    /// True for a Note On with a non-zero velocity.
    pub fn is_sounding_note(&self) -> bool {
        self.kind == EventKind::NoteOn && self.data.get(1).is_some_and(|v| *v != 0)
    }

    /// True for program changes and bank selects.
    pub fn is_instrument_setup(&self) -> bool {
        match self.kind {
            EventKind::ProgramChange => true,
            EventKind::ControlChange => matches!(
                self.data.first(),
                Some(&controller::BANK_SELECT) | Some(&controller::BANK_SELECT_LSB)
            ),
            _ => false,
        }
    }
}

#[test]
fn meta_event_layout() {
    let event = Event::meta(10, MetaKind::SetTempo, &[0x07, 0xA1, 0x20]);
    assert_eq!(event.data, alloc::vec![0xFF, 0x51, 0x07, 0xA1, 0x20]);
    assert_eq!(event.meta_kind(), Some(MetaKind::SetTempo));
    assert_eq!(event.tempo(), Some(500_000));
    assert_eq!(event.status_code(), Some(StatusCode::MetaData));
}

#[test]
fn channel_event_status() {
    let event = Event::channel(0, EventKind::ControlChange, 3, &[7, 100]);
    assert_eq!(event.status(), Some(0xB3));
    assert_eq!(event.controller(), Some((7, 100)));
    assert_eq!(event.meta_type(), None);
    assert!(!event.is_instrument_setup());
    assert!(Event::channel(0, EventKind::ControlChange, 3, &[0x20, 1]).is_instrument_setup());
}

#[test]
fn status_classification() {
    assert_eq!(EventKind::from_status(0x9F), Some(EventKind::NoteOn));
    assert_eq!(EventKind::from_status(0xFF), Some(EventKind::Extended));
    assert_eq!(EventKind::from_status(0x40), None);
}
