#![doc = r#"
Serialization to a player stream

A stream is the subsong flattened into one list of packed 32-bit messages
stamped in milliseconds, ready to be fed to a synthesizer:

```text
bits 31..24  status byte (0xF0: system exclusive reference)
bits 23..16  first data byte
bits 15..8   second data byte
bits  7..0   port index
```

A system exclusive reference carries the index of its payload in the
stream's [`SysExTable`] in bits 23..0. Meta events are not part of the
stream; port and device name events only steer the port of later events.
"#]

use super::{Container, Routing, resolve_port_number};
use crate::{
    ContainerResult, PortId, SubsongId, SysExTable, TimeUnit,
    event::{Event, EventKind, MetaKind, controller},
};
use alloc::vec::Vec;
use core::ops::BitOr;

/// Status byte marking a system exclusive reference.
pub const SYSEX_REFERENCE: u8 = 0xF0;

/// Largest system exclusive index a stream message can carry.
const MAX_SYSEX_INDEX: usize = 0x00FF_FFFF;

/// Events to drop while streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CleanFlags(u32);

impl CleanFlags {
    /// Keep everything.
    pub const NONE: Self = Self(0);
    /// Drop EMIDI and AIL controllers (CC 110 to 119) and skip tracks reserved
    /// to other EMIDI devices (CC 110 other than 0, 1 or 127).
    pub const EMIDI: Self = Self(1);
    /// Drop program changes.
    pub const INSTRUMENTS: Self = Self(2);
    /// Drop bank selects.
    pub const BANKS: Self = Self(4);

    /// The raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// True if every flag of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CleanFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// One packed stream message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamEvent {
    /// Position in milliseconds
    pub timestamp: u32,
    /// The packed message
    pub data: u32,
}

impl StreamEvent {
    /// Pack a short message.
    pub const fn new(timestamp: u32, status: u8, data1: u8, data2: u8, port: PortId) -> Self {
        Self {
            timestamp,
            data: (status as u32) << 24 | (data1 as u32) << 16 | (data2 as u32) << 8 | port.0 as u32,
        }
    }

    /// The status byte.
    pub const fn status(&self) -> u8 {
        (self.data >> 24) as u8
    }

    /// The first data byte.
    pub const fn data1(&self) -> u8 {
        (self.data >> 16) as u8
    }

    /// The second data byte.
    pub const fn data2(&self) -> u8 {
        (self.data >> 8) as u8
    }

    /// The port of a short message.
    pub const fn port(&self) -> PortId {
        PortId(self.data as u8)
    }

    /// The payload index of a system exclusive reference.
    pub const fn sysex_index(&self) -> Option<usize> {
        if self.status() == SYSEX_REFERENCE {
            Some((self.data & 0x00FF_FFFF) as usize)
        } else {
            None
        }
    }
}

/// A subsong ready for playback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiStream {
    /// Messages in playback order
    pub events: Vec<StreamEvent>,
    /// Payloads referenced by system exclusive messages
    pub sysex: SysExTable,
    /// Loop start in milliseconds
    pub loop_begin: Option<u32>,
    /// Loop end in milliseconds
    pub loop_end: Option<u32>,
}

impl Container {
    #[doc = r#"
Flatten a subsong into a [`MidiStream`].

Tracks are merged by timestamp; on equal timestamps the lower track goes
first. In format 2 only the subsong's own track is streamed. Incomplete
system exclusive messages (not ending in `F7`) are dropped.
"#]
    pub fn serialize_as_stream(
        &self,
        subsong: SubsongId,
        clean: CleanFlags,
    ) -> ContainerResult<MidiStream> {
        let state = self.subsong_state(subsong)?;

        let selected: Vec<usize> = (0..self.tracks.len())
            .filter(|&index| self.format != 2 || index == subsong.0)
            .filter(|&index| {
                !(clean.contains(CleanFlags::EMIDI) && is_foreign_emidi_track(&self.tracks[index]))
            })
            .collect();

        let mut positions = alloc::vec![0usize; selected.len()];
        let mut routing = alloc::vec![Routing::default(); selected.len()];
        let mut stream = MidiStream::default();

        loop {
            let mut next: Option<(usize, u32)> = None;
            for (slot, &track) in selected.iter().enumerate() {
                if let Some(event) = self.tracks[track].events().get(positions[slot]) {
                    if next.is_none_or(|(_, timestamp)| event.timestamp < timestamp) {
                        next = Some((slot, event.timestamp));
                    }
                }
            }
            let Some((slot, _)) = next else {
                break;
            };
            let event = &self.tracks[selected[slot]][positions[slot]];
            positions[slot] += 1;

            if is_cleaned(event, clean) {
                continue;
            }
            let timestamp = state.tempo_map.timestamp_to_ms(event.timestamp, self.division);
            self.stream_event(event, timestamp, &mut routing[slot], &mut stream);
        }

        stream.loop_begin = self.loop_begin(subsong, TimeUnit::Milliseconds)?;
        stream.loop_end = self.loop_end(subsong, TimeUnit::Milliseconds)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            subsong = subsong.0,
            events = stream.events.len(),
            sysex = stream.sysex.len(),
            "serialized stream"
        );

        Ok(stream)
    }

    fn stream_event(&self, event: &Event, timestamp: u32, routing: &mut Routing, stream: &mut MidiStream) {
        if event.kind != EventKind::Extended {
            if let Some(device) = routing.device_name.take() {
                let names = self.device_names(event.channel);
                let index = names.iter().position(|name| *name == device).unwrap_or(names.len());
                routing.port = resolve_port_number(&self.port_numbers, super::device_port(index)).0;
            }
            let status = u8::from(event.kind) | (event.channel & 0x0F);
            let data1 = event.data.first().copied().unwrap_or(0);
            let data2 = event.data.get(1).copied().unwrap_or(0);
            stream
                .events
                .push(StreamEvent::new(timestamp, status, data1, data2, PortId(routing.port)));
            return;
        }

        match event.data.as_slice() {
            [0xFF, ..] => {
                if let Some(device) = super::device_name_of(event) {
                    routing.device_name = Some(device);
                } else if event.is_meta(MetaKind::MidiPort) {
                    if let Some(&port) = event.meta_payload().first() {
                        routing.port = resolve_port_number(&self.port_numbers, port).0;
                        routing.device_name = None;
                    }
                }
            }
            [0xF0, .., 0xF7] => {
                let index = stream.sysex.add_item(&event.data, PortId(routing.port));
                if index > MAX_SYSEX_INDEX {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(index, "system exclusive table full, message dropped");
                    return;
                }
                stream.events.push(StreamEvent {
                    timestamp,
                    data: (SYSEX_REFERENCE as u32) << 24 | index as u32,
                });
            }
            [0xF0, ..] | [0xF7, ..] => {
                #[cfg(feature = "tracing")]
                tracing::warn!(timestamp, "incomplete system exclusive message dropped");
            }
            [status @ 0xF1..=0xFE, rest @ ..] => {
                let data1 = rest.first().copied().unwrap_or(0);
                let data2 = rest.get(1).copied().unwrap_or(0);
                stream
                    .events
                    .push(StreamEvent::new(timestamp, *status, data1, data2, PortId(routing.port)));
            }
            _ => {}
        }
    }
}

/// A track designated to some EMIDI device other than General MIDI.
fn is_foreign_emidi_track(track: &crate::Track) -> bool {
    track.iter().any(|event| {
        matches!(
            event.controller(),
            Some((controller::EMIDI_TRACK_DESIGNATION, value)) if !matches!(value, 0 | 1 | 127)
        )
    })
}

fn is_cleaned(event: &Event, clean: CleanFlags) -> bool {
    if clean.contains(CleanFlags::INSTRUMENTS) && event.kind == EventKind::ProgramChange {
        return true;
    }
    if clean.contains(CleanFlags::EMIDI)
        && matches!(event.controller(), Some((controller::EMIDI_FIRST..=controller::EMIDI_LAST, _)))
    {
        return true;
    }
    clean.contains(CleanFlags::BANKS)
        && matches!(
            event.controller(),
            Some((controller::BANK_SELECT | controller::BANK_SELECT_LSB, _))
        )
}
