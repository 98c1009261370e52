use super::{Container, Subsong};
use crate::{
    Track,
    event::{Event, EventKind, MetaKind, controller},
};
use alloc::{string::String, vec::Vec};
use core::{mem, ops::BitOr};

/// Compatibility tweaks for [`Container::apply_hacks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hacks(u32);

impl Hacks {
    /// No tweak.
    pub const NONE: Self = Self(0);
    /// Drop every channel event on channel 16.
    pub const STRIP_CHANNEL_16: Self = Self(1);
    /// Drop every channel event on channels 11 to 16.
    pub const STRIP_CHANNELS_11_TO_16: Self = Self(2);

    /// The raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// True if every tweak of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Hacks {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Names instrument segments for [`Container::split_by_instrument_changes`].
///
/// Implemented for closures taking `(bank_msb, bank_lsb, program)`.
pub trait InstrumentNamer {
    /// A display name for the instrument, if known.
    fn name(&mut self, bank_msb: u8, bank_lsb: u8, program: u8) -> Option<String>;
}

impl<F> InstrumentNamer for F
where
    F: FnMut(u8, u8, u8) -> Option<String>,
{
    fn name(&mut self, bank_msb: u8, bank_lsb: u8, program: u8) -> Option<String> {
        self(bank_msb, bank_lsb, program)
    }
}

/// An [`InstrumentNamer`] that names nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl InstrumentNamer for NoNames {
    fn name(&mut self, _: u8, _: u8, _: u8) -> Option<String> {
        None
    }
}

/// Bank and program selected on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Instrument {
    bank_msb: u8,
    bank_lsb: u8,
    program: Option<u8>,
}

impl Instrument {
    fn apply(&mut self, event: &Event) {
        if let Some(program) = event.program() {
            self.program = Some(program);
        }
        match event.controller() {
            Some((controller::BANK_SELECT, value)) => self.bank_msb = value,
            Some((controller::BANK_SELECT_LSB, value)) => self.bank_lsb = value,
            _ => {}
        }
    }
}

impl Container {
    #[doc = r#"
Rewrite a format 0 sequence as format 1.

Meta, system exclusive and other non-channel events move to a conductor
track, channel events to one track per channel in channel order. A
separate leading meter track, if present, is merged into the conductor.
Every new track ends with an End of Track at the old end position.

Anything but format 0 is left untouched.
"#]
    pub fn promote_to_type1(&mut self) {
        if self.format != 0 || self.tracks.is_empty() || self.tracks.len() > 2 {
            return;
        }
        let mut tracks = mem::take(&mut self.tracks);
        let data = tracks.pop().unwrap_or_default();
        let meter = tracks.pop().unwrap_or_default();

        let mut end = 0;
        let mut conductor: Vec<Event> = Vec::new();
        let mut channels: [Vec<Event>; 16] = Default::default();
        for event in meter.into_iter() {
            end = end.max(event.timestamp);
            if !event.is_end_of_track() {
                conductor.push(event);
            }
        }
        for event in data.into_iter() {
            end = end.max(event.timestamp);
            match event.kind {
                _ if event.is_end_of_track() => {}
                EventKind::Extended => conductor.push(event),
                _ => channels[event.channel as usize & 0x0F].push(event),
            }
        }
        conductor.sort_by_key(|event| event.timestamp);

        let end_of_track = || Event::meta(end, MetaKind::EndOfTrack, &[]);
        let mut promoted = Vec::with_capacity(17);
        conductor.push(end_of_track());
        promoted.push(Track::from(conductor));
        for mut events in channels.into_iter().filter(|events| !events.is_empty()) {
            events.push(end_of_track());
            promoted.push(Track::from(events));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(tracks = promoted.len(), "promoted to format 1");

        self.tracks = promoted;
        self.format = 1;
        self.refresh_track_state();
    }

    #[doc = r#"
Split every track where a channel switches instrument.

Bank selects and program changes are buffered until the next other event.
When the buffered group selects a new instrument (bank MSB, bank LSB and
program) on any channel after sounding content, the segment so far is
closed and a new one starts with the group. The namer is asked for the
new instrument's name; a name becomes a Track Name event after the group.

The container becomes format 2 with one subsong per segment, each sharing
the previous tempo map. Loops must be detected again. Format 2 input is
left untouched.
"#]
    pub fn split_by_instrument_changes<N>(&mut self, mut namer: N)
    where
        N: InstrumentNamer,
    {
        if self.format == 2 {
            return;
        }
        let mut segments: Vec<Track> = Vec::new();
        for track in mem::take(&mut self.tracks) {
            split_track(track, &mut namer, &mut segments);
        }

        let tempo_map = self
            .subsongs
            .first()
            .map(|subsong| subsong.tempo_map.clone())
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::debug!(segments = segments.len(), "split by instrument changes");

        self.subsongs = segments
            .iter()
            .map(|_| Subsong {
                tempo_map: tempo_map.clone(),
                ..Subsong::default()
            })
            .collect();
        self.tracks = segments;
        self.format = 2;
        self.refresh_track_state();
    }

    #[doc = r#"
Drop the silence before the first sounding note of each subsong.

Every event of the subsong moves back by the position of its first Note On
with a non-zero velocity. Events before it land at tick 0 in their original
order. Tempo changes before it collapse into the tempo in effect there, and
the loop range moves along.
"#]
    pub fn trim_start(&mut self) {
        if self.format == 2 {
            for slot in 0..self.tracks.len() {
                self.trim_slot(slot..slot + 1, slot);
            }
        } else {
            self.trim_slot(0..self.tracks.len(), 0);
        }
    }

    fn trim_slot(&mut self, tracks: core::ops::Range<usize>, slot: usize) {
        let first_note = self.tracks[tracks.clone()]
            .iter()
            .flat_map(Track::iter)
            .filter(|event| event.is_sounding_note())
            .map(|event| event.timestamp)
            .min();
        let Some(offset) = first_note.filter(|offset| *offset > 0) else {
            return;
        };
        for track in &mut self.tracks[tracks] {
            for event in track.events_mut() {
                event.timestamp = event.timestamp.saturating_sub(offset);
            }
        }
        if let Some(subsong) = self.subsongs.get_mut(slot) {
            subsong.tempo_map.trim(offset);
            subsong.end_timestamp = subsong.end_timestamp.saturating_sub(offset);
            subsong.loop_range = subsong
                .loop_range
                .and_then(|range| range.shifted_back(offset));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(slot, offset, "trimmed leading silence");
    }

    /// Apply compatibility tweaks.
    pub fn apply_hacks(&mut self, hacks: Hacks) {
        let strip_16 = hacks.contains(Hacks::STRIP_CHANNEL_16);
        let strip_11_to_16 = hacks.contains(Hacks::STRIP_CHANNELS_11_TO_16);
        if !strip_16 && !strip_11_to_16 {
            return;
        }
        for track in &mut self.tracks {
            track.retain(|event| {
                event.kind == EventKind::Extended
                    || !((strip_16 && event.channel == 15) || (strip_11_to_16 && event.channel >= 10))
            });
        }
        self.refresh_track_state();
    }
}

fn split_track<N: InstrumentNamer>(track: Track, namer: &mut N, segments: &mut Vec<Track>) {
    let mut current = [Instrument::default(); 16];
    let mut segment: Vec<Event> = Vec::new();
    let mut sounding = false;
    let mut group: Vec<Event> = Vec::new();

    let mut flush = |group: &mut Vec<Event>,
                     segment: &mut Vec<Event>,
                     sounding: &mut bool,
                     current: &mut [Instrument; 16]| {
        if group.is_empty() {
            return;
        }
        let mut next = *current;
        for event in group.iter() {
            next[event.channel as usize & 0x0F].apply(event);
        }
        let changed = (0..16).find(|&channel| {
            next[channel] != current[channel] && next[channel].program.is_some()
        });
        *current = next;

        let Some(channel) = changed else {
            segment.append(group);
            return;
        };
        if *sounding {
            segments.push(Track::from(mem::take(segment)));
            *sounding = false;
        }
        let timestamp = group.iter().map(|e| e.timestamp).max().unwrap_or(0);
        segment.append(group);
        let instrument = next[channel];
        if let Some(program) = instrument.program {
            if let Some(name) = namer.name(instrument.bank_msb, instrument.bank_lsb, program) {
                segment.push(Event::meta(timestamp, MetaKind::TrackName, name.as_bytes()));
            }
        }
    };

    for event in track {
        if event.is_instrument_setup() {
            group.push(event);
            continue;
        }
        flush(&mut group, &mut segment, &mut sounding, &mut current);
        sounding |= event.kind != EventKind::Extended;
        segment.push(event);
    }
    flush(&mut group, &mut segment, &mut sounding, &mut current);

    if !segment.is_empty() {
        segments.push(Track::from(segment));
    }
}
