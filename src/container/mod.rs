#![doc = r#"
The [`Container`] and its operations

# Producer contract

1. Call [`Container::initialize`] once with the file format and division.
2. Append whole tracks with [`Container::add_track`], or events one by one
   with [`Container::add_event_to_track`], in non-decreasing timestamp order.

While events come in, the container derives its timing state from them:

- `FF 51` (Set Tempo) events feed the tempo map of the owning subsong.
  Tempo events may sit on any track; they are merged in tick order.
- `FF 21` (MIDI Port) and `FF 04`/`FF 09` (Instrument/Device name) events
  register ports in the port table.
- Note events mark their channel (offset by 16 per port) in the subsong's
  channel mask and push the subsong's end timestamp.

Tempo information that does not arrive as events can be given with
[`Container::add_tempo`].

# Subsongs

Formats 0 and 1 hold one subsong. Format 2 holds one subsong per track.
A subsong is playable once it carries a note.
"#]

mod loops;
pub use loops::*;

mod smf;

mod stream;
pub use stream::*;

mod transform;
pub use transform::*;

use crate::{
    ContainerError, ContainerResult, LoopRange, MetadataItem, MetadataSet, PortId, SubsongId,
    Track, TrackId,
    event::{Event, EventKind, MetaKind},
    timing::{Division, TempoMap},
};
use alloc::{format, string::String, vec::Vec};

/// How a position is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// File ticks
    Ticks,
    /// Milliseconds, through the subsong's tempo map
    Milliseconds,
}

/// Channel masks cover three ports of 16 channels.
const MASKED_CHANNELS: u32 = 48;

/// Per-performance state of one subsong slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Subsong {
    channel_mask: u64,
    tempo_map: TempoMap,
    end_timestamp: u32,
    loop_range: Option<LoopRange>,
}

/// Port routing of a track while its events are read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Routing {
    port: u8,
    device_name: Option<String>,
}

#[doc = r#"
A multi-track MIDI sequence.

Producers call [`Container::initialize`] once, then append tracks in
non-decreasing timestamp order. Tempo, port and channel usage are derived
from the appended events.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    initialized: bool,
    format: u16,
    division: Division,
    extra_percussion_channel: Option<u8>,

    tracks: Vec<Track>,
    routing: Vec<Routing>,
    subsongs: Vec<Subsong>,

    port_numbers: Vec<u8>,
    device_names: [Vec<String>; 16],

    extra_metadata: MetadataSet,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create an empty, uninitialized container.
    pub fn new() -> Self {
        Self {
            initialized: false,
            format: 0,
            division: Division::TicksPerQuarterNote(480),
            extra_percussion_channel: None,
            tracks: Vec::new(),
            routing: Vec::new(),
            subsongs: Vec::new(),
            port_numbers: Vec::new(),
            device_names: Default::default(),
            extra_metadata: MetadataSet::new(),
        }
    }

    /// Reset the container for a sequence of the given format (0, 1 or 2)
    /// and raw division word.
    pub fn initialize(&mut self, format: u16, division: u16) -> ContainerResult<()> {
        if format > 2 {
            return Err(ContainerError::InvalidFormat(format));
        }
        let division = Division::from_raw(division)?;
        *self = Self::new();
        self.initialized = true;
        self.format = format;
        self.division = division;
        if format != 2 {
            self.subsongs.push(Subsong::default());
        }
        Ok(())
    }

    /// Append a track and derive timing state from its events.
    pub fn add_track(&mut self, track: Track) -> ContainerResult<TrackId> {
        if !self.initialized {
            return Err(ContainerError::NotInitialized);
        }
        let id = TrackId(self.tracks.len());
        self.tracks.push(track);
        self.routing.push(Routing::default());
        if self.format == 2 {
            self.subsongs.push(Subsong::default());
        }
        let slot = self.slot_of(id);
        let Self {
            tracks,
            routing,
            subsongs,
            port_numbers,
            device_names,
            ..
        } = self;
        for event in tracks[id.0].events() {
            observe(
                event,
                &mut subsongs[slot],
                &mut routing[id.0],
                port_numbers,
                device_names,
                true,
            );
        }
        Ok(id)
    }

    /// Append an event to a track and derive timing state from it.
    pub fn add_event_to_track(&mut self, track: TrackId, event: Event) -> ContainerResult<()> {
        if !self.initialized {
            return Err(ContainerError::NotInitialized);
        }
        if track.0 >= self.tracks.len() {
            return Err(ContainerError::InvalidTrack(track));
        }
        let slot = self.slot_of(track);
        observe(
            &event,
            &mut self.subsongs[slot],
            &mut self.routing[track.0],
            &mut self.port_numbers,
            &mut self.device_names,
            true,
        );
        self.tracks[track.0].push(event);
        Ok(())
    }

    #[doc = r#"
Append every track of `source`.

Ports and device names referenced by the merged tracks are registered in
this container's tables. Timestamps are taken as they are: both containers
must already share a time base. Meant to combine a sequence with a
companion file supplying system exclusive dumps.
"#]
    pub fn merge_tracks(&mut self, source: &Container) -> ContainerResult<()> {
        for track in &source.tracks {
            self.add_track(track.clone())?;
        }
        Ok(())
    }

    #[doc = r#"
Truncate the track list, or pad it with empty tracks.

When tracks are dropped from a format 0 or 1 container, its tempo map is
rebuilt from the tempo events of the remaining tracks; changes given with
[`Container::add_tempo`] are discarded. In format 2 the dropped tracks take
their subsongs with them and the remaining tempo maps are kept.
"#]
    pub fn set_track_count(&mut self, count: usize) {
        let truncated = count < self.tracks.len();
        self.tracks.resize_with(count, Track::new);
        if self.format == 2 {
            self.subsongs.resize_with(count, Subsong::default);
        } else if truncated {
            for subsong in &mut self.subsongs {
                subsong.tempo_map = TempoMap::new();
            }
            let Self {
                tracks, subsongs, ..
            } = self;
            if let Some(subsong) = subsongs.first_mut() {
                for event in tracks.iter().flat_map(Track::iter) {
                    if let Some(tempo) = event.tempo() {
                        subsong.tempo_map.insert(tempo, event.timestamp);
                    }
                }
            }
        }
        self.refresh_track_state();
    }

    /// Replace the container level metadata.
    pub fn set_extra_metadata(&mut self, metadata: MetadataSet) {
        self.extra_metadata = metadata;
    }

    /// The container level metadata.
    pub fn extra_metadata(&self) -> &MetadataSet {
        &self.extra_metadata
    }

    /// Add a tempo change for a subsong that is not carried by an event.
    pub fn add_tempo(&mut self, subsong: SubsongId, tempo: u32, timestamp: u32) -> ContainerResult<()> {
        self.subsong_state_mut(subsong)?.tempo_map.add(tempo, timestamp)
    }

    /// Mark an extra channel to be treated as percussion by players.
    pub fn set_extra_percussion_channel(&mut self, channel: Option<u8>) {
        self.extra_percussion_channel = channel;
    }

    /// The extra percussion channel, if any.
    pub fn extra_percussion_channel(&self) -> Option<u8> {
        self.extra_percussion_channel
    }

    /// The file format: 0, 1 or 2.
    pub fn format(&self) -> u16 {
        self.format
    }

    /// The time division.
    pub fn division(&self) -> Division {
        self.division
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// All tracks.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// One track.
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    /// The port table: raw port values in order of first appearance.
    /// A value's position is its [`PortId`].
    pub fn port_numbers(&self) -> &[u8] {
        &self.port_numbers
    }

    /// Device names seen on a channel. A name's position selects its port.
    pub fn device_names(&self, channel: u8) -> &[String] {
        self.device_names
            .get(channel as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of playable subsongs.
    pub fn subsong_count(&self) -> usize {
        self.subsongs.iter().filter(|s| s.channel_mask != 0).count()
    }

    /// The slot of the `index`-th playable subsong.
    pub fn subsong(&self, index: usize) -> Option<SubsongId> {
        self.subsongs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.channel_mask != 0)
            .nth(index)
            .map(|(slot, _)| SubsongId(slot))
    }

    /// The track a subsong starts from: its own track in format 2, the first one otherwise.
    pub fn subsong_track(&self, subsong: SubsongId) -> ContainerResult<TrackId> {
        self.subsong_state(subsong)?;
        Ok(TrackId(if self.format == 2 { subsong.0 } else { 0 }))
    }

    /// Number of distinct channels (across ports) carrying notes.
    pub fn channel_count(&self, subsong: SubsongId) -> ContainerResult<u32> {
        let mask = self.subsong_state(subsong)?.channel_mask;
        Ok((mask & ((1u64 << MASKED_CHANNELS) - 1)).count_ones())
    }

    /// The tempo map of a subsong.
    pub fn tempo_map(&self, subsong: SubsongId) -> ContainerResult<&TempoMap> {
        Ok(&self.subsong_state(subsong)?.tempo_map)
    }

    /// Convert a tick of `subsong` to milliseconds.
    pub fn timestamp_to_ms(&self, timestamp: u32, subsong: SubsongId) -> ContainerResult<u32> {
        let state = self.subsong_state(subsong)?;
        Ok(state.tempo_map.timestamp_to_ms(timestamp, self.division))
    }

    /// Position of the last event of a subsong.
    pub fn duration(&self, subsong: SubsongId, unit: TimeUnit) -> ContainerResult<u32> {
        let end = self.subsong_state(subsong)?.end_timestamp;
        self.in_unit(end, subsong, unit)
    }

    /// The detected loop of a subsong, in ticks.
    pub fn loop_range(&self, subsong: SubsongId) -> ContainerResult<Option<LoopRange>> {
        Ok(self.subsong_state(subsong)?.loop_range)
    }

    /// First position inside the loop, if the subsong loops.
    pub fn loop_begin(&self, subsong: SubsongId, unit: TimeUnit) -> ContainerResult<Option<u32>> {
        match self.loop_range(subsong)? {
            Some(range) => self.in_unit(range.begin(), subsong, unit).map(Some),
            None => Ok(None),
        }
    }

    /// First position after the loop, if the subsong loops.
    pub fn loop_end(&self, subsong: SubsongId, unit: TimeUnit) -> ContainerResult<Option<u32>> {
        match self.loop_range(subsong)? {
            Some(range) => self.in_unit(range.end(), subsong, unit).map(Some),
            None => Ok(None),
        }
    }

    #[doc = r#"
Describe a subsong.

Yields the synthesizer family guessed from system exclusive manufacturer
IDs (`type`: `GM`, `GS`, `XG`, `X5`, `MT-32`, `D-50`), the `copyright`,
`track_text_NN` and `track_name_NN` texts, then the container level
metadata if it is scoped to this subsong. Timestamps are in milliseconds.
"#]
    pub fn metadata(&self, subsong: SubsongId) -> ContainerResult<MetadataSet> {
        self.subsong_state(subsong)?;
        let mut out = MetadataSet::new();
        let mut universal_found = false;
        let mut type_found = false;

        for (index, track) in self.tracks.iter().enumerate() {
            if self.format == 2 && index != subsong.0 {
                continue;
            }
            for event in track {
                let ms = self.ms_in_slot(event.timestamp, self.slot_of(TrackId(index)));
                if event.is_sysex() {
                    if type_found {
                        continue;
                    }
                    match synth_family(&event.data) {
                        SynthFamily::Universal => universal_found = true,
                        SynthFamily::Named(name) => {
                            type_found = true;
                            out.add_item(MetadataItem::new(ms, "type", name));
                        }
                        SynthFamily::Unknown => {}
                    }
                    continue;
                }
                let payload = event.meta_payload();
                if payload.is_empty() {
                    continue;
                }
                let name = match event.meta_kind() {
                    Some(MetaKind::Copyright) => String::from("copyright"),
                    Some(MetaKind::Text) => format!("track_text_{index:02}"),
                    Some(MetaKind::TrackName | MetaKind::InstrumentName) => {
                        format!("track_name_{index:02}")
                    }
                    _ => continue,
                };
                out.add_item(MetadataItem::new(ms, name, decode_text(payload)));
            }
        }

        if universal_found && !type_found {
            out.add_item(MetadataItem::new(0, "type", "GM"));
        }
        if self.extra_metadata.applies_to(subsong) {
            out.append(&self.extra_metadata);
        }
        Ok(out)
    }

    /// The subsong slot a track's timing state belongs to.
    fn slot_of(&self, track: TrackId) -> usize {
        if self.format == 2 { track.0 } else { 0 }
    }

    fn subsong_state(&self, subsong: SubsongId) -> ContainerResult<&Subsong> {
        self.subsongs
            .get(subsong.0)
            .ok_or(ContainerError::InvalidSubsong(subsong))
    }

    fn subsong_state_mut(&mut self, subsong: SubsongId) -> ContainerResult<&mut Subsong> {
        self.subsongs
            .get_mut(subsong.0)
            .ok_or(ContainerError::InvalidSubsong(subsong))
    }

    fn ms_in_slot(&self, timestamp: u32, slot: usize) -> u32 {
        self.subsongs
            .get(slot)
            .map(|s| s.tempo_map.timestamp_to_ms(timestamp, self.division))
            .unwrap_or_else(|| TempoMap::new().timestamp_to_ms(timestamp, self.division))
    }

    fn in_unit(&self, timestamp: u32, subsong: SubsongId, unit: TimeUnit) -> ContainerResult<u32> {
        match unit {
            TimeUnit::Ticks => Ok(timestamp),
            TimeUnit::Milliseconds => self.timestamp_to_ms(timestamp, subsong),
        }
    }

    /// Recompute channel masks, end timestamps and routing from the tracks.
    ///
    /// Tempo maps and loops are left alone; transforms adjust them explicitly.
    fn refresh_track_state(&mut self) {
        for subsong in &mut self.subsongs {
            subsong.channel_mask = 0;
            subsong.end_timestamp = 0;
        }
        self.routing = alloc::vec![Routing::default(); self.tracks.len()];
        let format = self.format;
        let Self {
            tracks,
            routing,
            subsongs,
            port_numbers,
            device_names,
            ..
        } = self;
        for (index, track) in tracks.iter().enumerate() {
            let slot = if format == 2 { index } else { 0 };
            let Some(subsong) = subsongs.get_mut(slot) else {
                continue;
            };
            for event in track {
                observe(
                    event,
                    subsong,
                    &mut routing[index],
                    port_numbers,
                    device_names,
                    false,
                );
            }
        }
    }
}

/// Derive timing state from one event.
fn observe(
    event: &Event,
    subsong: &mut Subsong,
    routing: &mut Routing,
    port_numbers: &mut Vec<u8>,
    device_names: &mut [Vec<String>; 16],
    derive_tempo: bool,
) {
    match event.kind {
        EventKind::Extended => {
            if let Some(tempo) = event.tempo() {
                if derive_tempo {
                    subsong.tempo_map.insert(tempo, event.timestamp);
                }
            } else if event.is_meta(MetaKind::SetTempo) {
                #[cfg(feature = "tracing")]
                tracing::warn!(timestamp = event.timestamp, "ignored short tempo event");
            } else if let Some(device) = device_name_of(event) {
                routing.device_name = Some(device);
            } else if event.is_meta(MetaKind::MidiPort) {
                if let Some(&port) = event.meta_payload().first() {
                    routing.port = limit_port_number(port_numbers, port).0;
                    routing.device_name = None;
                }
            }
        }
        EventKind::NoteOn | EventKind::NoteOff => {
            let channel = event.channel as usize & 0x0F;
            if let Some(device) = routing.device_name.take() {
                let names = &mut device_names[channel];
                let index = match names.iter().position(|name| *name == device) {
                    Some(index) => index,
                    None if names.len() < MAX_DEVICE_NAMES => {
                        names.push(device);
                        names.len() - 1
                    }
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(channel, "device name table full, sharing the last port");
                        MAX_DEVICE_NAMES - 1
                    }
                };
                routing.port = limit_port_number(port_numbers, device_port(index)).0;
            }
            let bit = (channel as u32 + 16 * routing.port as u32) % MASKED_CHANNELS;
            subsong.channel_mask |= 1u64 << bit;
        }
        _ => {}
    }
    subsong.end_timestamp = subsong.end_timestamp.max(event.timestamp);
}

/// Ports are bytes, so a channel tells at most this many devices apart.
const MAX_DEVICE_NAMES: usize = 256;

/// The raw port selected by a device name's position.
fn device_port(index: usize) -> u8 {
    u8::try_from(index).unwrap_or(u8::MAX)
}

/// Map a raw port to its dense index, registering unseen ports.
fn limit_port_number(port_numbers: &mut Vec<u8>, raw: u8) -> PortId {
    match port_numbers.iter().position(|p| *p == raw) {
        Some(index) => PortId(index as u8),
        None => {
            port_numbers.push(raw);
            PortId((port_numbers.len() - 1) as u8)
        }
    }
}

/// Map a raw port to its dense index without registering; unseen ports pass through.
fn resolve_port_number(port_numbers: &[u8], raw: u8) -> PortId {
    port_numbers
        .iter()
        .position(|p| *p == raw)
        .map(|index| PortId(index as u8))
        .unwrap_or(PortId(raw))
}

/// The lowercased name of an `FF 04` or `FF 09` event.
fn device_name_of(event: &Event) -> Option<String> {
    match event.meta_kind()? {
        MetaKind::InstrumentName | MetaKind::DeviceName if !event.meta_payload().is_empty() => {
            Some(decode_text(event.meta_payload()).to_lowercase())
        }
        _ => None,
    }
}

/// Text in files is UTF-8 or, failing that, Latin-1.
fn decode_text(bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(text) => String::from(text),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

enum SynthFamily {
    Universal,
    Named(&'static str),
    Unknown,
}

/// Guess the target synthesizer from a system exclusive message.
fn synth_family(sysex: &[u8]) -> SynthFamily {
    let manufacturer = sysex.get(1).copied().unwrap_or(0);
    let model = sysex.get(3).copied().unwrap_or(0);
    match (manufacturer, model) {
        (0x7E, _) => SynthFamily::Universal,
        (0x43, _) => SynthFamily::Named("XG"),
        (0x42, _) => SynthFamily::Named("X5"),
        (0x41, 0x42) => SynthFamily::Named("GS"),
        (0x41, 0x16) => SynthFamily::Named("MT-32"),
        (0x41, 0x14) => SynthFamily::Named("D-50"),
        _ => SynthFamily::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn note(timestamp: u32, channel: u8, key: u8) -> Event {
        Event::channel(timestamp, EventKind::NoteOn, channel, &[key, 100])
    }

    fn format1() -> Container {
        let mut container = Container::new();
        container.initialize(1, 480).unwrap();
        container
    }

    #[test]
    fn mutation_requires_initialization() {
        let mut container = Container::new();
        assert_eq!(
            container.add_track(Track::new()),
            Err(ContainerError::NotInitialized)
        );
        assert_eq!(
            container.initialize(3, 480),
            Err(ContainerError::InvalidFormat(3))
        );
        assert_eq!(
            container.initialize(1, 0),
            Err(ContainerError::InvalidDivision(0))
        );
    }

    #[test]
    fn tempo_events_feed_the_tempo_map() {
        let mut container = format1();
        let conductor = container.add_track(Track::new()).unwrap();
        container
            .add_event_to_track(conductor, Event::meta(0, MetaKind::SetTempo, &[0x0F, 0x42, 0x40]))
            .unwrap();
        let other: Track = vec![
            Event::meta(960, MetaKind::SetTempo, &[0x07, 0xA1, 0x20]),
            note(960, 0, 60),
        ]
        .into();
        container.add_track(other).unwrap();

        let song = container.subsong(0).unwrap();
        let map = container.tempo_map(song).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.tempo_at(0), 1_000_000);
        assert_eq!(map.tempo_at(960), 500_000);
        assert_eq!(container.duration(song, TimeUnit::Ticks), Ok(960));
        assert_eq!(container.duration(song, TimeUnit::Milliseconds), Ok(2000));
    }

    #[test]
    fn invalid_indices_are_errors() {
        let mut container = format1();
        assert_eq!(
            container.add_event_to_track(TrackId::new(0), note(0, 0, 60)),
            Err(ContainerError::InvalidTrack(TrackId::new(0)))
        );
        assert_eq!(
            container.channel_count(SubsongId::new(1)),
            Err(ContainerError::InvalidSubsong(SubsongId::new(1)))
        );
    }

    #[test]
    fn format_2_has_a_subsong_per_track() {
        let mut container = Container::new();
        container.initialize(2, 96).unwrap();
        container.add_track(vec![note(10, 0, 60)].into()).unwrap();
        container.add_track(vec![Event::meta(0, MetaKind::Text, b"silent")].into()).unwrap();
        container
            .add_track(vec![note(0, 1, 60), note(50, 2, 62)].into())
            .unwrap();

        assert_eq!(container.subsong_count(), 2);
        let second = container.subsong(1).unwrap();
        assert_eq!(second, SubsongId::new(2));
        assert_eq!(container.subsong_track(second), Ok(TrackId::new(2)));
        assert_eq!(container.channel_count(second), Ok(2));
        assert_eq!(container.duration(second, TimeUnit::Ticks), Ok(50));
        assert!(container.subsong(2).is_none());
    }

    #[test]
    fn ports_are_normalized_in_order_of_appearance() {
        let mut container = format1();
        container
            .add_track(vec![Event::meta(0, MetaKind::MidiPort, &[7]), note(0, 0, 60)].into())
            .unwrap();
        container
            .add_track(vec![Event::meta(0, MetaKind::MidiPort, &[3]), note(0, 0, 60)].into())
            .unwrap();
        container
            .add_track(vec![Event::meta(0, MetaKind::MidiPort, &[7]), note(0, 1, 60)].into())
            .unwrap();

        assert_eq!(container.port_numbers(), &[7, 3]);
        let song = container.subsong(0).unwrap();
        // channel 0 on ports 0 and 1, channel 1 on port 0
        assert_eq!(container.channel_count(song), Ok(3));
    }

    #[test]
    fn device_names_select_ports() {
        let mut container = format1();
        container
            .add_track(
                vec![
                    Event::meta(0, MetaKind::DeviceName, b"SC-55"),
                    note(0, 0, 60),
                    Event::meta(10, MetaKind::DeviceName, b"MT-32"),
                    note(10, 0, 62),
                ]
                .into(),
            )
            .unwrap();
        assert_eq!(container.device_names(0), &["sc-55", "mt-32"]);
        assert_eq!(container.device_names(1), &[] as &[String]);
        let song = container.subsong(0).unwrap();
        assert_eq!(container.channel_count(song), Ok(2));
    }

    #[test]
    fn merge_registers_source_ports() {
        let mut base = format1();
        base.add_track(vec![note(0, 0, 60)].into()).unwrap();

        let mut dumps = format1();
        dumps
            .add_track(
                vec![
                    Event::meta(0, MetaKind::MidiPort, &[2]),
                    Event::sysex(0, &[0xF0, 0x41, 0x10, 0x16, 0x12, 0xF7]),
                ]
                .into(),
            )
            .unwrap();

        base.merge_tracks(&dumps).unwrap();
        assert_eq!(base.track_count(), 2);
        assert_eq!(base.port_numbers(), &[2]);
        assert_eq!(base.tracks()[1], dumps.tracks()[0]);
    }

    #[test]
    fn set_track_count_truncates_and_pads() {
        let mut container = format1();
        container.add_track(vec![note(0, 0, 60)].into()).unwrap();
        container.add_track(vec![note(500, 1, 60)].into()).unwrap();
        container.set_track_count(1);
        let song = SubsongId::new(0);
        assert_eq!(container.duration(song, TimeUnit::Ticks), Ok(0));
        assert_eq!(container.channel_count(song), Ok(1));
        container.set_track_count(3);
        assert_eq!(container.track_count(), 3);
        assert!(container.tracks()[2].is_empty());
    }

    #[test]
    fn truncation_drops_tempo_of_removed_tracks() {
        let mut container = format1();
        container
            .add_track(vec![Event::meta(0, MetaKind::SetTempo, &[0x0F, 0x42, 0x40])].into())
            .unwrap();
        container
            .add_track(
                vec![
                    Event::meta(480, MetaKind::SetTempo, &[0x03, 0xD0, 0x90]),
                    note(480, 0, 60),
                ]
                .into(),
            )
            .unwrap();
        let song = SubsongId::new(0);
        assert_eq!(container.tempo_map(song).unwrap().len(), 2);

        container.set_track_count(1);
        let map = container.tempo_map(song).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.tempo_at(960), 1_000_000);
    }

    #[test]
    fn device_name_table_is_capped() {
        let mut container = format1();
        let mut events = Vec::new();
        for n in 0..300u32 {
            events.push(Event::meta(n, MetaKind::DeviceName, format!("device {n}").as_bytes()));
            events.push(note(n, 0, 60));
        }
        container.add_track(events.into()).unwrap();

        let names = container.device_names(0);
        assert_eq!(names.len(), 256);
        assert_eq!(names[255], "device 255");
        assert_eq!(container.port_numbers().len(), 256);
        assert_eq!(container.port_numbers()[255], u8::MAX);
    }

    #[test]
    fn metadata_describes_the_subsong() {
        let mut container = format1();
        container
            .add_track(
                vec![
                    Event::meta(0, MetaKind::TrackName, b"Overture"),
                    Event::meta(0, MetaKind::Copyright, b"(c) nobody"),
                    Event::sysex(0, &[0xF0, 0x41, 0x10, 0x42, 0x12, 0x40, 0x00, 0x7F, 0x00, 0x41, 0xF7]),
                    note(960, 0, 60),
                ]
                .into(),
            )
            .unwrap();
        let mut extra = MetadataSet::new();
        extra.add_item(MetadataItem::new(0, "artist", "someone"));
        container.set_extra_metadata(extra);

        let song = container.subsong(0).unwrap();
        let metadata = container.metadata(song).unwrap();
        assert_eq!(metadata.get_item("track_name_00").unwrap().value, "Overture");
        assert_eq!(metadata.get_item("copyright").unwrap().value, "(c) nobody");
        assert_eq!(metadata.get_item("type").unwrap().value, "GS");
        assert_eq!(metadata.get_item("artist").unwrap().value, "someone");

        let mut scoped = MetadataSet::new();
        scoped.add_item(MetadataItem::new(0, "artist", "someone"));
        scoped.scope_to([SubsongId::new(3)]);
        container.set_extra_metadata(scoped);
        assert!(container.metadata(song).unwrap().get_item("artist").is_none());
    }

    #[test]
    fn universal_sysex_alone_means_general_midi() {
        let mut container = format1();
        container
            .add_track(
                vec![
                    Event::sysex(0, &[0xF0, 0x7E, 0x7F, 0x09, 0x01, 0xF7]),
                    note(0, 0, 60),
                ]
                .into(),
            )
            .unwrap();
        let metadata = container.metadata(SubsongId::new(0)).unwrap();
        assert_eq!(metadata.get_item("type").unwrap().value, "GM");
    }
}
