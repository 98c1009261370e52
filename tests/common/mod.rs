#![allow(dead_code)]

use midi_container::prelude::*;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

pub fn note_on(timestamp: u32, channel: u8, key: u8) -> Event {
    Event::channel(timestamp, EventKind::NoteOn, channel, &[key, 100])
}

pub fn note_off(timestamp: u32, channel: u8, key: u8) -> Event {
    Event::channel(timestamp, EventKind::NoteOff, channel, &[key, 0])
}

pub fn cc(timestamp: u32, channel: u8, controller: u8, value: u8) -> Event {
    Event::channel(timestamp, EventKind::ControlChange, channel, &[controller, value])
}

pub fn program(timestamp: u32, channel: u8, program: u8) -> Event {
    Event::channel(timestamp, EventKind::ProgramChange, channel, &[program])
}

pub fn tempo(timestamp: u32, micros: u32) -> Event {
    let [_, a, b, c] = micros.to_be_bytes();
    Event::meta(timestamp, MetaKind::SetTempo, &[a, b, c])
}

pub fn end_of_track(timestamp: u32) -> Event {
    Event::meta(timestamp, MetaKind::EndOfTrack, &[])
}

pub fn container(format: u16, division: u16, tracks: Vec<Vec<Event>>) -> Container {
    let mut container = Container::new();
    container.initialize(format, division).unwrap();
    for events in tracks {
        container.add_track(Track::from(events)).unwrap();
    }
    container
}

/// What a track looks like once written: interior End of Track events
/// dropped and one closing the track.
pub fn normalized(track: &Track) -> Vec<Event> {
    let end = track.iter().map(|e| e.timestamp).max().unwrap_or(0);
    let mut events: Vec<Event> = track
        .iter()
        .filter(|e| !e.is_end_of_track())
        .cloned()
        .collect();
    events.push(end_of_track(end));
    events
}

/// A file as seen by an independent reader.
pub struct ReadBack {
    pub format: u16,
    pub division: u16,
    pub tracks: Vec<Vec<Event>>,
}

pub fn read_back(bytes: &[u8]) -> ReadBack {
    let smf = Smf::parse(bytes).expect("valid file");
    let format = match smf.header.format {
        midly::Format::SingleTrack => 0,
        midly::Format::Parallel => 1,
        midly::Format::Sequential => 2,
    };
    let division = match smf.header.timing {
        Timing::Metrical(tpqn) => tpqn.as_int(),
        Timing::Timecode(..) => panic!("timecode division"),
    };
    let tracks = smf
        .tracks
        .iter()
        .map(|track| {
            let mut timestamp = 0u32;
            track
                .iter()
                .map(|event| {
                    timestamp += event.delta.as_int();
                    to_event(timestamp, &event.kind)
                })
                .collect()
        })
        .collect();
    ReadBack {
        format,
        division,
        tracks,
    }
}

fn to_event(timestamp: u32, kind: &TrackEventKind<'_>) -> Event {
    match kind {
        TrackEventKind::Midi { channel, message } => {
            let channel = channel.as_int();
            let (kind, data) = match *message {
                MidiMessage::NoteOff { key, vel } => (EventKind::NoteOff, vec![key.as_int(), vel.as_int()]),
                MidiMessage::NoteOn { key, vel } => (EventKind::NoteOn, vec![key.as_int(), vel.as_int()]),
                MidiMessage::Aftertouch { key, vel } => {
                    (EventKind::PolyphonicAftertouch, vec![key.as_int(), vel.as_int()])
                }
                MidiMessage::Controller { controller, value } => {
                    (EventKind::ControlChange, vec![controller.as_int(), value.as_int()])
                }
                MidiMessage::ProgramChange { program } => (EventKind::ProgramChange, vec![program.as_int()]),
                MidiMessage::ChannelAftertouch { vel } => {
                    (EventKind::ChannelPressureAftertouch, vec![vel.as_int()])
                }
                MidiMessage::PitchBend { bend } => {
                    let value = bend.0.as_int();
                    (EventKind::PitchBendChange, vec![(value & 0x7F) as u8, (value >> 7) as u8])
                }
            };
            Event::channel(timestamp, kind, channel, &data)
        }
        TrackEventKind::SysEx(bytes) => {
            let mut data = vec![0xF0];
            data.extend_from_slice(bytes);
            Event::sysex(timestamp, &data)
        }
        TrackEventKind::Escape(bytes) => {
            let mut data = vec![0xF7];
            data.extend_from_slice(bytes);
            Event::sysex(timestamp, &data)
        }
        TrackEventKind::Meta(meta) => {
            let (kind, payload): (MetaKind, Vec<u8>) = match *meta {
                MetaMessage::Text(text) => (MetaKind::Text, text.to_vec()),
                MetaMessage::Copyright(text) => (MetaKind::Copyright, text.to_vec()),
                MetaMessage::TrackName(text) => (MetaKind::TrackName, text.to_vec()),
                MetaMessage::InstrumentName(text) => (MetaKind::InstrumentName, text.to_vec()),
                MetaMessage::Marker(text) => (MetaKind::Marker, text.to_vec()),
                MetaMessage::CuePoint(text) => (MetaKind::CueMarker, text.to_vec()),
                MetaMessage::DeviceName(text) => (MetaKind::DeviceName, text.to_vec()),
                MetaMessage::MidiPort(port) => (MetaKind::MidiPort, vec![port.as_int()]),
                MetaMessage::EndOfTrack => (MetaKind::EndOfTrack, vec![]),
                MetaMessage::Tempo(micros) => {
                    let [_, a, b, c] = micros.as_int().to_be_bytes();
                    (MetaKind::SetTempo, vec![a, b, c])
                }
                MetaMessage::TimeSignature(n, d, c, b) => (MetaKind::TimeSignature, vec![n, d, c, b]),
                MetaMessage::KeySignature(sharps, minor) => {
                    (MetaKind::KeySignature, vec![sharps as u8, minor as u8])
                }
                ref other => panic!("unexpected meta event {other:?}"),
            };
            Event::meta(timestamp, kind, &payload)
        }
    }
}
