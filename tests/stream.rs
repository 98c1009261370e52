mod common;

use common::*;
use midi_container::prelude::*;
use pretty_assertions::assert_eq;

const GM_RESET: [u8; 6] = [0xF0, 0x7E, 0x7F, 0x09, 0x01, 0xF7];

fn band() -> Container {
    container(
        1,
        480,
        vec![
            vec![
                tempo(0, 500_000),
                Event::sysex(0, &GM_RESET),
                Event::sysex(0, &[0xF0, 0x43, 0x10]),
            ],
            vec![
                Event::meta(0, MetaKind::MidiPort, &[3]),
                note_on(0, 0, 60),
                note_off(480, 0, 60),
            ],
            vec![
                Event::meta(0, MetaKind::MidiPort, &[5]),
                note_on(0, 1, 64),
                program(240, 1, 3),
                cc(240, 1, 0, 1),
                note_off(480, 1, 64),
            ],
        ],
    )
}

fn packed(stream: &MidiStream) -> Vec<(u32, u32)> {
    stream.events.iter().map(|e| (e.timestamp, e.data)).collect()
}

#[test]
fn tracks_merge_into_packed_messages() {
    let container = band();
    let stream = container
        .serialize_as_stream(SubsongId::new(0), CleanFlags::NONE)
        .unwrap();

    assert_eq!(container.port_numbers(), &[3, 5]);
    assert_eq!(
        packed(&stream),
        vec![
            (0, 0xF000_0000),
            (0, 0x903C_6400),
            (0, 0x9140_6401),
            (250, 0xC103_0001),
            (250, 0xB100_0101),
            (500, 0x803C_0000),
            (500, 0x8140_0001),
        ]
    );
    let reset = stream.sysex.get_item(0).unwrap();
    assert_eq!(reset.data, &GM_RESET);
    assert_eq!(reset.port, PortId::new(0));
    assert_eq!(stream.sysex.len(), 1);
    assert_eq!(stream.events[0].sysex_index(), Some(0));
}

#[test]
fn clean_flags_drop_instrument_setup() {
    let stream = band()
        .serialize_as_stream(
            SubsongId::new(0),
            CleanFlags::INSTRUMENTS | CleanFlags::BANKS,
        )
        .unwrap();
    assert!(
        stream
            .events
            .iter()
            .all(|e| e.status() & 0xF0 != 0xC0 && e.status() & 0xF0 != 0xB0)
    );
    assert_eq!(stream.events.len(), 5);
}

#[test]
fn emidi_clean_skips_foreign_tracks() {
    let container = container(
        1,
        480,
        vec![
            vec![cc(0, 0, 110, 1), note_on(0, 0, 60)],
            vec![cc(0, 1, 110, 4), note_on(0, 1, 60)],
        ],
    );
    let song = SubsongId::new(0);
    let all = container.serialize_as_stream(song, CleanFlags::NONE).unwrap();
    assert_eq!(all.events.len(), 4);

    let cleaned = container.serialize_as_stream(song, CleanFlags::EMIDI).unwrap();
    let statuses: Vec<u8> = cleaned.events.iter().map(StreamEvent::status).collect();
    assert_eq!(statuses, vec![0x90]);
}

#[test]
fn emidi_clean_strips_loop_controllers() {
    let container = container(
        1,
        480,
        vec![vec![
            cc(0, 0, 110, 1),
            cc(0, 0, 111, 0),
            cc(0, 0, 116, 0),
            cc(0, 0, 7, 100),
            note_on(0, 0, 60),
        ]],
    );
    let stream = container
        .serialize_as_stream(SubsongId::new(0), CleanFlags::EMIDI)
        .unwrap();
    let controllers: Vec<u8> = stream
        .events
        .iter()
        .filter(|e| e.status() & 0xF0 == 0xB0)
        .map(StreamEvent::data1)
        .collect();
    assert_eq!(controllers, vec![7]);
    assert_eq!(stream.events.len(), 2);
}

#[test]
fn smpte_division_ignores_tempo() {
    // 25 fps, 40 ticks per frame: 1000 ticks per second
    let container = container(
        0,
        0xE728,
        vec![vec![tempo(0, 250_000), note_on(0, 0, 60), note_off(1500, 0, 60)]],
    );
    let song = container.subsong(0).unwrap();
    assert_eq!(container.duration(song, TimeUnit::Milliseconds), Ok(1500));

    let stream = container.serialize_as_stream(song, CleanFlags::NONE).unwrap();
    let times: Vec<u32> = stream.events.iter().map(|e| e.timestamp).collect();
    assert_eq!(times, vec![0, 1500]);
}

#[test]
fn format_2_streams_one_track_with_its_tempo() {
    let container = container(
        2,
        480,
        vec![
            vec![note_on(0, 0, 60), note_off(480, 0, 60)],
            vec![tempo(0, 250_000), note_on(0, 2, 72), note_off(480, 2, 72)],
        ],
    );
    let stream = container
        .serialize_as_stream(SubsongId::new(1), CleanFlags::NONE)
        .unwrap();
    assert_eq!(packed(&stream), vec![(0, 0x9248_6400), (250, 0x8248_0000)]);
}

#[test]
fn device_names_route_to_ports() {
    let container = container(
        1,
        480,
        vec![vec![
            Event::meta(0, MetaKind::DeviceName, b"Synth A"),
            note_on(0, 0, 60),
            Event::meta(10, MetaKind::DeviceName, b"Synth B"),
            note_on(10, 0, 62),
            Event::meta(20, MetaKind::DeviceName, b"synth a"),
            note_on(20, 0, 64),
        ]],
    );
    let stream = container
        .serialize_as_stream(SubsongId::new(0), CleanFlags::NONE)
        .unwrap();
    let ports: Vec<PortId> = stream.events.iter().map(StreamEvent::port).collect();
    assert_eq!(ports, vec![PortId::new(0), PortId::new(1), PortId::new(0)]);
}

#[test]
fn loop_bounds_come_in_milliseconds() {
    let mut container = container(
        1,
        480,
        vec![vec![
            note_on(0, 0, 60),
            cc(480, 0, 110, 0),
            cc(1440, 0, 111, 0),
            note_off(1920, 0, 60),
        ]],
    );
    container.detect_loops(LoopDetection::ALL);
    let stream = container
        .serialize_as_stream(SubsongId::new(0), CleanFlags::NONE)
        .unwrap();
    assert_eq!(stream.loop_begin, Some(500));
    assert_eq!(stream.loop_end, Some(1500));
}

#[test]
fn merged_dumps_keep_their_port() {
    let mut container = container(1, 480, vec![vec![note_on(0, 0, 60), note_off(480, 0, 60)]]);
    let dumps = common::container(
        1,
        480,
        vec![vec![Event::meta(0, MetaKind::MidiPort, &[9]), Event::sysex(0, &GM_RESET)]],
    );
    container.merge_tracks(&dumps).unwrap();

    let stream = container
        .serialize_as_stream(SubsongId::new(0), CleanFlags::NONE)
        .unwrap();
    let index = stream
        .events
        .iter()
        .find_map(StreamEvent::sysex_index)
        .unwrap();
    assert_eq!(stream.sysex.get_item(index).unwrap().port, PortId::new(0));
    assert_eq!(container.port_numbers(), &[9]);
}

#[test]
fn unknown_subsong_is_rejected() {
    assert_eq!(
        band().serialize_as_stream(SubsongId::new(1), CleanFlags::NONE),
        Err(ContainerError::InvalidSubsong(SubsongId::new(1)))
    );
}
