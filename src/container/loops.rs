#![doc = r#"
Loop point detection

Games mark loops in their music with a handful of conventions:

| Convention | Start                          | End                           |
|------------|--------------------------------|-------------------------------|
| XMI / AIL  | CC 110 or CC 116 (earliest)    | CC 111 or CC 117 (latest)     |
| Marker     | marker `loopStart` (earliest)  | marker `loopEnd` (latest)     |
| RPG Maker  | CC 111 (earliest)              | end of the subsong            |
| Touhou     | CC 2 value 0                   | CC 4 value 0                  |

The RPG Maker convention only applies when no CC 110 is present, and the
Touhou one only to format 0 files whose CC 2 and CC 4 are never used with
another value.
"#]

use super::Container;
use crate::{
    LoopRange,
    event::{Event, MetaKind, controller},
};

/// Which loop conventions [`Container::detect_loops`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopDetection {
    /// XMI / AIL controllers
    pub xmi: bool,
    /// `loopStart` / `loopEnd` markers
    pub marker: bool,
    /// RPG Maker CC 111
    pub rpg_maker: bool,
    /// Touhou CC 2 / CC 4
    pub touhou: bool,
}

impl LoopDetection {
    /// Every convention.
    pub const ALL: Self = Self {
        xmi: true,
        marker: true,
        rpg_maker: true,
        touhou: true,
    };

    /// No convention; clears loops.
    pub const NONE: Self = Self {
        xmi: false,
        marker: false,
        rpg_maker: false,
        touhou: false,
    };
}

impl Default for LoopDetection {
    fn default() -> Self {
        Self::ALL
    }
}

impl Container {
    #[doc = r#"
Look for loop points in every subsong.

The enabled conventions are tried in the order XMI, Marker, RPG Maker,
Touhou. The first one yielding a range with start before end wins.
Subsongs without a match are left without a loop.
"#]
    pub fn detect_loops(&mut self, detection: LoopDetection) {
        let format = self.format;
        for slot in 0..self.subsongs.len() {
            let tracks = &self.tracks;
            let events = || {
                tracks
                    .iter()
                    .enumerate()
                    .filter(move |(index, _)| format != 2 || *index == slot)
                    .flat_map(|(_, track)| track.iter())
            };
            let end = self.subsongs[slot].end_timestamp;

            let found = None
                .or_else(|| detection.xmi.then(|| xmi(events())).flatten())
                .or_else(|| detection.marker.then(|| marker(events())).flatten())
                .or_else(|| detection.rpg_maker.then(|| rpg_maker(events(), end)).flatten())
                .or_else(|| {
                    (detection.touhou && format == 0)
                        .then(|| touhou(events()))
                        .flatten()
                });

            #[cfg(feature = "tracing")]
            if let Some(range) = &found {
                tracing::debug!(slot, begin = range.begin(), end = range.end(), "loop found");
            }

            self.subsongs[slot].loop_range = found;
        }
    }
}

fn xmi<'a>(events: impl Iterator<Item = &'a Event>) -> Option<LoopRange> {
    let mut start: Option<u32> = None;
    let mut end: Option<u32> = None;
    for event in events {
        match event.controller() {
            Some((controller::EMIDI_TRACK_DESIGNATION | controller::AIL_FOR_LOOP, _)) => {
                start = Some(start.map_or(event.timestamp, |s| s.min(event.timestamp)));
            }
            Some((controller::LOOP_POINT | controller::AIL_NEXT_BREAK, _)) => {
                end = Some(end.map_or(event.timestamp, |e| e.max(event.timestamp)));
            }
            _ => {}
        }
    }
    LoopRange::new(start?, end?)
}

fn marker<'a>(events: impl Iterator<Item = &'a Event>) -> Option<LoopRange> {
    let mut start: Option<u32> = None;
    let mut end: Option<u32> = None;
    for event in events {
        if !(event.is_meta(MetaKind::Marker) || event.is_meta(MetaKind::CueMarker)) {
            continue;
        }
        match event.meta_payload() {
            b"loopStart" => start = Some(start.map_or(event.timestamp, |s| s.min(event.timestamp))),
            b"loopEnd" => end = Some(end.map_or(event.timestamp, |e| e.max(event.timestamp))),
            _ => {}
        }
    }
    LoopRange::new(start?, end?)
}

fn rpg_maker<'a>(events: impl Iterator<Item = &'a Event>, end: u32) -> Option<LoopRange> {
    let mut start: Option<u32> = None;
    for event in events {
        match event.controller() {
            Some((controller::EMIDI_TRACK_DESIGNATION, _)) => return None,
            Some((controller::LOOP_POINT, _)) => {
                start = Some(start.map_or(event.timestamp, |s| s.min(event.timestamp)));
            }
            _ => {}
        }
    }
    LoopRange::new(start?, end)
}

fn touhou<'a>(events: impl Iterator<Item = &'a Event>) -> Option<LoopRange> {
    let mut start: Option<u32> = None;
    let mut end: Option<u32> = None;
    for event in events {
        match event.controller() {
            Some((controller::TOUHOU_LOOP_START | controller::TOUHOU_LOOP_END, value))
                if value != 0 =>
            {
                return None;
            }
            Some((controller::TOUHOU_LOOP_START, _)) => {
                start = Some(start.map_or(event.timestamp, |s| s.min(event.timestamp)));
            }
            Some((controller::TOUHOU_LOOP_END, _)) => {
                end = Some(end.map_or(event.timestamp, |e| e.max(event.timestamp)));
            }
            _ => {}
        }
    }
    LoopRange::new(start?, end?)
}
