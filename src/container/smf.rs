use super::Container;
use crate::{
    ContainerError, ContainerResult, SubsongId, Track, TrackId,
    event::{EventKind, MetaKind, StatusCode},
    vlq,
};
use alloc::vec::Vec;

const HEADER_LENGTH: u32 = 6;

impl Container {
    #[doc = r#"
Write the container as Standard MIDI File bytes.

With `None` every track is written in the container's format. With a
subsong of a format 2 container only that subsong's track is written, as a
format 0 file; formats 0 and 1 always write every track. A format 0
container holding more than one track (a meter track and a data track) is
written as format 1.

Channel events use running status. Each track ends with exactly one
End of Track, at its last event or at the latest End of Track it held,
whichever is later.

Fails without output if a track is out of order or holds a malformed
event, or if a delta time or length does not fit a variable length
quantity.
"#]
    pub fn serialize_as_smf(&self, subsong: Option<SubsongId>) -> ContainerResult<Vec<u8>> {
        let (format, tracks): (u16, Vec<usize>) = match subsong {
            Some(id) if self.format == 2 => {
                self.subsong_state(id)?;
                (0, alloc::vec![id.0])
            }
            Some(id) => {
                self.subsong_state(id)?;
                (self.format, (0..self.tracks.len()).collect())
            }
            None => (self.format, (0..self.tracks.len()).collect()),
        };
        // format 0 holds a single track
        let format = if format == 0 && tracks.len() > 1 { 1 } else { format };
        let count =
            u16::try_from(tracks.len()).map_err(|_| ContainerError::TooManyTracks(tracks.len()))?;

        let mut out = Vec::new();
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&HEADER_LENGTH.to_be_bytes());
        out.extend_from_slice(&format.to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        out.extend_from_slice(&self.division.raw().to_be_bytes());

        for index in tracks {
            let body = encode_track(TrackId(index), &self.tracks[index])?;
            out.extend_from_slice(b"MTrk");
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&body);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(format, tracks = count, bytes = out.len(), "serialized file");

        Ok(out)
    }
}

/// Encode the events of a track chunk.
fn encode_track(id: TrackId, track: &Track) -> ContainerResult<Vec<u8>> {
    let mut body = Vec::new();
    let mut previous = 0u32;
    let mut running: Option<u8> = None;
    let mut end = 0u32;

    for (index, event) in track.iter().enumerate() {
        if event.timestamp < previous {
            return Err(ContainerError::EventsOutOfOrder {
                track: id,
                timestamp: event.timestamp,
                previous,
            });
        }
        if event.is_end_of_track() {
            end = end.max(event.timestamp);
            continue;
        }
        vlq::encode(event.timestamp - previous, &mut body)?;
        previous = event.timestamp;

        match event.kind {
            EventKind::Extended => {
                running = None;
                match event.data.as_slice() {
                    [0xFF, kind, payload @ ..] => {
                        body.push(StatusCode::MetaData.into());
                        body.push(*kind);
                        encode_length(payload.len(), &mut body)?;
                        body.extend_from_slice(payload);
                    }
                    [status @ (0xF0 | 0xF7), rest @ ..] => {
                        body.push(*status);
                        encode_length(rest.len(), &mut body)?;
                        body.extend_from_slice(rest);
                    }
                    [0x80..=0xFE, ..] => body.extend_from_slice(&event.data),
                    _ => return Err(ContainerError::MalformedEvent { track: id, index }),
                }
            }
            kind => {
                if event.data.len() != kind.parameter_count() {
                    return Err(ContainerError::MalformedEvent { track: id, index });
                }
                let status = u8::from(kind) | (event.channel & 0x0F);
                if running != Some(status) {
                    body.push(status);
                    running = Some(status);
                }
                body.extend_from_slice(&event.data);
            }
        }
    }

    vlq::encode(end.max(previous) - previous, &mut body)?;
    body.push(StatusCode::MetaData.into());
    body.push(MetaKind::EndOfTrack.into());
    body.push(0);
    Ok(body)
}

fn encode_length(len: usize, out: &mut Vec<u8>) -> ContainerResult<()> {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    vlq::encode(len, out)
}
