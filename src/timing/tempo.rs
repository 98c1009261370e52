use super::{DEFAULT_TEMPO, Division, div_round};
use crate::{ContainerError, ContainerResult};
use alloc::vec::Vec;

/// A tempo change: from `timestamp` on, a quarter note lasts `tempo` microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoItem {
    /// Tick of the change
    pub timestamp: u32,
    /// Microseconds per quarter note
    pub tempo: u32,
}

impl TempoItem {
    /// Create a tempo change.
    pub const fn new(timestamp: u32, tempo: u32) -> Self {
        Self { timestamp, tempo }
    }
}

#[doc = r#"
The tempo changes of one subsong, ordered by timestamp.

Before the first change the tempo is 120 BPM (500 000 µs per quarter note).

# Example
```rust
# use midi_container::prelude::*;
let mut map = TempoMap::new();
map.add(500_000, 0).unwrap();
map.add(250_000, 960).unwrap();

let division = Division::TicksPerQuarterNote(480);
assert_eq!(map.timestamp_to_ms(960, division), 1000);
assert_eq!(map.timestamp_to_ms(1440, division), 1250);
```
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMap {
    items: Vec<TempoItem>,
}

impl TempoMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a tempo change.
    ///
    /// Timestamps must not decrease. A change at the timestamp of the last
    /// change replaces its tempo.
    pub fn add(&mut self, tempo: u32, timestamp: u32) -> ContainerResult<()> {
        match self.items.last_mut() {
            Some(last) if timestamp < last.timestamp => Err(ContainerError::TempoOutOfOrder {
                timestamp,
                last: last.timestamp,
            }),
            Some(last) if timestamp == last.timestamp => {
                last.tempo = tempo;
                Ok(())
            }
            _ => {
                self.items.push(TempoItem::new(timestamp, tempo));
                Ok(())
            }
        }
    }

    /// Insert a change at its ordered position. Used when merging tempo
    /// events spread over several tracks.
    pub(crate) fn insert(&mut self, tempo: u32, timestamp: u32) {
        let position = self.items.partition_point(|item| item.timestamp <= timestamp);
        match position.checked_sub(1).map(|p| &mut self.items[p]) {
            Some(item) if item.timestamp == timestamp => item.tempo = tempo,
            _ => self.items.insert(position, TempoItem::new(timestamp, tempo)),
        }
    }

    /// The tempo in effect at `timestamp`.
    pub fn tempo_at(&self, timestamp: u32) -> u32 {
        let position = self.items.partition_point(|item| item.timestamp <= timestamp);
        match position {
            0 => DEFAULT_TEMPO,
            p => self.items[p - 1].tempo,
        }
    }

    #[doc = r#"
Convert a tick position to milliseconds.

Musical ticks integrate the tempo over each segment
(`tempo_µs / division / 1000` milliseconds per tick). The sum is kept exact
and rounded once, so consecutive positions never drift apart. Past the last
change the last tempo continues.

SMPTE ticks ignore the map: a tick lasts `1000 / (fps * ticks_per_frame)` ms.
"#]
    pub fn timestamp_to_ms(&self, timestamp: u32, division: Division) -> u32 {
        let ms = match division {
            Division::Smpte {
                fps,
                ticks_per_frame,
            } => {
                let (num, den) = fps.as_ratio();
                div_round(
                    timestamp as u128 * 1000 * den as u128,
                    num as u128 * ticks_per_frame.max(1) as u128,
                )
            }
            Division::TicksPerQuarterNote(tpqn) => {
                // microseconds * ticks per quarter note
                let mut elapsed: u128 = 0;
                let mut tempo = DEFAULT_TEMPO;
                let mut position = 0u32;
                for item in self.items.iter().take_while(|item| item.timestamp <= timestamp) {
                    elapsed += tempo as u128 * (item.timestamp - position) as u128;
                    tempo = item.tempo;
                    position = item.timestamp;
                }
                elapsed += tempo as u128 * (timestamp - position) as u128;
                div_round(elapsed, tpqn.max(1) as u128 * 1000)
            }
        };
        u32::try_from(ms).unwrap_or(u32::MAX)
    }

    /// Shift the map back by `base` ticks.
    ///
    /// Changes at or before `base` collapse into one change at tick 0 carrying
    /// the tempo in effect at `base`.
    pub(crate) fn trim(&mut self, base: u32) {
        let position = self.items.partition_point(|item| item.timestamp <= base);
        if position > 0 {
            let effective = self.items[position - 1].tempo;
            self.items.drain(..position);
            self.items.insert(0, TempoItem::new(base, effective));
        }
        for item in &mut self.items {
            item.timestamp -= base;
        }
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the map holds no change.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The changes, ordered by timestamp.
    pub fn items(&self) -> &[TempoItem] {
        &self.items
    }

    /// Iterate over the changes.
    pub fn iter(&self) -> core::slice::Iter<'_, TempoItem> {
        self.items.iter()
    }
}
