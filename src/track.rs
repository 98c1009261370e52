use crate::event::Event;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

#[doc = r#"
An ordered list of [`Event`]s.

Events are expected in non-decreasing timestamp order. The track never
re-sorts; producers appending events must keep that order.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<Event>,
}

impl Track {
    /// Create an empty track.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Remove and return the event at `index`.
    ///
    /// # Panics
    /// if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Event {
        self.events.remove(index)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The events of the track.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Mutable access to the events of the track.
    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    /// Iterate over the events.
    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// The last event, if any.
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Keep only the events for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Event) -> bool,
    {
        self.events.retain(keep);
    }
}

impl From<Vec<Event>> for Track {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for Track {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Track {
    type Output = Event;
    fn index(&self, index: usize) -> &Self::Output {
        &self.events[index]
    }
}

impl IndexMut<usize> for Track {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.events[index]
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for Track {
    type Item = Event;
    type IntoIter = alloc::vec::IntoIter<Event>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
