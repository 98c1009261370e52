use core::fmt;

/// Addresses a track in the container's track list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackId(pub(crate) usize);

impl TrackId {
    /// Create a handle for the track at `index`.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
    /// Position of the track in the container.
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.0)
    }
}

#[doc = r#"
Addresses a subsong slot.

Formats 0 and 1 have a single slot. Format 2 has one slot per track.
Use [`Container::subsong`](crate::Container::subsong) to go from the
n-th playable subsong to its slot.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsongId(pub(crate) usize);

impl SubsongId {
    /// Create a handle for the subsong slot at `index`.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
    /// Position of the slot in the container.
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SubsongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subsong {}", self.0)
    }
}

/// A dense port index, assigned in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortId(pub(crate) u8);

impl PortId {
    /// Create a port handle.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }
    /// The dense index.
    pub const fn index(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}", self.0)
    }
}
