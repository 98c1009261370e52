use core::ops::Range;

/// A half-open tick interval `[begin, end)` to repeat during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopRange {
    begin: u32,
    end: u32,
}

impl LoopRange {
    /// Create a loop range. `None` unless `begin < end`.
    pub const fn new(begin: u32, end: u32) -> Option<Self> {
        if begin < end {
            Some(Self { begin, end })
        } else {
            None
        }
    }

    /// First tick inside the loop.
    pub const fn begin(&self) -> u32 {
        self.begin
    }

    /// First tick after the loop.
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// True if `tick` lies inside the loop.
    pub const fn contains(&self, tick: u32) -> bool {
        self.begin <= tick && tick < self.end
    }

    /// Shift the range back by `offset` ticks, clamping at zero.
    pub(crate) fn shifted_back(&self, offset: u32) -> Option<Self> {
        Self::new(
            self.begin.saturating_sub(offset),
            self.end.saturating_sub(offset),
        )
    }
}

impl From<LoopRange> for Range<u32> {
    fn from(value: LoopRange) -> Self {
        value.begin..value.end
    }
}

#[test]
fn loop_range_is_half_open() {
    let range = LoopRange::new(100, 5000).unwrap();
    assert!(range.contains(100));
    assert!(!range.contains(5000));
    assert_eq!(Range::from(range), 100..5000);
    assert!(LoopRange::new(10, 10).is_none());
    assert_eq!(range.shifted_back(200), LoopRange::new(0, 4800));
}
