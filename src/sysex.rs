use crate::PortId;
use alloc::vec::Vec;

/// Where a payload lives in the table's shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SysExItem {
    port: PortId,
    offset: usize,
    size: usize,
}

#[doc = r#"
An append-only arena of system exclusive payloads.

Payloads are copied into one shared buffer and addressed by a stable index.
Adding a payload that is already stored for the same port returns the
existing index. Indices are never reused or shifted.

Lookups hand out a borrow of the buffer; it cannot outlive the next
[`SysExTable::add_item`], so re-resolve the index after adding.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SysExTable {
    items: Vec<SysExItem>,
    data: Vec<u8>,
}

/// A payload resolved from a [`SysExTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysExPayload<'a> {
    /// The message bytes, `F0` through `F7`
    pub data: &'a [u8],
    /// The port the message is sent on
    pub port: PortId,
}

impl SysExTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Store a payload and return its index.
    pub fn add_item(&mut self, bytes: &[u8], port: PortId) -> usize {
        if let Some(existing) = self.items.iter().position(|item| {
            item.port == port && &self.data[item.offset..item.offset + item.size] == bytes
        }) {
            return existing;
        }
        self.items.push(SysExItem {
            port,
            offset: self.data.len(),
            size: bytes.len(),
        });
        self.data.extend_from_slice(bytes);
        self.items.len() - 1
    }

    /// Resolve an index. `None` if the index was never handed out.
    pub fn get_item(&self, index: usize) -> Option<SysExPayload<'_>> {
        let item = self.items.get(index)?;
        Some(SysExPayload {
            data: &self.data[item.offset..item.offset + item.size],
            port: item.port,
        })
    }

    /// Number of distinct payloads.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
