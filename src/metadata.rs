use crate::SubsongId;
use alloc::{string::String, vec::Vec};

/// A timestamped name/value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataItem {
    /// Position of the item. Milliseconds for extracted items.
    pub timestamp: u32,
    /// Key, e.g. `copyright` or `track_name_00`
    pub name: String,
    /// Value
    pub value: String,
}

impl MetadataItem {
    /// Create an item.
    pub fn new(timestamp: u32, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            name: name.into(),
            value: value.into(),
        }
    }
}

#[doc = r#"
An ordered list of [`MetadataItem`]s, optionally scoped to some subsongs.

The scope is a packed bitmap: bit `i % 8` of byte `i / 8` set means the
items apply to subsong slot `i`. Without a bitmap the items apply to every
subsong.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataSet {
    items: Vec<MetadataItem>,
    bitmap: Option<Vec<u8>>,
}

impl MetadataSet {
    /// Create an empty, unscoped set.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            bitmap: None,
        }
    }

    /// Append an item.
    pub fn add_item(&mut self, item: MetadataItem) {
        self.items.push(item);
    }

    /// Append the items of `other`. The scope of `self` is kept as is.
    pub fn append(&mut self, other: &MetadataSet) {
        self.items.extend_from_slice(&other.items);
    }

    /// The first item called `name`.
    pub fn get_item(&self, name: &str) -> Option<&MetadataItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// The packed scope bitmap, if the set is scoped.
    pub fn bitmap(&self) -> Option<&[u8]> {
        self.bitmap.as_deref()
    }

    /// Scope the set with a packed bitmap. An empty bitmap removes the scope.
    pub fn assign_bitmap(&mut self, bitmap: &[u8]) {
        self.bitmap = (!bitmap.is_empty()).then(|| bitmap.to_vec());
    }

    /// Scope the set to the given subsongs.
    pub fn scope_to<I>(&mut self, subsongs: I)
    where
        I: IntoIterator<Item = SubsongId>,
    {
        let mut bitmap = Vec::new();
        for subsong in subsongs {
            let byte = subsong.index() / 8;
            if bitmap.len() <= byte {
                bitmap.resize(byte + 1, 0);
            }
            bitmap[byte] |= 1 << (subsong.index() % 8);
        }
        self.assign_bitmap(&bitmap);
    }

    /// True if the items apply to `subsong`.
    pub fn applies_to(&self, subsong: SubsongId) -> bool {
        match &self.bitmap {
            None => true,
            Some(bitmap) => bitmap
                .get(subsong.index() / 8)
                .is_some_and(|byte| byte & (1 << (subsong.index() % 8)) != 0),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the set holds no item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items, in insertion order.
    pub fn items(&self) -> &[MetadataItem] {
        &self.items
    }

    /// Iterate over the items.
    pub fn iter(&self) -> core::slice::Iter<'_, MetadataItem> {
        self.items.iter()
    }
}

impl core::ops::Index<usize> for MetadataSet {
    type Output = MetadataItem;
    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_first_match() {
        let mut set = MetadataSet::new();
        set.add_item(MetadataItem::new(0, "title", "first"));
        set.add_item(MetadataItem::new(10, "title", "second"));
        assert_eq!(set.get_item("title").unwrap().value, "first");
        assert!(set.get_item("artist").is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn append_keeps_own_scope() {
        let mut base = MetadataSet::new();
        base.scope_to([SubsongId::new(1)]);
        let mut other = MetadataSet::new();
        other.add_item(MetadataItem::new(0, "artist", "someone"));
        other.assign_bitmap(&[0xFF]);

        base.append(&other);
        assert_eq!(base.len(), 1);
        assert_eq!(base.bitmap(), Some(&[0b10][..]));
    }

    #[test]
    fn bitmap_scopes_subsongs() {
        let mut set = MetadataSet::new();
        assert!(set.applies_to(SubsongId::new(40)));

        set.scope_to([SubsongId::new(0), SubsongId::new(9)]);
        assert_eq!(set.bitmap(), Some(&[0x01, 0x02][..]));
        assert!(set.applies_to(SubsongId::new(0)));
        assert!(!set.applies_to(SubsongId::new(1)));
        assert!(set.applies_to(SubsongId::new(9)));
        assert!(!set.applies_to(SubsongId::new(16)));

        set.assign_bitmap(&[]);
        assert!(set.bitmap().is_none());
        assert!(set.applies_to(SubsongId::new(1)));
    }
}
