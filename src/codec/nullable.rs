//! Nullable collection codec
//!
//! Some store attributes treat `null` and `[]` differently: `null` leaves the
//! inherited value alone, `[]` clears it. `NullableCollection` keeps the two
//! apart in memory and on the wire.
//!
//! | in memory            | wire        |
//! |----------------------|-------------|
//! | `null()`             | `null`      |
//! | `empty()`            | `[]`        |
//! | `from(vec![a, b])`   | `[a, b]`    |
//!
//! A parent struct that also needs "field absent" wraps it in `Option` and uses
//! [`deserialize_present`] so a literal `null` lands in `Some(null())` rather
//! than collapsing into `None`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    Null,
    Empty,
    Populated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableCollection<T> {
    items: Vec<T>,
    is_null: bool,
}

impl<T> NullableCollection<T> {
    pub fn null() -> Self {
        Self {
            items: Vec::new(),
            is_null: true,
        }
    }

    /// The explicit-empty sentinel; encodes as `[]`.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            is_null: false,
        }
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// `None` for the null state.
    pub fn into_items(self) -> Option<Vec<T>> {
        (!self.is_null).then_some(self.items)
    }

    pub fn state(&self) -> CollectionState {
        match (self.is_null, self.items.is_empty()) {
            (true, _) => CollectionState::Null,
            (false, true) => CollectionState::Empty,
            (false, false) => CollectionState::Populated,
        }
    }
}

impl<T> Default for NullableCollection<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Vec<T>> for NullableCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            is_null: false,
        }
    }
}

impl<T> From<Option<Vec<T>>> for NullableCollection<T> {
    fn from(items: Option<Vec<T>>) -> Self {
        items.map_or_else(Self::null, Self::from)
    }
}

impl<T: Serialize> Serialize for NullableCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_null {
            serializer.serialize_none()
        } else {
            self.items.serialize(serializer)
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NullableCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Vec<T>>::deserialize(deserializer).map(Self::from)
    }
}

/// `deserialize_with` helper for `Option<NullableCollection<T>>` fields:
/// absent stays `None` (via `#[serde(default)]`), `null` becomes `Some(null())`.
pub fn deserialize_present<'de, D, T>(
    deserializer: D,
) -> Result<Option<NullableCollection<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    NullableCollection::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "deserialize_present"
        )]
        servers: Option<NullableCollection<String>>,
    }

    #[test]
    fn encodes_three_distinct_literals() {
        assert_eq!(
            serde_json::to_string(&NullableCollection::<u8>::null()).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::to_string(&NullableCollection::<u8>::empty()).unwrap(),
            "[]"
        );
        assert_eq!(
            serde_json::to_string(&NullableCollection::from(vec![1u8, 2])).unwrap(),
            "[1,2]"
        );
    }

    #[test]
    fn null_on_the_wire_sets_the_flag() {
        let decoded: NullableCollection<u8> = serde_json::from_str("null").unwrap();
        assert!(decoded.is_null());
        assert!(decoded.items().is_empty());

        let decoded: NullableCollection<u8> = serde_json::from_str("[]").unwrap();
        assert!(!decoded.is_null());
        assert_eq!(decoded.state(), CollectionState::Empty);
    }

    #[test]
    fn parent_field_distinguishes_absent_from_null() {
        let absent: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(absent.servers.is_none());

        let null: Holder = serde_json::from_value(json!({ "servers": null })).unwrap();
        assert_eq!(null.servers.map(|s| s.state()), Some(CollectionState::Null));

        let cleared: Holder = serde_json::from_value(json!({ "servers": [] })).unwrap();
        assert_eq!(
            cleared.servers.map(|s| s.state()),
            Some(CollectionState::Empty)
        );
    }

    #[test]
    fn parent_field_omitted_when_absent() {
        let holder = Holder { servers: None };
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({}));

        let holder = Holder {
            servers: Some(NullableCollection::empty()),
        };
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            json!({ "servers": [] })
        );
    }

    #[test]
    fn into_items_hides_null() {
        assert_eq!(NullableCollection::<u8>::null().into_items(), None);
        assert_eq!(NullableCollection::<u8>::empty().into_items(), Some(vec![]));
    }

    proptest! {
        #[test]
        fn decode_encode_preserves_state(items in proptest::option::of(prop::collection::vec(any::<u32>(), 0..8))) {
            let original = NullableCollection::from(items);
            let encoded = serde_json::to_string(&original).unwrap();
            let decoded: NullableCollection<u32> = serde_json::from_str(&encoded).unwrap();

            prop_assert_eq!(decoded.state(), original.state());
            prop_assert_eq!(decoded, original);
        }
    }
}
