//! Reference list adapter
//!
//! In memory a reference-valued list holds structs; on the wire it is a plain
//! array of reference strings. Use with
//! `#[serde(with = "crate::codec::reference_list")]`.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serializer};

/// Anything embedded in a parent object only by its store reference.
pub trait Referenced {
    fn reference(&self) -> &str;
    fn from_reference(reference: String) -> Self;
}

pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Referenced,
{
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item.reference())?;
    }
    seq.end()
}

/// Accepts `null` as an empty list.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Referenced,
{
    let references = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(references
        .unwrap_or_default()
        .into_iter()
        .map(T::from_reference)
        .collect())
}
