//! Support for provider objects discriminated by a `type` field.
//!
//! Notion encodes sub-types as `{"type": "<kind>", "<kind>": <data>, ...}`.
//! Types implementing [`Tagged`] parse the kinds they know and keep anything
//! else (or anything malformed) as raw JSON, so re-serializing never loses
//! fields the provider sent.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

pub(crate) trait Tagged: Sized {
    /// Builds the value from its kind and the data stored under that kind.
    ///
    /// Infallible: unknown kinds and payloads that do not fit the known
    /// shape become the type's opaque variant.
    fn from_parts(kind: String, data: Value) -> Self;

    /// Splits the value back into its kind and data.
    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error>;
}

/// Parses `data` as `T`, or `None` if it does not fit.
pub(crate) fn typed<T: DeserializeOwned>(data: &Value) -> Option<T> {
    serde_json::from_value(data.clone()).ok()
}

/// Encodes a known variant's payload.
pub(crate) fn encode<'a, T: serde::Serialize>(
    kind: &'a str,
    data: &T,
) -> Result<(&'a str, Value), serde_json::Error> {
    Ok((kind, serde_json::to_value(data)?))
}

pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Tagged,
{
    let mut fields = Map::<String, Value>::deserialize(deserializer)?;
    let kind = match fields.remove("type") {
        Some(Value::String(kind)) => kind,
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected `type` to be a string, found {other}"
            )));
        }
        // Request bodies may omit `type` when the kind is the only key.
        None if fields.len() == 1 => fields.keys().next().cloned().unwrap_or_default(),
        None => return Err(D::Error::missing_field("type")),
    };
    let data = fields.remove(&kind).unwrap_or(Value::Null);
    Ok(T::from_parts(kind, data))
}

pub(crate) fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Tagged,
{
    let (kind, data) = value.to_parts().map_err(S::Error::custom)?;
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("type", kind)?;
    map.serialize_entry(kind, &data)?;
    map.end()
}

/// Implements `Serialize`/`Deserialize` through [`Tagged`].
macro_rules! tagged_serde {
    ($($ty:ty),+ $(,)?) => {$(
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::notion::models::tagged::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::notion::models::tagged::deserialize(deserializer)
            }
        }
    )+};
}

pub(crate) use tagged_serde;
