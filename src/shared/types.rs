use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional field that remembers whether it was ever set.
///
/// `Unset` (field missing), `Null` (explicitly absent) and `Value` stay
/// distinct through a serde round trip. Pair with
/// `#[serde(default, skip_serializing_if = "Tristate::is_unset")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tristate<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Default for Tristate<T> {
    fn default() -> Self {
        Tristate::Unset
    }
}

impl<T> Tristate<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Tristate::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tristate::Null)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Tristate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Tristate::Value(v),
            None => Tristate::Null,
        }
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tristate::Value(v) => serializer.serialize_some(v),
            Tristate::Null | Tristate::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Tristate::from)
    }
}
