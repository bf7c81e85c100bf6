use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A decoded response body from the agenda service.
///
/// The service has no fixed schema: a body is either a single object or an
/// array of objects with arbitrary keys. Anything else is kept as a scalar so
/// it can still be displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Scalar(Value),
}

/// Borrowed view of one element for card rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Object(&'a Map<String, Value>),
    /// An element that is not an object (malformed for card purposes).
    Other(&'a Value),
}

impl<'a> Entry<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(map),
            other => Self::Other(other),
        }
    }
}

impl SearchResult {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => Self::Array(items),
            other => Self::Scalar(other),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map.clone()),
            Self::Array(items) => Value::Array(items.clone()),
            Self::Scalar(value) => value.clone(),
        }
    }

    /// Elements in order. A non-array result is a single element.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        match self {
            Self::Array(items) => items.iter().map(Entry::of).collect(),
            Self::Object(map) => vec![Entry::Object(map)],
            Self::Scalar(value) => vec![Entry::Other(value)],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(_) | Self::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Value> for SearchResult {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(map) => map.serialize(serializer),
            Self::Array(items) => items.serialize(serializer),
            Self::Scalar(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SearchResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
