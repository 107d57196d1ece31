use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("json {kind} values cannot be represented as an attribute value")]
    UnsupportedJson { kind: &'static str },
}

/// The name under which an attribute is attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(Cow<'static, str>);

impl AttributeName {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttributeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A value held in the attribute store: either an opaque string,
/// or a mapping from string to further values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            Self::String(_) => None,
            Self::Map(map) => Some(map),
        }
    }

    /// If this is a map whose values are all strings, returns a copy
    /// of it with the values unwrapped.
    /// Returns None for strings and for maps containing nested maps.
    pub fn as_string_map(&self) -> Option<BTreeMap<String, String>> {
        let map = self.as_map()?;
        map.iter()
            .map(|(k, v)| v.as_str().map(|v| (k.to_string(), v.to_string())))
            .collect()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Map(_) => "map",
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<BTreeMap<String, AttributeValue>> for AttributeValue {
    fn from(map: BTreeMap<String, AttributeValue>) -> Self {
        Self::Map(map)
    }
}

impl From<BTreeMap<String, String>> for AttributeValue {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(
            map.into_iter()
                .map(|(k, v)| (k, AttributeValue::String(v)))
                .collect(),
        )
    }
}

impl TryFrom<serde_json::Value> for AttributeValue {
    type Error = AttributeError;

    fn try_from(value: serde_json::Value) -> Result<Self, AttributeError> {
        use serde_json::Value;
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Object(obj) => {
                let mut map = BTreeMap::new();
                for (k, v) in obj {
                    map.insert(k, Self::try_from(v)?);
                }
                Ok(Self::Map(map))
            }
            Value::Null => Err(AttributeError::UnsupportedJson { kind: "null" }),
            Value::Bool(_) => Err(AttributeError::UnsupportedJson { kind: "boolean" }),
            Value::Number(_) => Err(AttributeError::UnsupportedJson { kind: "number" }),
            Value::Array(_) => Err(AttributeError::UnsupportedJson { kind: "array" }),
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> serde_json::Value {
        match value {
            AttributeValue::String(s) => serde_json::Value::String(s),
            AttributeValue::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: AttributeName,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new<V: Into<AttributeValue>>(name: AttributeName, value: V) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

pub type AttributeMap = BTreeMap<AttributeName, AttributeValue>;
