use crate::{ArgLine, ENVID_PARAMETER};
use mail_attributes::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ENVID allows the sender to correlate a bounce with a submission.
/// It is opaque to us and is carried through without any normalization.
///
/// <https://tools.ietf.org/html/rfc3461#section-4.4>
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvId(String);

impl EnvId {
    pub fn of<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn from_arg_line(args: &ArgLine) -> Option<Self> {
        args.get(ENVID_PARAMETER).map(Self::of)
    }

    pub fn from_attribute_value(value: &str) -> Self {
        Self::of(value)
    }

    pub fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::from(self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
