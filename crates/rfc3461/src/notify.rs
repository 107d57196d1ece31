use crate::{ArgLine, DsnError, NOTIFY_PARAMETER};
use mail_attributes::AttributeValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The situations in which a notification should be emitted
/// for a given recipient.
///
/// <https://tools.ietf.org/html/rfc3461#section-4.1>
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Notify {
    Never,
    Success,
    Failure,
    Delay,
}

impl Notify {
    pub const ALL: [Notify; 4] = [Self::Never, Self::Success, Self::Failure, Self::Delay];

    /// Matches a single token case-insensitively
    pub fn parse_value(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(token))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "NEVER",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Delay => "DELAY",
        }
    }
}

impl fmt::Display for Notify {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NotifySet: u8 {
        const NEVER = 1;
        const SUCCESS = 2;
        const FAILURE = 4;
        const DELAY = 8;
    }
}

impl From<Notify> for NotifySet {
    fn from(n: Notify) -> NotifySet {
        match n {
            Notify::Never => NotifySet::NEVER,
            Notify::Success => NotifySet::SUCCESS,
            Notify::Failure => NotifySet::FAILURE,
            Notify::Delay => NotifySet::DELAY,
        }
    }
}

impl FromIterator<Notify> for NotifySet {
    fn from_iter<I: IntoIterator<Item = Notify>>(iter: I) -> Self {
        iter.into_iter()
            .fold(NotifySet::empty(), |set, n| set | NotifySet::from(n))
    }
}

impl NotifySet {
    /// Parses a comma separated NOTIFY list such as `SUCCESS,DELAY`.
    /// Segments are trimmed and empty segments are skipped.
    pub fn parse(input: &str) -> Result<Self, DsnError> {
        let mut set = NotifySet::empty();
        for token in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let value = Notify::parse_value(token)
                .ok_or_else(|| DsnError::InvalidNotify(token.to_string()))?;
            set |= NotifySet::from(value);
        }
        set.validate()
    }

    /// A NOTIFY set holds at least one value, and NEVER
    /// must not be combined with any other value
    pub fn validate(self) -> Result<Self, DsnError> {
        if self.is_empty() {
            return Err(DsnError::EmptyNotify);
        }
        if self.contains(NotifySet::NEVER) && self != NotifySet::NEVER {
            return Err(DsnError::NeverCombined);
        }
        Ok(self)
    }

    /// Iterates the members in canonical order
    pub fn values(&self) -> impl Iterator<Item = Notify> {
        let set = *self;
        Notify::ALL
            .into_iter()
            .filter(move |n| set.contains(NotifySet::from(*n)))
    }

    pub fn from_arg_line(args: &ArgLine) -> Result<Option<Self>, DsnError> {
        args.get(NOTIFY_PARAMETER).map(Self::parse).transpose()
    }

    pub fn from_attribute_value(value: &str) -> Result<Self, DsnError> {
        Self::parse(value)
    }

    pub fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::from(self.to_string())
    }
}

impl FromStr for NotifySet {
    type Err = DsnError;
    fn from_str(input: &str) -> Result<Self, DsnError> {
        Self::parse(input)
    }
}

impl fmt::Display for NotifySet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, n) in self.values().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            f.write_str(n.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for NotifySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotifySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
