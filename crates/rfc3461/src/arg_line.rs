use crate::DsnError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsmtpParameter {
    pub name: String,
    pub value: Option<String>,
}

impl EsmtpParameter {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for EsmtpParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

// esmtp-keyword = (ALPHA / DIGIT) *(ALPHA / DIGIT / "-")
fn is_esmtp_keyword(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

// esmtp-value = 1*(%d33-60 / %d62-126)
fn is_esmtp_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 33..=60 | 62..=126))
}

/// The keyword/value pairs that follow the path of a `MAIL FROM`
/// or `RCPT TO` command.
///
/// ESMTP keywords are case-insensitive, so they are held in uppercase
/// and looked up without regard to case. Values are kept verbatim.
/// A keyword that was sent without a value maps to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgLine(BTreeMap<String, String>);

impl ArgLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the space separated parameter portion of a command line,
    /// for example `RET=HDRS ENVID=QQ314159`
    pub fn parse(text: &str) -> Result<Self, DsnError> {
        let mut args = Self::new();
        for token in text.split_ascii_whitespace() {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => {
                    if !is_esmtp_value(value) {
                        return Err(DsnError::InvalidArgLine(token.to_string()));
                    }
                    (name, value)
                }
                None => (token, ""),
            };
            if !is_esmtp_keyword(name) {
                return Err(DsnError::InvalidArgLine(token.to_string()));
            }
            args.insert(name, value)?;
        }
        Ok(args)
    }

    pub fn from_parameters(params: &[EsmtpParameter]) -> Result<Self, DsnError> {
        let mut args = Self::new();
        for p in params {
            args.insert(&p.name, p.value.as_deref().unwrap_or(""))?;
        }
        Ok(args)
    }

    /// Adds a parameter, failing if the keyword is already present
    pub fn insert<V: Into<String>>(&mut self, name: &str, value: V) -> Result<(), DsnError> {
        let name = name.to_ascii_uppercase();
        if self.0.contains_key(&name) {
            return Err(DsnError::DuplicateParameter(name));
        }
        self.0.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_uppercase()).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for ArgLine {
    type Err = DsnError;
    fn from_str(text: &str) -> Result<Self, DsnError> {
        Self::parse(text)
    }
}

/// Collects pairs as-is; later duplicates replace earlier ones.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ArgLine {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_uppercase(), v.into()))
                .collect(),
        )
    }
}
