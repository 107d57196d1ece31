use crate::{ArgLine, DsnError, RET_PARAMETER};
use mail_attributes::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RET lets the sender control how much of the original message
/// is returned in a failure report: the full content, or just the headers.
///
/// <https://tools.ietf.org/html/rfc3461#section-4.3>
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ret {
    Full,
    Hdrs,
}

impl Ret {
    /// Matches the token case-insensitively
    pub fn parse(token: &str) -> Option<Self> {
        [Self::Full, Self::Hdrs]
            .into_iter()
            .find(|ret| ret.as_str().eq_ignore_ascii_case(token))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Hdrs => "HDRS",
        }
    }

    pub fn from_arg_line(args: &ArgLine) -> Result<Option<Self>, DsnError> {
        args.get(RET_PARAMETER).map(Self::from_str).transpose()
    }

    pub fn from_attribute_value(value: &str) -> Result<Self, DsnError> {
        value.parse()
    }

    pub fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::from(self.as_str())
    }
}

impl FromStr for Ret {
    type Err = DsnError;
    fn from_str(token: &str) -> Result<Self, DsnError> {
        Self::parse(token).ok_or_else(|| DsnError::InvalidRet(token.to_string()))
    }
}

impl fmt::Display for Ret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        for token in ["full", "FULL", "Full"] {
            k9::assert_equal!(Ret::parse(token), Some(Ret::Full));
        }
        for token in ["hdrs", "HDRS", "Hdrs"] {
            k9::assert_equal!(Ret::parse(token), Some(Ret::Hdrs));
        }
        for token in ["", "headers", "FULL ", "fulll"] {
            k9::assert_equal!(Ret::parse(token), None);
        }
    }

    #[test]
    fn format_is_uppercase() {
        k9::assert_equal!(Ret::parse("hdrs").unwrap().to_string(), "HDRS");
        k9::assert_equal!(Ret::Full.to_attribute_value(), AttributeValue::from("FULL"));
    }

    #[test]
    fn from_arg_line() {
        let args = ArgLine::parse("RET=full").unwrap();
        k9::assert_equal!(Ret::from_arg_line(&args), Ok(Some(Ret::Full)));

        let args = ArgLine::parse("ENVID=abc").unwrap();
        k9::assert_equal!(Ret::from_arg_line(&args), Ok(None));

        let args = ArgLine::parse("RET=BODY").unwrap();
        k9::snapshot!(
            Ret::from_arg_line(&args),
            r#"
Err(
    InvalidRet(
        "BODY",
    ),
)
"#
        );
    }

    #[test]
    fn from_attribute_value() {
        k9::assert_equal!(Ret::from_attribute_value("HDRS"), Ok(Ret::Hdrs));
        k9::assert_equal!(
            Ret::from_attribute_value("nope").unwrap_err().to_string(),
            "nope is not a supported value for RET DSN parameter"
        );
    }

    #[test]
    fn serde() {
        k9::assert_equal!(serde_json::to_string(&Ret::Hdrs).unwrap(), "\"HDRS\"");
        k9::assert_equal!(serde_json::from_str::<Ret>("\"FULL\"").unwrap(), Ret::Full);
    }
}
