//! Envelope mailbox addresses, as they appear in `MAIL FROM`/`RCPT TO`
//! paths and in the address portion of an `ORCPT` parameter.
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, satisfy};
use nom::combinator::{all_consuming, recognize};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, preceded, separated_pair};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("invalid address syntax in '{text}' at offset {offset}")]
    Syntax { text: String, offset: usize },
}

fn is_utf8_non_ascii(c: char) -> bool {
    c as u32 >= 0x80
}

fn is_atext(c: char) -> bool {
    match c {
        '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '/' | '=' | '?' | '^' | '_'
        | '`' | '{' | '|' | '}' | '~' => true,
        c => c.is_ascii_alphanumeric() || is_utf8_non_ascii(c),
    }
}

// RFC5321 4.1.2: qtextSMTP = %d32-33 / %d35-91 / %d93-126
fn is_qtext_smtp(c: char) -> bool {
    match c {
        ' ' | '!' | '\u{23}'..='\u{5b}' | '\u{5d}'..='\u{7e}' => true,
        c => is_utf8_non_ascii(c),
    }
}

// quoted-pairSMTP = %d92 %d32-126
fn is_quoted_pair_smtp(c: char) -> bool {
    matches!(c, ' '..='~')
}

fn is_dtext(c: char) -> bool {
    match c {
        '\u{21}'..='\u{5a}' | '\u{5e}'..='\u{7e}' => true,
        c => is_utf8_non_ascii(c),
    }
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || is_utf8_non_ascii(c)
}

// dot_atom = { atext+ ~ ("." ~ atext+)* }
fn dot_atom(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), take_while1(is_atext))).parse(input)
}

// quoted_string = { "\"" ~ (qtext_smtp | "\\" ~ quoted_pair_smtp)* ~ "\"" }
fn quoted_string(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0(alt((
            recognize(satisfy(is_qtext_smtp)),
            recognize(preceded(char('\\'), satisfy(is_quoted_pair_smtp))),
        ))),
        char('"'),
    ))
    .parse(input)
}

fn local_part(input: &str) -> IResult<&str, &str> {
    alt((dot_atom, quoted_string)).parse(input)
}

// domain = { label ~ ("." ~ label)* }
fn domain_name(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), take_while1(is_label_char))).parse(input)
}

// address_literal = { "[" ~ dtext+ ~ "]" }
fn address_literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('['), take_while1(is_dtext), char(']'))).parse(input)
}

fn domain(input: &str) -> IResult<&str, &str> {
    alt((address_literal, domain_name)).parse(input)
}

fn addr_spec(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(local_part, char('@'), domain).parse(input)
}

/// A syntactically valid `local-part@domain` mailbox.
///
/// The local part is kept exactly as written (including any quoting),
/// while domain names are compared case-insensitively and so are stored
/// in lowercase. Address literals are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MailAddress {
    local_part: String,
    domain: String,
}

impl MailAddress {
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.is_empty() {
            return Err(AddressError::Empty);
        }

        match all_consuming(addr_spec).parse(text) {
            Ok((_, (local_part, domain))) => Ok(Self {
                local_part: local_part.to_string(),
                domain: if domain.starts_with('[') {
                    domain.to_string()
                } else {
                    domain.to_ascii_lowercase()
                },
            }),
            Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(AddressError::Syntax {
                text: text.to_string(),
                offset: text.len() - err.input.len(),
            }),
            Err(nom::Err::Incomplete(_)) => Err(AddressError::Syntax {
                text: text.to_string(),
                offset: text.len(),
            }),
        }
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

impl FromStr for MailAddress {
    type Err = AddressError;
    fn from_str(text: &str) -> Result<Self, AddressError> {
        Self::parse(text)
    }
}

impl TryFrom<String> for MailAddress {
    type Error = AddressError;
    fn try_from(text: String) -> Result<Self, AddressError> {
        Self::parse(&text)
    }
}

impl From<MailAddress> for String {
    fn from(addr: MailAddress) -> String {
        addr.to_string()
    }
}
