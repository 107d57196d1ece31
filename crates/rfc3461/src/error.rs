use mail_address::AddressError;
use thiserror::Error;

/// Every failure here is a rejected piece of transaction input;
/// the SMTP front end decides how to reply to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DsnError {
    #[error("{0} is not a supported value for RET DSN parameter")]
    InvalidRet(String),
    #[error("{0} could not be associated with any RCPT NOTIFY value")]
    InvalidNotify(String),
    #[error("RCPT NOTIFY requires at least one value")]
    EmptyNotify,
    #[error("RCPT NOTIFY should not contain other values when containing NEVER")]
    NeverCombined,
    #[error("ORCPT must start with the rfc822 prefix, got {0}")]
    MissingOrcptPrefix(String),
    #[error("{text} could not be parsed")]
    InvalidAddress {
        text: String,
        #[source]
        source: AddressError,
    },
    #[error("{0} parameter was specified more than once")]
    DuplicateParameter(String),
    #[error("DSN parameters for recipient {0} were specified more than once")]
    DuplicateRecipient(String),
    #[error("ENVID is {len} bytes long, exceeding the limit of {max}")]
    EnvIdTooLong { len: usize, max: usize },
    #[error("ORCPT is {len} bytes long, exceeding the limit of {max}")]
    OrcptTooLong { len: usize, max: usize },
    #[error("invalid ESMTP parameter {0}")]
    InvalidArgLine(String),
}

impl DsnError {
    pub(crate) fn invalid_address(text: &str, source: AddressError) -> Self {
        Self::InvalidAddress {
            text: text.to_string(),
            source,
        }
    }

    /// Suggests the SMTP reply code and enhanced status code
    /// for rejecting the command that produced this error
    pub fn smtp_reply(&self) -> (u16, &'static str) {
        match self {
            Self::InvalidAddress { .. } => (553, "5.1.3"),
            Self::EnvIdTooLong { .. } | Self::OrcptTooLong { .. } => (501, "5.5.2"),
            _ => (501, "5.5.4"),
        }
    }
}
