//! SMTP Delivery Status Notification parameters.
//!
//! Parses the `RET` and `ENVID` parameters of `MAIL FROM` and the
//! `NOTIFY` and `ORCPT` parameters of `RCPT TO` into [`DsnParameters`],
//! and carries them through the attribute store of a message.
//!
//! <https://tools.ietf.org/html/rfc3461>
mod arg_line;
mod attributes;
mod config;
mod envid;
mod error;
mod notify;
mod params;
mod recipient;
mod ret;
mod transaction;

pub use arg_line::{ArgLine, EsmtpParameter};
pub use attributes::{
    DsnAttributeValues, ENVID_ATTRIBUTE, NOTIFY_ATTRIBUTE, ORCPT_ATTRIBUTE, RET_ATTRIBUTE,
};
pub use config::DsnConfig;
pub use envid::EnvId;
pub use error::DsnError;
pub use mail_address::{AddressError, MailAddress};
pub use notify::{Notify, NotifySet};
pub use params::DsnParameters;
pub use recipient::RecipientDsnParameters;
pub use ret::Ret;
pub use transaction::DsnTransaction;

pub const NOTIFY_PARAMETER: &str = "NOTIFY";
pub const ORCPT_PARAMETER: &str = "ORCPT";
pub const ENVID_PARAMETER: &str = "ENVID";
pub const RET_PARAMETER: &str = "RET";
pub const RFC822_PREFIX: &str = "rfc822;";
