use crate::{DsnError, EnvId};
use serde::{Deserialize, Serialize};

/// Limits applied while accepting DSN parameters from a client.
/// The defaults apply no limits beyond the syntax checks that
/// the parameters always receive.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DsnConfig {
    /// Reject an ENVID longer than this many bytes.
    /// RFC 3461 limits it to 100.
    #[serde(default)]
    pub max_envid_length: Option<usize>,

    /// Reject an ORCPT value, including its address type prefix,
    /// longer than this many bytes. RFC 3461 limits it to 500.
    #[serde(default)]
    pub max_orcpt_length: Option<usize>,

    /// When true, a second RCPT TO carrying DSN parameters for a
    /// recipient that already has them is an error. Otherwise the
    /// later parameters replace the earlier ones.
    #[serde(default = "DsnConfig::default_reject_duplicate_recipients")]
    pub reject_duplicate_recipients: bool,
}

impl Default for DsnConfig {
    fn default() -> Self {
        Self {
            max_envid_length: None,
            max_orcpt_length: None,
            reject_duplicate_recipients: Self::default_reject_duplicate_recipients(),
        }
    }
}

impl DsnConfig {
    fn default_reject_duplicate_recipients() -> bool {
        true
    }

    pub fn check_envid(&self, envid: &EnvId) -> Result<(), DsnError> {
        match self.max_envid_length {
            Some(max) if envid.as_str().len() > max => Err(DsnError::EnvIdTooLong {
                len: envid.as_str().len(),
                max,
            }),
            _ => Ok(()),
        }
    }

    pub fn check_orcpt(&self, orcpt: &str) -> Result<(), DsnError> {
        match self.max_orcpt_length {
            Some(max) if orcpt.len() > max => Err(DsnError::OrcptTooLong {
                len: orcpt.len(),
                max,
            }),
            _ => Ok(()),
        }
    }
}
