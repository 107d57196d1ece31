use crate::{EnvId, EsmtpParameter, RecipientDsnParameters, Ret, ENVID_PARAMETER, RET_PARAMETER};
use mail_address::MailAddress;
use std::collections::BTreeMap;

/// Represents the DSN parameters attached to the envelope of a message
/// transiting over SMTP.
///
/// An instance only exists when at least one of its fields carries
/// something; see [`DsnParameters::of`].
///
/// <https://tools.ietf.org/html/rfc3461>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsnParameters {
    envid: Option<EnvId>,
    ret: Option<Ret>,
    recipients: BTreeMap<MailAddress, RecipientDsnParameters>,
}

impl DsnParameters {
    /// Returns None if every field is empty
    pub fn of(
        envid: Option<EnvId>,
        ret: Option<Ret>,
        recipients: BTreeMap<MailAddress, RecipientDsnParameters>,
    ) -> Option<Self> {
        if envid.is_none() && ret.is_none() && recipients.is_empty() {
            return None;
        }
        Some(Self {
            envid,
            ret,
            recipients,
        })
    }

    pub fn envid(&self) -> Option<&EnvId> {
        self.envid.as_ref()
    }

    pub fn ret(&self) -> Option<Ret> {
        self.ret
    }

    pub fn recipients(&self) -> &BTreeMap<MailAddress, RecipientDsnParameters> {
        &self.recipients
    }

    pub fn recipient(&self, recipient: &MailAddress) -> Option<&RecipientDsnParameters> {
        self.recipients.get(recipient)
    }

    /// Produces the MAIL FROM parameters for relaying this
    /// transaction onwards
    pub fn mail_from_parameters(&self) -> Vec<EsmtpParameter> {
        let mut params = vec![];
        if let Some(ret) = self.ret {
            params.push(EsmtpParameter::new(RET_PARAMETER, ret.as_str()));
        }
        if let Some(envid) = &self.envid {
            params.push(EsmtpParameter::new(ENVID_PARAMETER, envid.as_str()));
        }
        params
    }
}
