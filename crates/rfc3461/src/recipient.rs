use crate::{
    ArgLine, DsnError, EsmtpParameter, NotifySet, NOTIFY_PARAMETER, ORCPT_PARAMETER,
    RFC822_PREFIX,
};
use mail_address::MailAddress;

/// Holds the NOTIFY and ORCPT parameters for a specific recipient.
/// At least one of the two is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipientDsnParameters {
    notify: Option<NotifySet>,
    orcpt: Option<MailAddress>,
}

impl RecipientDsnParameters {
    /// Returns None when neither parameter is present.
    /// A NOTIFY set that could not have been parsed from a
    /// command (empty, or NEVER combined with others) is rejected.
    pub fn of(
        notify: Option<NotifySet>,
        orcpt: Option<MailAddress>,
    ) -> Result<Option<Self>, DsnError> {
        let notify = notify.map(NotifySet::validate).transpose()?;
        if notify.is_none() && orcpt.is_none() {
            return Ok(None);
        }
        Ok(Some(Self { notify, orcpt }))
    }

    pub fn with_notify(notify: NotifySet) -> Result<Self, DsnError> {
        Ok(Self {
            notify: Some(notify.validate()?),
            orcpt: None,
        })
    }

    pub fn with_orcpt(orcpt: MailAddress) -> Self {
        Self {
            notify: None,
            orcpt: Some(orcpt),
        }
    }

    pub fn with_notify_and_orcpt(notify: NotifySet, orcpt: MailAddress) -> Result<Self, DsnError> {
        Ok(Self {
            notify: Some(notify.validate()?),
            orcpt: Some(orcpt),
        })
    }

    pub fn from_arg_line(args: &ArgLine) -> Result<Option<Self>, DsnError> {
        let notify = NotifySet::from_arg_line(args)?;
        let orcpt = args.get(ORCPT_PARAMETER).map(Self::parse_orcpt).transpose()?;
        Self::of(notify, orcpt)
    }

    /// Parses an `rfc822;user@domain` ORCPT value.
    /// The address type prefix is matched case-sensitively.
    pub fn parse_orcpt(input: &str) -> Result<MailAddress, DsnError> {
        let address = input
            .strip_prefix(RFC822_PREFIX)
            .ok_or_else(|| DsnError::MissingOrcptPrefix(input.to_string()))?;
        MailAddress::parse(address).map_err(|err| DsnError::invalid_address(address, err))
    }

    pub fn notify(&self) -> Option<NotifySet> {
        self.notify
    }

    pub fn orcpt(&self) -> Option<&MailAddress> {
        self.orcpt.as_ref()
    }

    /// Produces the parameters for relaying this recipient onwards
    pub fn to_esmtp_parameters(&self) -> Vec<EsmtpParameter> {
        let mut params = vec![];
        if let Some(notify) = &self.notify {
            params.push(EsmtpParameter::new(NOTIFY_PARAMETER, notify.to_string()));
        }
        if let Some(orcpt) = &self.orcpt {
            params.push(EsmtpParameter::new(
                ORCPT_PARAMETER,
                format!("{RFC822_PREFIX}{orcpt}"),
            ));
        }
        params
    }
}
