use crate::{
    ArgLine, DsnConfig, DsnError, DsnParameters, EnvId, RecipientDsnParameters, Ret,
    ORCPT_PARAMETER,
};
use mail_address::MailAddress;
use std::collections::BTreeMap;

/// Accumulates the DSN parameters seen over the course of a single
/// mail transaction: one MAIL FROM followed by any number of RCPT TO.
///
/// A command whose parameters are rejected leaves the accumulated
/// state unchanged, so the client may retry it.
#[derive(Debug, Clone, Default)]
pub struct DsnTransaction {
    config: DsnConfig,
    envid: Option<EnvId>,
    ret: Option<Ret>,
    recipients: BTreeMap<MailAddress, RecipientDsnParameters>,
}

impl DsnTransaction {
    pub fn new(config: DsnConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Begins a new transaction using the RET and ENVID
    /// parameters of a MAIL FROM command
    pub fn mail_from(&mut self, args: &ArgLine) -> Result<(), DsnError> {
        let ret = Ret::from_arg_line(args)?;
        let envid = EnvId::from_arg_line(args);
        if let Some(envid) = &envid {
            self.config.check_envid(envid)?;
        }

        self.reset();
        self.ret = ret;
        self.envid = envid;
        Ok(())
    }

    /// Records the NOTIFY and ORCPT parameters of a RCPT TO command
    pub fn rcpt_to(&mut self, recipient: MailAddress, args: &ArgLine) -> Result<(), DsnError> {
        if let Some(orcpt) = args.get(ORCPT_PARAMETER) {
            self.config.check_orcpt(orcpt)?;
        }
        let Some(params) = RecipientDsnParameters::from_arg_line(args)? else {
            return Ok(());
        };

        if self.config.reject_duplicate_recipients && self.recipients.contains_key(&recipient) {
            return Err(DsnError::DuplicateRecipient(recipient.to_string()));
        }

        tracing::debug!("recorded DSN parameters for {recipient}: {params:?}");
        self.recipients.insert(recipient, params);
        Ok(())
    }

    /// Discards everything accumulated so far, as for RSET
    pub fn reset(&mut self) {
        self.envid = None;
        self.ret = None;
        self.recipients.clear();
    }

    pub fn build(&self) -> Option<DsnParameters> {
        DsnParameters::of(self.envid.clone(), self.ret, self.recipients.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::NotifySet;

    fn addr(s: &str) -> MailAddress {
        MailAddress::parse(s).unwrap()
    }

    fn args(s: &str) -> ArgLine {
        ArgLine::parse(s).unwrap()
    }

    #[test]
    fn no_parameters() {
        let mut txn = DsnTransaction::default();
        txn.mail_from(&args("SIZE=1234")).unwrap();
        txn.rcpt_to(addr("alice@x.com"), &args("")).unwrap();
        k9::assert_equal!(txn.build(), None);
    }

    #[test]
    fn accumulate() {
        let mut txn = DsnTransaction::default();
        txn.mail_from(&args("RET=hdrs ENVID=QQ314159")).unwrap();
        txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=SUCCESS")).unwrap();
        txn.rcpt_to(addr("bob@x.com"), &args("")).unwrap();

        let params = txn.build().unwrap();
        k9::assert_equal!(params.ret(), Some(Ret::Hdrs));
        k9::assert_equal!(params.envid(), Some(&EnvId::of("QQ314159")));
        k9::assert_equal!(params.recipients().len(), 1);
        k9::assert_equal!(
            params.recipient(&addr("alice@x.com")),
            Some(&RecipientDsnParameters::with_notify(NotifySet::SUCCESS).unwrap())
        );
    }

    #[test]
    fn rejected_command_keeps_state() {
        let mut txn = DsnTransaction::default();
        txn.mail_from(&args("RET=FULL")).unwrap();
        k9::assert_equal!(
            txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=NEVER,SUCCESS")),
            Err(DsnError::NeverCombined)
        );
        k9::assert_equal!(
            txn.rcpt_to(addr("alice@x.com"), &args("ORCPT=alice@x.com")),
            Err(DsnError::MissingOrcptPrefix("alice@x.com".to_string()))
        );
        txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=NEVER")).unwrap();

        k9::assert_equal!(
            txn.mail_from(&args("RET=SOME")),
            Err(DsnError::InvalidRet("SOME".to_string()))
        );
        let params = txn.build().unwrap();
        k9::assert_equal!(params.ret(), Some(Ret::Full));
        k9::assert_equal!(params.recipients().len(), 1);
    }

    #[test]
    fn duplicate_recipients() {
        let mut txn = DsnTransaction::default();
        txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=SUCCESS")).unwrap();
        k9::assert_equal!(
            txn.rcpt_to(addr("alice@X.com"), &args("NOTIFY=DELAY")),
            Err(DsnError::DuplicateRecipient("alice@x.com".to_string()))
        );

        let mut txn = DsnTransaction::new(DsnConfig {
            reject_duplicate_recipients: false,
            ..Default::default()
        });
        txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=SUCCESS")).unwrap();
        txn.rcpt_to(addr("alice@x.com"), &args("NOTIFY=DELAY")).unwrap();
        k9::assert_equal!(
            txn.build().unwrap().recipient(&addr("alice@x.com")),
            Some(&RecipientDsnParameters::with_notify(NotifySet::DELAY).unwrap())
        );
    }

    #[test]
    fn limits() {
        let mut txn = DsnTransaction::new(DsnConfig {
            max_envid_length: Some(8),
            max_orcpt_length: Some(20),
            ..Default::default()
        });
        k9::assert_equal!(
            txn.mail_from(&args("ENVID=123456789")),
            Err(DsnError::EnvIdTooLong { len: 9, max: 8 })
        );
        k9::assert_equal!(
            txn.rcpt_to(addr("a@x.com"), &args("ORCPT=rfc822;abcdefgh@x.com")),
            Err(DsnError::OrcptTooLong { len: 21, max: 20 })
        );
        k9::assert_equal!(txn.build(), None);
    }

    #[test]
    fn reset() {
        let mut txn = DsnTransaction::default();
        txn.mail_from(&args("ENVID=abc")).unwrap();
        txn.rcpt_to(addr("a@x.com"), &args("NOTIFY=FAILURE")).unwrap();
        txn.reset();
        k9::assert_equal!(txn.build(), None);

        txn.mail_from(&args("RET=FULL")).unwrap();
        k9::assert_equal!(txn.build().unwrap().envid(), None);
    }
}
