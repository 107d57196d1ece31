//! Projects [`DsnParameters`] onto the attribute store carried by a
//! message, so that later stages can consult them without re-parsing
//! the SMTP parameters.
use crate::{DsnError, DsnParameters, EnvId, NotifySet, RecipientDsnParameters, Ret};
use mail_address::MailAddress;
use mail_attributes::{Attribute, AttributeMap, AttributeName, AttributeStore, AttributeValue};
use std::collections::{BTreeMap, BTreeSet};

pub const ENVID_ATTRIBUTE: AttributeName = AttributeName::from_static("dsn-envid");
pub const RET_ATTRIBUTE: AttributeName = AttributeName::from_static("dsn-ret");
pub const NOTIFY_ATTRIBUTE: AttributeName = AttributeName::from_static("dsn-notify");
pub const ORCPT_ATTRIBUTE: AttributeName = AttributeName::from_static("dsn-orcpt");

/// The raw attribute form of the DSN parameters.
///
/// `notify` and `orcpt` map the recipient address string to the
/// per-recipient value: the comma joined NOTIFY tokens, and the
/// bare ORCPT address (without the `rfc822;` prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DsnAttributeValues {
    pub envid: Option<String>,
    pub ret: Option<String>,
    pub notify: Option<BTreeMap<String, String>>,
    pub orcpt: Option<BTreeMap<String, String>>,
}

fn extract_string(attributes: &AttributeMap, name: &AttributeName) -> Option<String> {
    let value = attributes.get(name)?;
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            tracing::trace!("ignoring {name} attribute: expected string, found {}", value.kind());
            None
        }
    }
}

fn extract_string_map(
    attributes: &AttributeMap,
    name: &AttributeName,
) -> Option<BTreeMap<String, String>> {
    let value = attributes.get(name)?;
    let map = value.as_string_map();
    if map.is_none() {
        tracing::trace!(
            "ignoring {name} attribute: expected map of strings, found {}",
            value.kind()
        );
    }
    map
}

impl DsnAttributeValues {
    /// Picks out the DSN attributes. Attributes that are not of the
    /// expected shape are treated as absent.
    pub fn extract(attributes: &AttributeMap) -> Self {
        Self {
            envid: extract_string(attributes, &ENVID_ATTRIBUTE),
            ret: extract_string(attributes, &RET_ATTRIBUTE),
            notify: extract_string_map(attributes, &NOTIFY_ATTRIBUTE),
            orcpt: extract_string_map(attributes, &ORCPT_ATTRIBUTE),
        }
    }

    /// Reads the DSN attributes from a store
    pub fn load(store: &impl AttributeStore) -> anyhow::Result<Self> {
        let mut attributes = AttributeMap::new();
        for name in [ENVID_ATTRIBUTE, RET_ATTRIBUTE, NOTIFY_ATTRIBUTE, ORCPT_ATTRIBUTE] {
            if let Some(value) = store.attribute(&name)? {
                attributes.insert(name, value);
            }
        }
        Ok(Self::extract(&attributes))
    }

    pub fn as_attributes(&self) -> Vec<Attribute> {
        let mut result = vec![];
        if let Some(envid) = &self.envid {
            result.push(Attribute::new(ENVID_ATTRIBUTE, envid.as_str()));
        }
        if let Some(ret) = &self.ret {
            result.push(Attribute::new(RET_ATTRIBUTE, ret.as_str()));
        }
        if let Some(notify) = &self.notify {
            result.push(Attribute::new(NOTIFY_ATTRIBUTE, notify.clone()));
        }
        if let Some(orcpt) = &self.orcpt {
            result.push(Attribute::new(ORCPT_ATTRIBUTE, orcpt.clone()));
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.envid.is_none() && self.ret.is_none() && self.notify.is_none() && self.orcpt.is_none()
    }
}

fn parse_recipient_key(key: &str) -> Result<MailAddress, DsnError> {
    MailAddress::parse(key).map_err(|err| DsnError::invalid_address(key, err))
}

fn non_empty<K, V>(map: BTreeMap<K, V>) -> Option<BTreeMap<K, V>> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

impl DsnParameters {
    pub fn to_attributes(&self) -> DsnAttributeValues {
        let mut notify = BTreeMap::new();
        let mut orcpt = BTreeMap::new();
        for (rcpt, params) in self.recipients() {
            if let Some(n) = params.notify() {
                notify.insert(rcpt.to_string(), n.to_string());
            }
            if let Some(o) = params.orcpt() {
                orcpt.insert(rcpt.to_string(), o.to_string());
            }
        }

        DsnAttributeValues {
            envid: self.envid().map(|e| e.as_str().to_string()),
            ret: self.ret().map(|r| r.as_str().to_string()),
            notify: non_empty(notify),
            orcpt: non_empty(orcpt),
        }
    }

    /// Rebuilds the parameters from their attribute form.
    /// Recipients are the union of those named in the NOTIFY and ORCPT maps.
    pub fn from_attribute_values(values: &DsnAttributeValues) -> Result<Option<Self>, DsnError> {
        let envid = values.envid.as_deref().map(EnvId::from_attribute_value);
        let ret = values
            .ret
            .as_deref()
            .map(Ret::from_attribute_value)
            .transpose()?;

        let mut notify = BTreeMap::new();
        for (rcpt, value) in values.notify.iter().flatten() {
            notify.insert(
                parse_recipient_key(rcpt)?,
                NotifySet::from_attribute_value(value)?,
            );
        }

        let mut orcpt = BTreeMap::new();
        for (rcpt, value) in values.orcpt.iter().flatten() {
            orcpt.insert(
                parse_recipient_key(rcpt)?,
                MailAddress::parse(value).map_err(|err| DsnError::invalid_address(value, err))?,
            );
        }

        let rcpts: BTreeSet<&MailAddress> = notify.keys().chain(orcpt.keys()).collect();
        let mut recipients = BTreeMap::new();
        for rcpt in rcpts {
            if let Some(params) =
                RecipientDsnParameters::of(notify.get(rcpt).copied(), orcpt.get(rcpt).cloned())?
            {
                recipients.insert(rcpt.clone(), params);
            }
        }

        Ok(Self::of(envid, ret, recipients))
    }

    /// Attaches these parameters to the store, replacing any
    /// DSN attributes that were previously present
    pub fn store_attributes(&self, store: &mut impl AttributeStore) -> anyhow::Result<()> {
        Self::clear_attributes(store)?;
        let attributes = self.to_attributes().as_attributes();
        tracing::debug!("storing {} DSN attributes", attributes.len());
        for attribute in attributes {
            store.set_attribute(attribute)?;
        }
        Ok(())
    }

    pub fn load_attributes(store: &impl AttributeStore) -> anyhow::Result<Option<Self>> {
        let values = DsnAttributeValues::load(store)?;
        if values.is_empty() {
            tracing::trace!("no DSN attributes present");
            return Ok(None);
        }
        Ok(Self::from_attribute_values(&values)?)
    }

    pub fn clear_attributes(store: &mut impl AttributeStore) -> anyhow::Result<()> {
        for name in [ENVID_ATTRIBUTE, RET_ATTRIBUTE, NOTIFY_ATTRIBUTE, ORCPT_ATTRIBUTE] {
            store.remove_attribute(&name)?;
        }
        Ok(())
    }
}

impl From<&DsnParameters> for DsnAttributeValues {
    fn from(params: &DsnParameters) -> Self {
        params.to_attributes()
    }
}
