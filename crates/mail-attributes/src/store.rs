use crate::{Attribute, AttributeMap, AttributeName, AttributeValue};
use anyhow::Context;
use serde_json::{Map, Value};

/// Somewhere that attributes can be attached to a message in flight.
/// Values must be returned exactly as they were stored.
pub trait AttributeStore {
    fn attribute(&self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>>;
    fn set_attribute(&mut self, attribute: Attribute) -> anyhow::Result<()>;
    fn remove_attribute(&mut self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>>;
}

impl AttributeStore for AttributeMap {
    fn attribute(&self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        Ok(self.get(name).cloned())
    }

    fn set_attribute(&mut self, attribute: Attribute) -> anyhow::Result<()> {
        self.insert(attribute.name, attribute.value);
        Ok(())
    }

    fn remove_attribute(&mut self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        Ok(self.remove(name))
    }
}

/// Message metadata is a json object; a `null` entry is
/// equivalent to the attribute being absent.
impl AttributeStore for Map<String, Value> {
    fn attribute(&self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        match self.get(name.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let value = AttributeValue::try_from(value.clone())
                    .with_context(|| format!("metadata key {name}"))?;
                Ok(Some(value))
            }
        }
    }

    fn set_attribute(&mut self, attribute: Attribute) -> anyhow::Result<()> {
        tracing::trace!("set metadata {}", attribute.name);
        self.insert(attribute.name.to_string(), attribute.value.into());
        Ok(())
    }

    fn remove_attribute(&mut self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        match self.remove(name.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let value = AttributeValue::try_from(value)
                    .with_context(|| format!("metadata key {name}"))?;
                Ok(Some(value))
            }
        }
    }
}

impl AttributeStore for Value {
    fn attribute(&self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        match self {
            Value::Object(map) => map.attribute(name),
            _ => anyhow::bail!("metadata is somehow not a json object"),
        }
    }

    fn set_attribute(&mut self, attribute: Attribute) -> anyhow::Result<()> {
        match self {
            Value::Object(map) => map.set_attribute(attribute),
            _ => anyhow::bail!("metadata is somehow not a json object"),
        }
    }

    fn remove_attribute(&mut self, name: &AttributeName) -> anyhow::Result<Option<AttributeValue>> {
        match self {
            Value::Object(map) => map.remove_attribute(name),
            _ => anyhow::bail!("metadata is somehow not a json object"),
        }
    }
}
