pub mod aws;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use aws::{LinkedRole, LinkedRoles, RolePath, RootResourceRef};

/// Attribute bag of a resource, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `None` when the attribute is absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// `None` when the attribute is absent, not an array, or holds a non-string item.
    pub fn get_str_list(&self, key: &str) -> Option<Vec<&str>> {
        self.0
            .get(key)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "id")]
    pub resource_id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
            attributes: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn kind(&self) -> &str {
        &self.resource_type
    }

    pub fn identifier(&self) -> &str {
        &self.resource_id
    }

    pub(crate) fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.as_ref()?.get_str(key)
    }

    pub(crate) fn attr_str_list(&self, key: &str) -> Option<Vec<&str>> {
        self.attributes.as_ref()?.get_str_list(key)
    }
}

/// Two resources are the same resource when both their type and id are equal.
/// Attributes never take part in this test.
pub fn is_same_resource(left: &Resource, right: &Resource) -> bool {
    left.resource_type == right.resource_type && left.resource_id == right.resource_id
}

/// True when `list` holds a resource with the same identity as `resource`.
pub fn contains_same(list: &[Resource], resource: &Resource) -> bool {
    list.iter().any(|candidate| is_same_resource(candidate, resource))
}

/// Stable sort by type, then id.
pub fn sort(resources: &mut [Resource]) {
    resources.sort_by(|a, b| {
        a.resource_type
            .cmp(&b.resource_type)
            .then_with(|| a.resource_id.cmp(&b.resource_id))
    });
}

#[derive(Debug, Error, PartialEq)]
pub enum FactoryError {
    #[error("cannot create resource with an empty {field}")]
    EmptyField { field: &'static str },
}

/// Builds resources that exist only implicitly in the declared configuration.
pub trait ResourceFactory: Send + Sync {
    fn create_abstract_resource(
        &self,
        kind: &str,
        id: &str,
        attributes: Attributes,
    ) -> Result<Resource, FactoryError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResourceFactory;

impl ResourceFactory for DefaultResourceFactory {
    fn create_abstract_resource(
        &self,
        kind: &str,
        id: &str,
        attributes: Attributes,
    ) -> Result<Resource, FactoryError> {
        if kind.is_empty() {
            return Err(FactoryError::EmptyField { field: "type" });
        }
        if id.is_empty() {
            return Err(FactoryError::EmptyField { field: "id" });
        }
        Ok(Resource::new(kind, id).with_attributes(attributes))
    }
}
