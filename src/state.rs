//! Resource data handed between the engine and handlers.
//!
//! An instance is its id plus a flat JSON object of attributes. An empty id
//! means the object is absent and the engine drops it from state.

use crate::error::ProviderResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the object as gone.
    pub fn clear(&mut self) {
        self.id.clear();
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Decode the attribute object into a typed model. Nulls read as unset.
    pub fn decode<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        let value = strip_nulls(Value::Object(self.attributes.clone()));
        Ok(serde_json::from_value(value)?)
    }

    /// Overwrite every attribute the model serializes.
    pub fn merge<T: Serialize>(&mut self, model: &T) -> ProviderResult<()> {
        if let Value::Object(fields) = serde_json::to_value(model)? {
            self.attributes.extend(fields);
        }
        Ok(())
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

// ── Tests ────────────────────────────────────────────────────────────
