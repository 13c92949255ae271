//! Attribute schema declarations.
//!
//! Each resource and data source describes its attributes here: type,
//! required/optional/computed flags, force-new, sensitivity, defaults and
//! validators. The same declaration drives configuration validation, default
//! filling and replacement planning.
//!
//! Sets are compared as multisets. A set block may name a hash key, in which
//! case two members with the same key value are the same member regardless of
//! their other fields.

use crate::error::{ProviderError, ProviderResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::hash::Hash;

// ── Types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int,
    /// String-keyed map of strings.
    Map,
    StringList,
    StringSet,
    BlockList(Block),
    BlockSet(Block),
}

impl AttributeType {
    /// Value an unset attribute compares equal to.
    fn zero(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Bool => Value::Bool(false),
            Self::Int => Value::from(0),
            Self::Map => Value::Object(Map::new()),
            Self::StringList | Self::StringSet | Self::BlockList(_) | Self::BlockSet(_) => {
                Value::Array(Vec::new())
            }
        }
    }
}

/// Nested block body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<&'static str>,
}

impl Block {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            hash_key: None,
        }
    }

    /// Identify set members by this attribute alone.
    pub fn hash_key(mut self, name: &'static str) -> Self {
        self.hash_key = Some(name);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    OneOf(&'static [&'static str]),
    IntBetween(i64, i64),
}

impl Validator {
    fn check(&self, path: &str, value: &Value) -> ProviderResult<()> {
        match self {
            Self::OneOf(allowed) => {
                let s = value.as_str().unwrap_or_default();
                if allowed.contains(&s) {
                    Ok(())
                } else {
                    Err(ProviderError::invalid_attribute(
                        path,
                        format!("expected to be one of {:?}, got \"{}\"", allowed, s),
                    ))
                }
            }
            Self::IntBetween(min, max) => {
                let n = value.as_i64().unwrap_or_default();
                if (*min..=*max).contains(&n) {
                    Ok(())
                } else {
                    Err(ProviderError::invalid_attribute(
                        path,
                        format!("expected to be in the range ({} - {}), got {}", min, max, n),
                    ))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(name: &'static str, ty: AttributeType) -> Self {
        Self {
            name,
            ty,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            max_items: None,
            validators: Vec::new(),
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &'static str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, AttributeType::Int)
    }

    pub fn map(name: &'static str) -> Self {
        Self::new(name, AttributeType::Map)
    }

    pub fn string_list(name: &'static str) -> Self {
        Self::new(name, AttributeType::StringList)
    }

    pub fn string_set(name: &'static str) -> Self {
        Self::new(name, AttributeType::StringSet)
    }

    pub fn block_list(name: &'static str, block: Block) -> Self {
        Self::new(name, AttributeType::BlockList(block))
    }

    pub fn block_set(name: &'static str, block: Block) -> Self {
        Self::new(name, AttributeType::BlockSet(block))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.validators.push(Validator::OneOf(allowed));
        self
    }

    pub fn int_between(mut self, min: i64, max: i64) -> Self {
        self.validators.push(Validator::IntBetween(min, max));
        self
    }

    /// Server-assigned only; configuration may not set it.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Attribute declarations of one resource, data source or provider block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration object against the declarations.
    pub fn validate(&self, config: &Map<String, Value>) -> ProviderResult<()> {
        validate_object(&self.attributes, config, "")
    }

    /// Fill declared defaults for unset attributes, including inside blocks.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        apply_defaults(&self.attributes, config);
    }

    /// Force-new attributes whose planned value differs from the prior state.
    /// Empty when there is no prior state.
    pub fn requires_replace(&self, prior: &Map<String, Value>, planned: &Map<String, Value>) -> Vec<String> {
        if prior.is_empty() {
            return Vec::new();
        }
        self.attributes
            .iter()
            .filter(|a| a.force_new)
            .filter(|a| is_changed(a, prior, planned))
            .map(|a| a.name.to_string())
            .collect()
    }

    /// Every configurable attribute whose planned value differs.
    pub fn changed_attributes(&self, prior: &Map<String, Value>, planned: &Map<String, Value>) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| !a.is_computed_only())
            .filter(|a| is_changed(a, prior, planned))
            .map(|a| a.name.to_string())
            .collect()
    }

    /// Bring prior values into `planned` wherever the configuration leaves
    /// them unchanged or unset-and-computed. Set members matched by hash key
    /// keep their computed fields, so member order and server-filled values
    /// never show up as a change.
    pub fn reconcile(&self, prior: &Map<String, Value>, planned: &mut Map<String, Value>) {
        reconcile_object(&self.attributes, prior, planned);
    }
}

// ── Validation ──────────────────────────────────────────────────────

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_object(attributes: &[Attribute], obj: &Map<String, Value>, prefix: &str) -> ProviderResult<()> {
    for key in obj.keys() {
        if key != "id" && !attributes.iter().any(|a| a.name == key) {
            return Err(ProviderError::invalid_attribute(
                join(prefix, key),
                "unsupported attribute",
            ));
        }
    }

    for attr in attributes {
        let path = join(prefix, attr.name);
        match obj.get(attr.name).filter(|v| !v.is_null()) {
            None if attr.required => {
                return Err(ProviderError::invalid_attribute(path, "required attribute is missing"));
            }
            None => {}
            Some(_) if attr.is_computed_only() => {
                return Err(ProviderError::invalid_attribute(
                    path,
                    "value is computed and cannot be set",
                ));
            }
            Some(value) => validate_value(attr, value, &path)?,
        }
    }
    Ok(())
}

fn validate_value(attr: &Attribute, value: &Value, path: &str) -> ProviderResult<()> {
    let type_error = |expected: &str| ProviderError::invalid_attribute(path, format!("expected {}", expected));

    match &attr.ty {
        AttributeType::String if !value.is_string() => return Err(type_error("a string")),
        AttributeType::Bool if !value.is_boolean() => return Err(type_error("a bool")),
        AttributeType::Int if !value.is_i64() => return Err(type_error("an integer")),
        AttributeType::Map => {
            let ok = value
                .as_object()
                .map(|m| m.values().all(Value::is_string))
                .unwrap_or(false);
            if !ok {
                return Err(type_error("a map of strings"));
            }
        }
        AttributeType::StringList | AttributeType::StringSet => {
            let ok = value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false);
            if !ok {
                return Err(type_error("a list of strings"));
            }
        }
        AttributeType::BlockList(block) | AttributeType::BlockSet(block) => {
            let items = value.as_array().ok_or_else(|| type_error("a list of blocks"))?;
            if let Some(max) = attr.max_items {
                if items.len() > max {
                    return Err(ProviderError::invalid_attribute(
                        path,
                        format!("at most {} block(s) allowed, got {}", max, items.len()),
                    ));
                }
            }
            for (i, item) in items.iter().enumerate() {
                let obj = item.as_object().ok_or_else(|| type_error("a block"))?;
                validate_object(&block.attributes, obj, &format!("{}.{}", path, i))?;
            }
        }
        _ => {}
    }

    for validator in &attr.validators {
        validator.check(path, value)?;
    }
    Ok(())
}

fn apply_defaults(attributes: &[Attribute], obj: &mut Map<String, Value>) {
    for attr in attributes {
        let unset = obj.get(attr.name).map(Value::is_null).unwrap_or(true);
        if unset {
            if let Some(default) = &attr.default {
                obj.insert(attr.name.to_string(), default.clone());
            }
            continue;
        }
        if let AttributeType::BlockList(block) | AttributeType::BlockSet(block) = &attr.ty {
            if let Some(Value::Array(items)) = obj.get_mut(attr.name) {
                for item in items.iter_mut() {
                    if let Value::Object(inner) = item {
                        apply_defaults(&block.attributes, inner);
                    }
                }
            }
        }
    }
}

// ── Comparison ──────────────────────────────────────────────────────

fn is_changed(attr: &Attribute, prior: &Map<String, Value>, planned: &Map<String, Value>) -> bool {
    let planned_value = planned.get(attr.name).filter(|v| !v.is_null());
    // Computed attributes left out of the plan are unknown, not removed.
    if attr.computed && planned_value.is_none() {
        return false;
    }
    !values_equal(&attr.ty, prior.get(attr.name), planned_value)
}

fn normalized(ty: &AttributeType, value: Option<&Value>) -> Value {
    match value {
        Some(v) if !v.is_null() => v.clone(),
        _ => ty.zero(),
    }
}

/// Compare two attribute values under the attribute's container semantics.
pub fn values_equal(ty: &AttributeType, a: Option<&Value>, b: Option<&Value>) -> bool {
    let a = normalized(ty, a);
    let b = normalized(ty, b);

    match ty {
        AttributeType::StringSet => set_members(None, &a) == set_members(None, &b),
        AttributeType::BlockSet(block) => {
            set_members(block.hash_key, &a) == set_members(block.hash_key, &b)
        }
        AttributeType::BlockList(block) => match (a.as_array(), b.as_array()) {
            (Some(xs), Some(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| {
                        block.attributes.iter().all(|attr| {
                            values_equal(&attr.ty, x.get(attr.name), y.get(attr.name))
                        })
                    })
            }
            _ => a == b,
        },
        _ => a == b,
    }
}

/// Sorted member identities of a set value.
fn set_members(hash_key: Option<&str>, value: &Value) -> Vec<String> {
    let mut members: Vec<String> = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| match (hash_key, item) {
                    (Some(key), Value::Object(obj)) => obj
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    (_, Value::String(s)) => s.clone(),
                    (_, other) => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    members.sort();
    members.dedup();
    members
}

// ── Reconciliation ──────────────────────────────────────────────────

fn reconcile_object(attributes: &[Attribute], prior: &Map<String, Value>, planned: &mut Map<String, Value>) {
    for attr in attributes {
        let Some(prior_value) = prior.get(attr.name).filter(|v| !v.is_null()) else {
            continue;
        };
        match planned.get_mut(attr.name).filter(|v| !v.is_null()) {
            None if attr.computed => {
                planned.insert(attr.name.to_string(), prior_value.clone());
            }
            None => {}
            Some(value) if values_equal(&attr.ty, Some(prior_value), Some(&*value)) => {
                *value = prior_value.clone();
            }
            Some(value) => match &attr.ty {
                AttributeType::BlockList(block) => reconcile_elements(block, prior_value, value),
                AttributeType::BlockSet(block) => reconcile_members(block, prior_value, value),
                _ => {}
            },
        }
    }
}

/// Block lists pair up by position.
fn reconcile_elements(block: &Block, prior: &Value, planned: &mut Value) {
    let (Some(prior_items), Some(items)) = (prior.as_array(), planned.as_array_mut()) else {
        return;
    };
    for (prior_item, item) in prior_items.iter().zip(items.iter_mut()) {
        if let (Value::Object(p), Value::Object(obj)) = (prior_item, item) {
            reconcile_object(&block.attributes, p, obj);
        }
    }
}

/// Keyed set members pair up by hash key; unkeyed members stay as configured.
fn reconcile_members(block: &Block, prior: &Value, planned: &mut Value) {
    let Some(key) = block.hash_key else {
        return;
    };
    let (Some(prior_items), Some(items)) = (prior.as_array(), planned.as_array_mut()) else {
        return;
    };
    for item in items.iter_mut() {
        let Value::Object(obj) = item else {
            continue;
        };
        let matching = prior_items
            .iter()
            .filter_map(Value::as_object)
            .find(|p| p.get(key).is_some() && p.get(key) == obj.get(key));
        if let Some(p) = matching {
            reconcile_object(&block.attributes, p, obj);
        }
    }
}

/// Keep the first member for each key, in input order.
pub fn unique_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

// ── Tests ────────────────────────────────────────────────────────────
