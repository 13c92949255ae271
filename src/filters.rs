//! Data source filter blocks.
//!
//! A filter names an attribute and a set of accepted values. An item passes a
//! filter when the named attribute matches any of the values, and passes the
//! whole filter set only when it passes every filter.

use crate::schema::{Attribute, Block};
use runscope_api::{Bucket, Integration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Optional `filter` set block shared by the list data sources.
pub fn filter_attribute() -> Attribute {
    Attribute::block_set(
        "filter",
        Block::new(vec![
            Attribute::string("name").required(),
            Attribute::string_set("values").required(),
        ]),
    )
    .optional()
    .force_new()
}

fn passes_all<T>(item: &T, filters: &[Filter], field: impl Fn(&T, &str) -> String) -> bool {
    filters
        .iter()
        .all(|filter| filter.accepts(&field(item, &filter.name)))
}

/// `key` matches the bucket key; any other name matches the bucket name.
pub fn bucket_filters_test(bucket: &Bucket, filters: &[Filter]) -> bool {
    passes_all(bucket, filters, |b, name| match name {
        "key" => b.key.clone(),
        _ => b.name.clone(),
    })
}

/// `id` and `type` match those fields; any other name matches the description.
pub fn integration_filters_test(integration: &Integration, filters: &[Filter]) -> bool {
    passes_all(integration, filters, |i, name| match name {
        "id" => i.uuid.clone(),
        "type" => i.integration_type.clone(),
        _ => i.description.clone(),
    })
}
