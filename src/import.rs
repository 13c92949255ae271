//! Composite import identifiers.
//!
//! - test: `bucket_id/test_id`
//! - step: `bucket_id/test_id/step_id` or `bucket_id/test_id#step_position`
//!
//! Step positions are 1-based and resolve against the test's step list.

use crate::error::{ProviderError, ProviderResult};
use runscope_api::TestStep;

const TEST_FORMAT: &str = "test ID for import should be in format bucket_id/test_id";
const STEP_FORMAT: &str = "step ID for import should be in format bucket_id/test_id/step_id or bucket_id/test_id#step_position";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestImportId {
    pub bucket_id: String,
    pub test_id: String,
}

impl TestImportId {
    /// Splits on the first `/`; the remainder is the test id.
    pub fn parse(id: &str) -> ProviderResult<Self> {
        match id.split_once('/') {
            Some((bucket_id, test_id)) => Ok(Self {
                bucket_id: bucket_id.to_string(),
                test_id: test_id.to_string(),
            }),
            None => Err(ProviderError::import(TEST_FORMAT)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepImportId {
    ById {
        bucket_id: String,
        test_id: String,
        step_id: String,
    },
    ByPosition {
        bucket_id: String,
        test_id: String,
        position: usize,
    },
}

impl StepImportId {
    pub fn parse(id: &str) -> ProviderResult<Self> {
        let parts: Vec<&str> = id.split('/').collect();
        match parts.as_slice() {
            [bucket_id, test_id, step_id] => Ok(Self::ById {
                bucket_id: bucket_id.to_string(),
                test_id: test_id.to_string(),
                step_id: step_id.to_string(),
            }),
            [bucket_id, rest] => {
                let inner: Vec<&str> = rest.split('#').collect();
                let [test_id, position] = inner.as_slice() else {
                    return Err(ProviderError::import(STEP_FORMAT));
                };
                let position = position
                    .parse::<i64>()
                    .ok()
                    .filter(|p| *p >= 1)
                    .ok_or_else(|| {
                        ProviderError::import("step_position should be a positive integer number")
                    })?;
                Ok(Self::ByPosition {
                    bucket_id: bucket_id.to_string(),
                    test_id: test_id.to_string(),
                    position: position as usize,
                })
            }
            _ => Err(ProviderError::import(STEP_FORMAT)),
        }
    }

    pub fn bucket_id(&self) -> &str {
        match self {
            Self::ById { bucket_id, .. } | Self::ByPosition { bucket_id, .. } => bucket_id,
        }
    }

    pub fn test_id(&self) -> &str {
        match self {
            Self::ById { test_id, .. } | Self::ByPosition { test_id, .. } => test_id,
        }
    }
}

/// Step id at a 1-based `position` of the test's steps.
pub fn resolve_step_position(test_id: &str, position: usize, steps: &[TestStep]) -> ProviderResult<String> {
    steps
        .get(position.saturating_sub(1))
        .filter(|_| position >= 1)
        .map(|s| s.id.clone())
        .ok_or_else(|| {
            ProviderError::import(format!("test {} contains only {} steps", test_id, steps.len()))
        })
}
