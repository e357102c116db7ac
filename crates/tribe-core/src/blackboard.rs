use std::collections::BTreeMap;

use crate::value::{BbValue, FromBbValue};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlackboardError {
    #[error("blackboard type mismatch for key `{key}`: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Per-agent associative store.
///
/// Keys are agent-local strings; the store is untyped, so callers must agree on the shape stored
/// under each key. Reads through [`Blackboard::get_as`] report a shape mismatch as an error
/// instead of silently returning nothing. Cloning deep-copies every value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blackboard {
    values: BTreeMap<String, BbValue>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&BbValue> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut BbValue> {
        self.values.get_mut(key)
    }

    pub fn get_as<T: FromBbValue>(&self, key: &str) -> Result<Option<T>, BlackboardError> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        match T::from_bb(value) {
            Some(v) => Ok(Some(v)),
            None => Err(BlackboardError::TypeMismatch {
                key: key.to_string(),
                expected: T::EXPECTED,
                found: value.kind(),
            }),
        }
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>, BlackboardError> {
        self.get_as(key)
    }

    pub fn flag(&self, key: &str) -> Result<Option<bool>, BlackboardError> {
        self.get_as(key)
    }

    pub fn text(&self, key: &str) -> Result<Option<String>, BlackboardError> {
        self.get_as(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<BbValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn delete(&mut self, key: &str) -> Option<BbValue> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Keys starting with `prefix`, in sorted order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .map(|(k, _)| k.as_str())
            .take_while(move |k| k.starts_with(prefix))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &BbValue) -> bool) {
        self.values.retain(|k, v| keep(k, v));
    }
}
