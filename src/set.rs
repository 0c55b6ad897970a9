use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::enumeration::Enumeration;
use crate::stored::Stored;
use crate::value::{Input, Value};

/// The container behind a multiple attribute.
///
/// Members keep the order they were first seen in and collapse by name.
/// Every insertion goes through coercion again, so the set never holds
/// anything outside its enumeration.
#[derive(Clone)]
pub struct ValueSet {
    enumeration: Arc<Enumeration>,
    values: Vec<Value>,
}

impl ValueSet {
    pub fn new(enumeration: Arc<Enumeration>) -> Self {
        Self {
            enumeration,
            values: Vec::new(),
        }
    }
    pub fn from_inputs<I, T>(enumeration: Arc<Enumeration>, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        let mut set = Self::new(enumeration);
        for input in inputs {
            set.insert(input);
        }
        set
    }
    pub fn enumeration(&self) -> &Arc<Enumeration> {
        &self.enumeration
    }
    /// Coerces and adds one element. Returns false when the input is unknown
    /// or already present.
    pub fn insert(&mut self, input: impl Into<Input>) -> bool {
        let input = input.into();
        match self.enumeration.find(input.clone()) {
            Some(value) => {
                if self.values.contains(&value) {
                    false
                } else {
                    self.values.push(value);
                    true
                }
            }
            None => {
                if !input.is_blank() {
                    debug!(attribute = self.enumeration.name(), input = ?input, "dropping unknown element");
                }
                false
            }
        }
    }
    pub fn remove(&mut self, input: impl Into<Input>) -> bool {
        match self.enumeration.find(input) {
            Some(value) => {
                let before = self.values.len();
                self.values.retain(|v| v != &value);
                self.values.len() != before
            }
            None => false,
        }
    }
    pub fn contains(&self, input: impl Into<Input>) -> bool {
        match self.enumeration.find(input) {
            Some(value) => self.values.contains(&value),
            None => false,
        }
    }
    pub fn clear(&mut self) {
        self.values.clear();
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(Value::name).collect()
    }
    /// The list of stored forms, which is what gets persisted.
    pub fn to_stored(&self) -> Vec<Stored> {
        self.values.iter().map(|v| v.stored().clone()).collect()
    }
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(Value::label).collect()
    }
}
impl PartialEq for ValueSet {
    // set semantics: order does not matter
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.values.iter().all(|v| other.values.contains(v))
    }
}
impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.values.iter()).finish()
    }
}
impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let joined: Vec<String> = self.values.iter().map(Value::to_string).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}
impl Serialize for ValueSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values.iter())
    }
}
