use std::sync::Arc;

// used to let a HashMap<Value, _> be probed with a plain &str
use std::borrow::Borrow;
// custom made ordering for values (declaration order)
use std::cmp::Ordering;
// used to print out the stored form of a value
use std::fmt;
// hashing must agree with equality against plain strings
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::enumeration::Enumeration;
use crate::stored::Stored;

// ------------- Input -------------
/// Anything the coercion engine can be handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Nil,
    Text(String),
    Integer(i64),
    Value(Value),
}

impl Input {
    /// Nil and the empty string are both treated as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            Input::Nil => true,
            Input::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}
impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Text(s.to_owned())
    }
}
impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Text(s)
    }
}
impl From<&String> for Input {
    fn from(s: &String) -> Self {
        Input::Text(s.clone())
    }
}
impl From<i64> for Input {
    fn from(i: i64) -> Self {
        Input::Integer(i)
    }
}
impl From<i32> for Input {
    fn from(i: i32) -> Self {
        Input::Integer(i as i64)
    }
}
impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Value(v)
    }
}
impl From<&Value> for Input {
    fn from(v: &Value) -> Self {
        Input::Value(v.clone())
    }
}
impl From<Stored> for Input {
    fn from(s: Stored) -> Self {
        match s {
            Stored::Integer(i) => Input::Integer(i),
            Stored::Text(t) => Input::Text(t),
        }
    }
}
impl From<&Stored> for Input {
    fn from(s: &Stored) -> Self {
        Input::from(s.clone())
    }
}
impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(o: Option<T>) -> Self {
        o.map_or(Input::Nil, Into::into)
    }
}

// ------------- Value -------------
/// One resolved member of an enumeration.
///
/// Values are only produced by coercion and are immutable. Two values are
/// equal when their member names are equal, whichever declaration produced
/// them, and a value equals the plain string of its name in both directions.
#[derive(Clone)]
pub struct Value {
    enumeration: Arc<Enumeration>,
    index: usize,
}

impl Value {
    pub(crate) fn new(enumeration: Arc<Enumeration>, index: usize) -> Self {
        Self { enumeration, index }
    }
    pub fn enumeration(&self) -> &Arc<Enumeration> {
        &self.enumeration
    }
    /// Position within the declaration.
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn name(&self) -> &str {
        self.enumeration.members()[self.index].name()
    }
    pub fn stored(&self) -> &Stored {
        self.enumeration.members()[self.index].stored()
    }
    pub fn label(&self) -> String {
        self.enumeration
            .label_for(self.name())
            .unwrap_or_else(|| self.name().to_owned())
    }
    /// Value level predicate: true when this value is the member `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }
}
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.enumeration.name(), self.name())
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.stored())
    }
}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}
impl Eq for Value {}
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}
impl Borrow<str> for Value {
    fn borrow(&self) -> &str {
        self.name()
    }
}
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if Arc::ptr_eq(&self.enumeration, &other.enumeration) {
            Some(self.index.cmp(&other.index))
        } else {
            None
        }
    }
}
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.stored().serialize(serializer)
    }
}

// Equality against member names, in both directions. Stored forms are
// compared through `stored()`, which keeps hashing consistent with equality.
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}
impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}
impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.name() == other
    }
}
impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
