// used for persistence
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

// used to (de)serialize multiple attributes and declaration files
use serde::{Deserialize, Serialize};

// used to print out the string form that coercion compares against
use std::fmt;

/// The form a member is persisted or transmitted as.
///
/// Members declared from a plain list store their own name as text, members
/// declared from a mapping may store a distinct code (usually an integer).
#[derive(Eq, PartialEq, Hash, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stored {
    Integer(i64),
    Text(String),
}

impl Stored {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Stored::Integer(i) => Some(*i),
            Stored::Text(_) => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Stored::Text(s) => Some(s),
            Stored::Integer(_) => None,
        }
    }
    // Matching during coercion is done on string forms, so "1" finds the
    // member stored as 1 and vice versa.
    pub fn matches(&self, s: &str) -> bool {
        match self {
            Stored::Text(t) => t == s,
            Stored::Integer(i) => i.to_string() == s,
        }
    }
}
impl fmt::Display for Stored {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stored::Integer(i) => write!(f, "{}", i),
            Stored::Text(s) => write!(f, "{}", s),
        }
    }
}
impl From<i64> for Stored {
    fn from(i: i64) -> Self {
        Stored::Integer(i)
    }
}
impl From<i32> for Stored {
    fn from(i: i32) -> Self {
        Stored::Integer(i as i64)
    }
}
impl From<&str> for Stored {
    fn from(s: &str) -> Self {
        Stored::Text(s.to_owned())
    }
}
impl From<String> for Stored {
    fn from(s: String) -> Self {
        Stored::Text(s)
    }
}
impl ToSql for Stored {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Stored::Integer(i) => Ok(ToSqlOutput::from(*i)),
            Stored::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
        }
    }
}
impl FromSql for Stored {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Stored::Integer(i)),
            ValueRef::Text(t) => std::str::from_utf8(t)
                .map(|s| Stored::Text(s.to_owned()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
