//! Predicate generation.
//!
//! An attribute can ask for one boolean query per permitted value. The
//! queries are registered by name (`male?`, `status_active?`, ...) in the
//! host registry's dispatch table when the attribute is declared.

use lazy_static::lazy_static;
use regex::Regex;

use crate::enumeration::Enumeration;
use crate::{EnumerizeError, Result};

lazy_static! {
    static ref NON_IDENTIFIER: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// Turns a member name into an identifier, e.g. `foo-bar` into `foo_bar`.
pub fn identifier(name: &str) -> String {
    NON_IDENTIFIER.replace_all(name, "_").into_owned()
}

pub fn method_name(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}_{}?", identifier(prefix), identifier(name)),
        None => format!("{}?", identifier(name)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Prefix {
    #[default]
    None,
    /// Use the attribute name as prefix.
    Attribute,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Predicates {
    enabled: bool,
    prefix: Prefix,
    only: Option<Vec<String>>,
    except: Option<Vec<String>>,
}

impl Predicates {
    pub fn disabled() -> Self {
        Self::default()
    }
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.enabled = true;
        self.prefix = Prefix::Custom(prefix.to_owned());
        self
    }
    pub fn attribute_prefix(mut self) -> Self {
        self.enabled = true;
        self.prefix = Prefix::Attribute;
        self
    }
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = true;
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }
    pub fn except<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = true;
        self.except = Some(names.into_iter().map(Into::into).collect());
        self
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    pub fn validate(&self, enumeration: &Enumeration) -> Result<()> {
        if self.only.is_some() && self.except.is_some() {
            return Err(EnumerizeError::Declaration(format!(
                "predicates for '{}' cannot combine 'only' and 'except'",
                enumeration.name()
            )));
        }
        for name in self.only.iter().chain(self.except.iter()).flatten() {
            if enumeration.index_of(name).is_none() {
                return Err(EnumerizeError::Declaration(format!(
                    "predicate filter for '{}' names unknown value '{}'",
                    enumeration.name(),
                    name
                )));
            }
        }
        Ok(())
    }
    /// The predicate methods for an enumeration, in declaration order.
    pub fn methods(&self, enumeration: &Enumeration) -> Result<Vec<PredicateMethod>> {
        self.validate(enumeration)?;
        if !self.enabled {
            return Ok(Vec::new());
        }
        let prefix = match &self.prefix {
            Prefix::None => None,
            Prefix::Attribute => Some(enumeration.name()),
            Prefix::Custom(p) => Some(p.as_str()),
        };
        let methods = enumeration
            .values()
            .into_iter()
            .filter(|name| match (&self.only, &self.except) {
                (Some(only), _) => only.iter().any(|o| o == name),
                (_, Some(except)) => !except.iter().any(|e| e == name),
                _ => true,
            })
            .map(|name| PredicateMethod {
                method: method_name(prefix, name),
                attribute: enumeration.name().to_owned(),
                value: name.to_owned(),
            })
            .collect();
        Ok(methods)
    }
}

/// A generated predicate: `method` answers whether `attribute` is (or, for
/// multiple attributes, contains) `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateMethod {
    method: String,
    attribute: String,
    value: String,
}

impl PredicateMethod {
    pub fn method(&self) -> &str {
        &self.method
    }
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
    pub fn value(&self) -> &str {
        &self.value
    }
}
