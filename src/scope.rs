//! Query scopes for the persistence adapter.
//!
//! A scope does not run anything by itself; it resolves its arguments through
//! coercion and yields a [`Condition`] that the adapter renders into SQL.

use std::sync::Arc;

use tracing::debug;

use crate::enumeration::Enumeration;
use crate::predicate::identifier;
use crate::stored::Stored;
use crate::value::Input;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeOption {
    #[default]
    None,
    /// `with_<attr>(values)` and `without_<attr>(values)`.
    Full,
    /// A single inclusive scope under a custom name.
    Named(String),
    /// `<value>` and `not_<value>` for every member.
    Shallow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    With,
    Without,
    Member(String),
    NotMember(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeMethod {
    name: String,
    attribute: String,
    kind: ScopeKind,
}

impl ScopeOption {
    pub fn methods(&self, enumeration: &Enumeration) -> Vec<ScopeMethod> {
        let attribute = enumeration.name().to_owned();
        let method = |name: String, kind: ScopeKind| ScopeMethod {
            name,
            attribute: attribute.clone(),
            kind,
        };
        match self {
            ScopeOption::None => Vec::new(),
            ScopeOption::Full => vec![
                method(format!("with_{}", attribute), ScopeKind::With),
                method(format!("without_{}", attribute), ScopeKind::Without),
            ],
            ScopeOption::Named(name) => vec![method(name.clone(), ScopeKind::With)],
            ScopeOption::Shallow => enumeration
                .values()
                .into_iter()
                .flat_map(|value| {
                    [
                        method(identifier(value), ScopeKind::Member(value.to_owned())),
                        method(format!("not_{}", identifier(value)), ScopeKind::NotMember(value.to_owned())),
                    ]
                })
                .collect(),
        }
    }
}

impl ScopeMethod {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }
    /// Shallow scopes ignore `inputs`, the others coerce each of them and
    /// drop whatever is not a member.
    pub fn condition(&self, enumeration: &Arc<Enumeration>, inputs: Vec<Input>) -> Condition {
        let resolve = |inputs: Vec<Input>| -> Vec<Stored> {
            inputs
                .into_iter()
                .filter_map(|input| {
                    let found = enumeration.find(input.clone());
                    if found.is_none() {
                        debug!(scope = %self.name, input = ?input, "ignoring unknown scope argument");
                    }
                    found
                })
                .map(|value| value.stored().clone())
                .collect()
        };
        let (stored, negated) = match &self.kind {
            ScopeKind::With => (resolve(inputs), false),
            ScopeKind::Without => (resolve(inputs), true),
            ScopeKind::Member(value) => (enumeration.store_value_for(value).cloned().into_iter().collect(), false),
            ScopeKind::NotMember(value) => (enumeration.store_value_for(value).cloned().into_iter().collect(), true),
        };
        Condition {
            column: self.attribute.clone(),
            stored,
            negated,
        }
    }
}

/// Quotes a table or column name for SQL, doubling embedded quotes.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

// ------------- Condition -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    column: String,
    stored: Vec<Stored>,
    negated: bool,
}

impl Condition {
    pub fn column(&self) -> &str {
        &self.column
    }
    pub fn stored(&self) -> &[Stored] {
        &self.stored
    }
    pub fn negated(&self) -> bool {
        self.negated
    }
    /// Renders a `where` fragment with one `?` per stored value.
    pub fn to_sql(&self) -> (String, Vec<Stored>) {
        if self.stored.is_empty() {
            let always = if self.negated { "1 = 1" } else { "1 = 0" };
            return (always.to_owned(), Vec::new());
        }
        let placeholders = vec!["?"; self.stored.len()].join(", ");
        let operator = if self.negated { "not in" } else { "in" };
        (
            format!("{} {} ({})", quote(&self.column), operator, placeholders),
            self.stored.clone(),
        )
    }
}
