use std::sync::Arc;

// used to keep the one-to-one mapping between member names and their stored form
use bimap::BiMap;

use crate::i18n::Translations;
use crate::stored::Stored;
use crate::value::{Input, Value};
use crate::{EnumerizeError, Result};

// ------------- Member -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: String,
    stored: Stored,
    label: Option<String>,
}

impl Member {
    pub fn new(name: &str, stored: Stored, label: Option<String>) -> Self {
        Self {
            name: name.to_owned(),
            stored,
            label,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stored(&self) -> &Stored {
        &self.stored
    }
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

// ------------- Values -------------
/// The ways permitted values can be declared.
#[derive(Debug, Clone)]
pub enum Values {
    /// Plain names, each stored as itself.
    List(Vec<String>),
    /// Name to distinct stored form, e.g. `active => 1`.
    Stored(Vec<(String, Stored)>),
    /// Name to display label.
    Labeled(Vec<(String, String)>),
    Members(Vec<Member>),
}

impl Values {
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Values::List(names.into_iter().map(Into::into).collect())
    }
    pub fn stored<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Stored>,
    {
        Values::Stored(pairs.into_iter().map(|(n, s)| (n.into(), s.into())).collect())
    }
    pub fn labeled<I, S, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        Values::Labeled(pairs.into_iter().map(|(n, l)| (n.into(), l.into())).collect())
    }
    fn into_members(self) -> Vec<Member> {
        match self {
            Values::List(names) => names
                .into_iter()
                .map(|n| Member { stored: Stored::Text(n.clone()), name: n, label: None })
                .collect(),
            Values::Stored(pairs) => pairs
                .into_iter()
                .map(|(name, stored)| Member { name, stored, label: None })
                .collect(),
            Values::Labeled(pairs) => pairs
                .into_iter()
                .map(|(name, label)| Member { stored: Stored::Text(name.clone()), name, label: Some(label) })
                .collect(),
            Values::Members(members) => members,
        }
    }
}

// ------------- Enumeration -------------
/// The immutable declaration of an attribute's permitted values.
///
/// Order is significant: it defines ordinal comparison between values and
/// the order predicates and scopes are generated in. An enumeration is
/// shared behind an `Arc` by every value it produces and is never mutated
/// after it has been declared.
#[derive(Debug)]
pub struct Enumeration {
    name: String,
    members: Vec<Member>,
    lookup: BiMap<String, Stored>,
    model: Option<String>,
    i18n_scopes: Vec<String>,
    translations: Option<Arc<Translations>>,
}

impl Enumeration {
    pub fn new(name: &str, values: Values) -> Result<Self> {
        let members = values.into_members();
        if members.is_empty() {
            return Err(EnumerizeError::Declaration(format!(
                "'{}' must permit at least one value",
                name
            )));
        }
        let mut lookup = BiMap::new();
        for member in &members {
            if lookup
                .insert_no_overwrite(member.name.clone(), member.stored.clone())
                .is_err()
            {
                return Err(EnumerizeError::Declaration(format!(
                    "'{}' declares '{}' (stored as {}) more than once",
                    name, member.name, member.stored
                )));
            }
        }
        Ok(Self {
            name: name.to_owned(),
            members,
            lookup,
            model: None,
            i18n_scopes: Vec::new(),
            translations: None,
        })
    }
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_owned());
        self
    }
    pub fn with_i18n_scopes(mut self, scopes: Vec<String>) -> Self {
        self.i18n_scopes = scopes;
        self
    }
    pub fn with_translations(mut self, translations: Arc<Translations>) -> Self {
        self.translations = Some(translations);
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
    pub fn members(&self) -> &[Member] {
        &self.members
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }
    /// Permitted names in declaration order.
    pub fn values(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
    pub fn store_value_for(&self, name: &str) -> Option<&Stored> {
        self.lookup.get_by_left(name)
    }
    pub fn raw_for(&self, stored: &Stored) -> Option<&str> {
        self.lookup.get_by_right(stored).map(String::as_str)
    }
    /// Label for a member: the declared label, else a translation, else the
    /// humanized name. `None` when the name is not a member.
    pub fn label_for(&self, name: &str) -> Option<String> {
        let member = self.member(self.index_of(name)?)?;
        if let Some(label) = &member.label {
            return Some(label.clone());
        }
        if let Some(translations) = &self.translations {
            for key in self.i18n_keys(name) {
                if let Some(label) = translations.lookup(&key) {
                    return Some(label);
                }
            }
        }
        Some(humanize(name))
    }
    pub fn i18n_keys(&self, name: &str) -> Vec<String> {
        if !self.i18n_scopes.is_empty() {
            return self
                .i18n_scopes
                .iter()
                .map(|scope| format!("{}.{}", scope, name))
                .collect();
        }
        let mut keys = Vec::new();
        if let Some(model) = &self.model {
            keys.push(format!("enumerize.{}.{}.{}", model, self.name, name));
        }
        keys.push(format!("enumerize.defaults.{}.{}", self.name, name));
        keys.push(format!("enumerize.{}.{}", self.name, name));
        keys
    }
    /// Matches an input against the permitted values without any default.
    ///
    /// A value of this very enumeration comes back unchanged, anything else is
    /// compared by string form against the member names first and then against
    /// the stored forms, each in declaration order. Unknown input yields `None`.
    pub fn find(self: &Arc<Self>, input: impl Into<Input>) -> Option<Value> {
        let input = input.into();
        let text = match input {
            Input::Nil => return None,
            Input::Value(value) => {
                if Arc::ptr_eq(value.enumeration(), self) {
                    return Some(value);
                }
                value.name().to_owned()
            }
            Input::Text(s) => s,
            Input::Integer(i) => i.to_string(),
        };
        if text.is_empty() {
            return None;
        }
        self.members
            .iter()
            .position(|m| m.name == text)
            .or_else(|| self.members.iter().position(|m| m.stored.matches(&text)))
            .map(|index| Value::new(Arc::clone(self), index))
    }
}

/// `"foo_bar"` becomes `"Foo bar"`.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ").trim().to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
