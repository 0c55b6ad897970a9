//! Host integration.
//!
//! A host type owns one [`Registry`], populated once with its enumerized
//! attributes, and keeps the raw form of each attribute per instance in an
//! [`AttributeStore`]. The [`Enumerized`] trait ties the two together and
//! supplies getters, setters and the generated predicates.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

use seahash::SeaHasher;
use tracing::{debug, info};

use crate::attribute::{Attribute, AttributeBuilder};
use crate::declaration::DeclarationSet;
use crate::i18n::Translations;
use crate::predicate::PredicateMethod;
use crate::scope::{Condition, ScopeMethod};
use crate::set::ValueSet;
use crate::stored::Stored;
use crate::value::{Input, Value};
use crate::{EnumerizeError, Result};

pub type NameHasher = BuildHasherDefault<SeaHasher>;

// ------------- Registry -------------
pub struct Registry<H> {
    model: Option<String>,
    translations: Option<Arc<Translations>>,
    attributes: Vec<Arc<Attribute<H>>>,
    by_name: HashMap<String, usize, NameHasher>,
    predicates: HashMap<String, PredicateMethod, NameHasher>,
    scopes: HashMap<String, ScopeMethod, NameHasher>,
}

impl<H> Registry<H> {
    pub fn new() -> Self {
        Self {
            model: None,
            translations: None,
            attributes: Vec::new(),
            by_name: HashMap::default(),
            predicates: HashMap::default(),
            scopes: HashMap::default(),
        }
    }
    /// Model key used for translation lookups of attributes declared afterwards.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_owned());
        self
    }
    pub fn with_translations(mut self, translations: Arc<Translations>) -> Self {
        self.translations = Some(translations);
        self
    }
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
    /// Declares an attribute. Declaring a name again replaces the earlier
    /// declaration together with its predicates and scopes.
    pub fn enumerize(&mut self, builder: AttributeBuilder<H>) -> Result<Arc<Attribute<H>>> {
        let attribute = builder
            .inherit(self.model.as_deref(), self.translations.as_ref())
            .build()?;
        let name = attribute.name().to_owned();
        for method in attribute.predicate_methods() {
            if let Some(existing) = self.predicates.get(method.method()) {
                if existing.attribute() != name {
                    return Err(EnumerizeError::Declaration(format!(
                        "predicate '{}' of '{}' is already defined by '{}'",
                        method.method(),
                        name,
                        existing.attribute()
                    )));
                }
            }
        }
        for method in attribute.scope_methods() {
            if let Some(existing) = self.scopes.get(method.name()) {
                if existing.attribute() != name {
                    return Err(EnumerizeError::Declaration(format!(
                        "scope '{}' of '{}' is already defined by '{}'",
                        method.name(),
                        name,
                        existing.attribute()
                    )));
                }
            }
        }
        self.predicates.retain(|_, method| method.attribute() != name);
        self.scopes.retain(|_, method| method.attribute() != name);
        for method in attribute.predicate_methods() {
            self.predicates.insert(method.method().to_owned(), method.clone());
        }
        for method in attribute.scope_methods() {
            self.scopes.insert(method.name().to_owned(), method.clone());
        }
        let attribute = Arc::new(attribute);
        match self.by_name.entry(name.clone()) {
            Entry::Occupied(e) => {
                debug!(attribute = %name, "redeclaring enumerized attribute");
                self.attributes[*e.get()] = Arc::clone(&attribute);
            }
            Entry::Vacant(e) => {
                e.insert(self.attributes.len());
                self.attributes.push(Arc::clone(&attribute));
            }
        }
        info!(
            attribute = %name,
            values = attribute.values().len(),
            multiple = attribute.is_multiple(),
            predicates = attribute.predicate_methods().len(),
            scopes = attribute.scope_methods().len(),
            "enumerized attribute registered"
        );
        Ok(attribute)
    }
    /// Declares every attribute of a shared declaration set.
    pub fn import(&mut self, set: &DeclarationSet) -> Result<()> {
        for builder in set.builders::<H>() {
            self.enumerize(builder)?;
        }
        Ok(())
    }
    pub fn attribute(&self, name: &str) -> Option<&Arc<Attribute<H>>> {
        self.by_name.get(name).map(|i| &self.attributes[*i])
    }
    pub fn expect_attribute(&self, name: &str) -> Result<&Arc<Attribute<H>>> {
        self.attribute(name)
            .ok_or_else(|| EnumerizeError::UnknownAttribute(name.to_owned()))
    }
    /// Attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &Arc<Attribute<H>>> {
        self.attributes.iter()
    }
    pub fn len(&self) -> usize {
        self.attributes.len()
    }
    pub fn responds_to(&self, method: &str) -> bool {
        self.predicates.contains_key(method) || self.scopes.contains_key(method)
    }
    pub fn predicate_method(&self, method: &str) -> Option<&PredicateMethod> {
        self.predicates.get(method)
    }
    pub fn predicate_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
    pub fn scope_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scopes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
    /// Resolves a generated scope into a condition for the persistence adapter.
    pub fn scope<I, T>(&self, name: &str, inputs: I) -> Result<Condition>
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        let method = self
            .scopes
            .get(name)
            .ok_or_else(|| EnumerizeError::UnknownMethod(name.to_owned()))?;
        let attribute = self.expect_attribute(method.attribute())?;
        Ok(method.condition(
            attribute.enumeration(),
            inputs.into_iter().map(Into::into).collect(),
        ))
    }
}
impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- AttributeStore -------------
/// The raw form an attribute is held in on one host instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawColumn {
    One(Stored),
    Many(Vec<Stored>),
}

/// Per-instance raw storage, the "underlying columns" of a host.
///
/// An absent entry means the attribute was never written (or was cleared),
/// which is what makes a default apply on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStore {
    columns: HashMap<String, RawColumn, NameHasher>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, name: &str) -> Option<&RawColumn> {
        self.columns.get(name)
    }
    pub fn set(&mut self, name: &str, column: RawColumn) {
        self.columns.insert(name.to_owned(), column);
    }
    pub fn clear(&mut self, name: &str) -> Option<RawColumn> {
        self.columns.remove(name)
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

// ------------- Enumerized -------------
/// Implemented by host types to get enumerized getters, setters and predicates.
///
/// ```
/// use lazy_static::lazy_static;
/// use enumerize::{Attribute, AttributeStore, Enumerized, Predicates, Registry};
///
/// #[derive(Default)]
/// struct User { store: AttributeStore }
///
/// lazy_static! {
///     static ref USER: Registry<User> = {
///         let mut registry = Registry::new();
///         registry
///             .enumerize(Attribute::builder("sex").list(["male", "female"]).predicates(Predicates::enabled()))
///             .unwrap();
///         registry
///     };
/// }
///
/// impl Enumerized for User {
///     fn registry() -> &'static Registry<Self> { &USER }
///     fn store(&self) -> &AttributeStore { &self.store }
///     fn store_mut(&mut self) -> &mut AttributeStore { &mut self.store }
/// }
///
/// let mut user = User::default();
/// user.write("sex", "female").unwrap();
/// assert!(user.predicate("female?").unwrap());
/// assert_eq!(user.read("sex").unwrap().unwrap(), "female");
/// ```
pub trait Enumerized: Sized + 'static {
    fn registry() -> &'static Registry<Self>;
    fn store(&self) -> &AttributeStore;
    fn store_mut(&mut self) -> &mut AttributeStore;

    fn responds_to(method: &str) -> bool {
        Self::registry().responds_to(method)
    }
    /// Current value of a single attribute, falling back to its default.
    fn read(&self, name: &str) -> Result<Option<Value>> {
        let attribute = Self::registry().expect_attribute(name)?;
        if attribute.is_multiple() {
            return Ok(self.read_set(name)?.iter().next().cloned());
        }
        let raw = match self.store().get(name) {
            Some(RawColumn::One(stored)) => Input::from(stored),
            Some(RawColumn::Many(stored)) => stored.first().map_or(Input::Nil, Input::from),
            None => Input::Nil,
        };
        Ok(attribute.coerce(self, raw))
    }
    /// Current members of a multiple attribute, falling back to its default.
    fn read_set(&self, name: &str) -> Result<ValueSet> {
        let attribute = Self::registry().expect_attribute(name)?;
        if !attribute.is_multiple() {
            return Err(EnumerizeError::NotMultiple(name.to_owned()));
        }
        let raw = match self.store().get(name) {
            Some(RawColumn::Many(stored)) => Some(stored.clone()),
            Some(RawColumn::One(stored)) => Some(vec![stored.clone()]),
            None => None,
        };
        Ok(attribute.resolve_collection(self, raw))
    }
    /// Assigns an attribute. Unknown input clears it; on a multiple
    /// attribute a single input replaces the set with a one element set.
    fn write(&mut self, name: &str, input: impl Into<Input>) -> Result<()> {
        let attribute = Arc::clone(Self::registry().expect_attribute(name)?);
        let input = input.into();
        if attribute.is_multiple() {
            return self.write_all(name, [input]);
        }
        match attribute.find(input) {
            Some(value) => self.store_mut().set(name, RawColumn::One(value.stored().clone())),
            None => {
                self.store_mut().clear(name);
            }
        }
        Ok(())
    }
    /// Replaces the whole set of a multiple attribute.
    fn write_all<I, T>(&mut self, name: &str, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        let attribute = Self::registry().expect_attribute(name)?;
        if !attribute.is_multiple() {
            return Err(EnumerizeError::NotMultiple(name.to_owned()));
        }
        let set = attribute.coerce_collection(inputs);
        self.store_mut().set(name, RawColumn::Many(set.to_stored()));
        Ok(())
    }
    /// Adds one member to a multiple attribute. Unknown or present input is
    /// a no-op and leaves an unwritten attribute on its default.
    fn push(&mut self, name: &str, input: impl Into<Input>) -> Result<bool> {
        let mut set = self.read_set(name)?;
        let added = set.insert(input);
        if added {
            self.store_mut().set(name, RawColumn::Many(set.to_stored()));
        }
        Ok(added)
    }
    fn remove(&mut self, name: &str, input: impl Into<Input>) -> Result<bool> {
        let mut set = self.read_set(name)?;
        let removed = set.remove(input);
        if removed {
            self.store_mut().set(name, RawColumn::Many(set.to_stored()));
        }
        Ok(removed)
    }
    /// Calls a generated predicate such as `male?`.
    fn predicate(&self, method: &str) -> Result<bool> {
        let predicate = Self::registry()
            .predicate_method(method)
            .ok_or_else(|| EnumerizeError::UnknownMethod(method.to_owned()))?;
        let attribute = Self::registry().expect_attribute(predicate.attribute())?;
        if attribute.is_multiple() {
            Ok(self.read_set(predicate.attribute())?.contains(predicate.value()))
        } else {
            Ok(self
                .read(predicate.attribute())?
                .is_some_and(|value| value == predicate.value()))
        }
    }
}
