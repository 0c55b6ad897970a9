use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::enumeration::{Enumeration, Values};
use crate::i18n::Translations;
use crate::predicate::{PredicateMethod, Predicates};
use crate::scope::{ScopeMethod, ScopeOption};
use crate::set::ValueSet;
use crate::stored::Stored;
use crate::value::{Input, Value};
use crate::{EnumerizeError, Result};

type Computation<H> = Arc<dyn Fn(&H) -> Vec<Input> + Send + Sync>;

// ------------- Default -------------
/// A default is either literal or computed from the host instance each time
/// it is needed. Computed defaults are never cached.
pub enum DefaultValue<H> {
    Literal(Vec<Input>),
    Computed(Computation<H>),
}

impl<H> DefaultValue<H> {
    pub fn resolve(&self, host: &H) -> Vec<Input> {
        match self {
            DefaultValue::Literal(inputs) => inputs.clone(),
            DefaultValue::Computed(compute) => compute(host),
        }
    }
}
impl<H> Clone for DefaultValue<H> {
    fn clone(&self) -> Self {
        match self {
            DefaultValue::Literal(inputs) => DefaultValue::Literal(inputs.clone()),
            DefaultValue::Computed(compute) => DefaultValue::Computed(Arc::clone(compute)),
        }
    }
}
impl<H> fmt::Debug for DefaultValue<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DefaultValue::Literal(inputs) => f.debug_tuple("Literal").field(inputs).finish(),
            DefaultValue::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

// ------------- Attribute -------------
/// An enumerized attribute of host type `H`.
///
/// Built once when the host type registers it and shared read-only by every
/// host instance afterwards.
pub struct Attribute<H> {
    enumeration: Arc<Enumeration>,
    default: Option<DefaultValue<H>>,
    multiple: bool,
    predicates: Predicates,
    scope: ScopeOption,
    predicate_methods: Vec<PredicateMethod>,
    scope_methods: Vec<ScopeMethod>,
}

impl<H> Attribute<H> {
    pub fn builder(name: &str) -> AttributeBuilder<H> {
        AttributeBuilder::new(name)
    }
    pub fn name(&self) -> &str {
        self.enumeration.name()
    }
    pub fn enumeration(&self) -> &Arc<Enumeration> {
        &self.enumeration
    }
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }
    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }
    pub fn scope(&self) -> &ScopeOption {
        &self.scope
    }
    pub fn predicate_methods(&self) -> &[PredicateMethod] {
        &self.predicate_methods
    }
    pub fn scope_methods(&self) -> &[ScopeMethod] {
        &self.scope_methods
    }
    pub fn values(&self) -> Vec<&str> {
        self.enumeration.values()
    }
    pub fn label_for(&self, name: &str) -> Option<String> {
        self.enumeration.label_for(name)
    }
    pub fn store_value_for(&self, name: &str) -> Option<&Stored> {
        self.enumeration.store_value_for(name)
    }
    pub fn raw_for(&self, stored: &Stored) -> Option<&str> {
        self.enumeration.raw_for(stored)
    }
    /// Matches without falling back to the default.
    pub fn find(&self, input: impl Into<Input>) -> Option<Value> {
        self.enumeration.find(input)
    }
    /// The raw default for `host`, `Input::Nil` when there is none.
    pub fn default(&self, host: &H) -> Input {
        self.defaults(host)
            .into_iter()
            .find(|input| !input.is_blank())
            .unwrap_or(Input::Nil)
    }
    pub fn defaults(&self, host: &H) -> Vec<Input> {
        self.default
            .as_ref()
            .map(|default| default.resolve(host))
            .unwrap_or_default()
    }
    /// Resolves any input to a value of this attribute.
    ///
    /// Nil and the empty string resolve the default. Anything that does not
    /// match a permitted value comes back as `None`, never as an error.
    pub fn coerce(&self, host: &H, input: impl Into<Input>) -> Option<Value> {
        let input = input.into();
        if input.is_blank() {
            return self.enumeration.find(self.default(host));
        }
        let found = self.enumeration.find(input.clone());
        if found.is_none() {
            debug!(attribute = self.name(), input = ?input, "unknown input coerced to nothing");
        }
        found
    }
    /// Coerces every element, dropping unknown ones and collapsing duplicates.
    pub fn coerce_collection<I, T>(&self, inputs: I) -> ValueSet
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        ValueSet::from_inputs(Arc::clone(&self.enumeration), inputs)
    }
    /// Like `coerce_collection`, but an absent collection resolves the
    /// default wrapped into a collection.
    pub fn resolve_collection<I, T>(&self, host: &H, inputs: Option<I>) -> ValueSet
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        match inputs {
            Some(inputs) => self.coerce_collection(inputs),
            None => self.coerce_collection(self.defaults(host)),
        }
    }
}
impl<H> fmt::Debug for Attribute<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("values", &self.values())
            .field("default", &self.default)
            .field("multiple", &self.multiple)
            .field("predicates", &self.predicates)
            .field("scope", &self.scope)
            .finish()
    }
}

// ------------- AttributeBuilder -------------
pub struct AttributeBuilder<H> {
    name: String,
    values: Option<Values>,
    default: Option<DefaultValue<H>>,
    multiple: bool,
    predicates: Predicates,
    scope: ScopeOption,
    model: Option<String>,
    i18n_scopes: Vec<String>,
    translations: Option<Arc<Translations>>,
}

impl<H> AttributeBuilder<H> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            values: None,
            default: None,
            multiple: false,
            predicates: Predicates::disabled(),
            scope: ScopeOption::None,
            model: None,
            i18n_scopes: Vec::new(),
            translations: None,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn values(mut self, values: Values) -> Self {
        self.values = Some(values);
        self
    }
    pub fn list<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values(Values::list(names))
    }
    pub fn stored<I, S, T>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Stored>,
    {
        self.values(Values::stored(pairs))
    }
    pub fn labeled<I, S, L>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        self.values(Values::labeled(pairs))
    }
    pub fn default(mut self, input: impl Into<Input>) -> Self {
        self.default = Some(DefaultValue::Literal(vec![input.into()]));
        self
    }
    pub fn defaults<I, T>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        self.default = Some(DefaultValue::Literal(inputs.into_iter().map(Into::into).collect()));
        self
    }
    pub fn default_with<F, T>(mut self, compute: F) -> Self
    where
        F: Fn(&H) -> T + Send + Sync + 'static,
        T: Into<Input>,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(move |host| vec![compute(host).into()])));
        self
    }
    pub fn defaults_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(&H) -> Vec<Input> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(compute)));
        self
    }
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
    pub fn predicates(mut self, predicates: Predicates) -> Self {
        self.predicates = predicates;
        self
    }
    pub fn scope(mut self, scope: ScopeOption) -> Self {
        self.scope = scope;
        self
    }
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_owned());
        self
    }
    pub fn i18n_scope(mut self, scope: &str) -> Self {
        self.i18n_scopes.push(scope.to_owned());
        self
    }
    pub fn translations(mut self, translations: Arc<Translations>) -> Self {
        self.translations = Some(translations);
        self
    }
    // Registry-wide settings only fill in what the declaration left open.
    pub(crate) fn inherit(mut self, model: Option<&str>, translations: Option<&Arc<Translations>>) -> Self {
        if self.model.is_none() {
            self.model = model.map(str::to_owned);
        }
        if self.translations.is_none() {
            self.translations = translations.cloned();
        }
        self
    }
    /// Validates the declaration and freezes it into an attribute.
    pub fn build(self) -> Result<Attribute<H>> {
        let values = self.values.ok_or_else(|| {
            EnumerizeError::Declaration(format!("'{}' needs permitted values", self.name))
        })?;
        let mut enumeration = Enumeration::new(&self.name, values)?.with_i18n_scopes(self.i18n_scopes);
        if let Some(model) = &self.model {
            enumeration = enumeration.with_model(model);
        }
        if let Some(translations) = self.translations {
            enumeration = enumeration.with_translations(translations);
        }
        let enumeration = Arc::new(enumeration);
        if let Some(DefaultValue::Literal(inputs)) = &self.default {
            for input in inputs.iter().filter(|input| !input.is_blank()) {
                if enumeration.find(input.clone()).is_none() {
                    return Err(EnumerizeError::Declaration(format!(
                        "default {:?} is not a permitted value of '{}'",
                        input, self.name
                    )));
                }
            }
        }
        if self.multiple && self.scope != ScopeOption::None {
            return Err(EnumerizeError::Declaration(format!(
                "scopes are not supported on multiple attribute '{}'",
                self.name
            )));
        }
        let predicate_methods = self.predicates.methods(&enumeration)?;
        let scope_methods = self.scope.methods(&enumeration);
        // distinct members may normalize to the same method name
        let mut seen = HashSet::new();
        for method in predicate_methods
            .iter()
            .map(PredicateMethod::method)
            .chain(scope_methods.iter().map(ScopeMethod::name))
        {
            if !seen.insert(method) {
                return Err(EnumerizeError::Declaration(format!(
                    "'{}' generates method '{}' more than once",
                    self.name, method
                )));
            }
        }
        Ok(Attribute {
            enumeration,
            default: self.default,
            multiple: self.multiple,
            predicates: self.predicates,
            scope: self.scope,
            predicate_methods,
            scope_methods,
        })
    }
}
