//! Shared declaration sets.
//!
//! Declarations that several host types have in common can live in a file
//! and be imported into each registry. The option surface matches the one
//! of [`AttributeBuilder`], except that defaults can only be literal:
//!
//! ```toml
//! [[attributes]]
//! name = "role"
//! in = ["user", "admin"]
//! default = "user"
//! scope = "having_role"
//!
//! [[attributes]]
//! name = "status"
//! in = [{ name = "active", stored = 1 }, { name = "blocked", stored = 2 }]
//! predicates = { prefix = true }
//! ```

use std::path::Path;

use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::Result;
use crate::attribute::AttributeBuilder;
use crate::enumeration::{Member, Values};
use crate::predicate::Predicates;
use crate::scope::ScopeOption;
use crate::stored::Stored;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(t) => vec![t],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemberDeclaration {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        stored: Option<Stored>,
        #[serde(default)]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PrefixDeclaration {
    Attribute(bool),
    Custom(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredicatesDeclaration {
    Enabled(bool),
    Options {
        #[serde(default)]
        prefix: Option<PrefixDeclaration>,
        #[serde(default)]
        only: Option<OneOrMany<String>>,
        #[serde(default)]
        except: Option<OneOrMany<String>>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScopeDeclaration {
    Enabled(bool),
    /// `"shallow"`, or the name of a single inclusive scope.
    Named(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    pub name: String,
    #[serde(rename = "in")]
    pub values: Vec<MemberDeclaration>,
    #[serde(default)]
    pub default: Option<OneOrMany<Stored>>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub predicates: Option<PredicatesDeclaration>,
    #[serde(default)]
    pub scope: Option<ScopeDeclaration>,
    #[serde(default)]
    pub i18n_scope: Option<OneOrMany<String>>,
    #[serde(default)]
    pub model: Option<String>,
}

impl Declaration {
    pub fn builder<H>(&self) -> AttributeBuilder<H> {
        let members = self
            .values
            .iter()
            .map(|member| match member {
                MemberDeclaration::Name(name) => Member::new(name, Stored::Text(name.clone()), None),
                MemberDeclaration::Detailed { name, stored, label } => Member::new(
                    name,
                    stored.clone().unwrap_or_else(|| Stored::Text(name.clone())),
                    label.clone(),
                ),
            })
            .collect();
        let mut builder = AttributeBuilder::new(&self.name)
            .values(Values::Members(members))
            .multiple(self.multiple);
        if let Some(default) = &self.default {
            builder = builder.defaults(default.clone().into_vec());
        }
        if let Some(predicates) = &self.predicates {
            builder = builder.predicates(predicates_from(predicates));
        }
        builder = builder.scope(match &self.scope {
            None | Some(ScopeDeclaration::Enabled(false)) => ScopeOption::None,
            Some(ScopeDeclaration::Enabled(true)) => ScopeOption::Full,
            Some(ScopeDeclaration::Named(name)) if name == "shallow" => ScopeOption::Shallow,
            Some(ScopeDeclaration::Named(name)) => ScopeOption::Named(name.clone()),
        });
        if let Some(scopes) = &self.i18n_scope {
            for scope in scopes.clone().into_vec() {
                builder = builder.i18n_scope(&scope);
            }
        }
        if let Some(model) = &self.model {
            builder = builder.model(model);
        }
        builder
    }
}

fn predicates_from(declaration: &PredicatesDeclaration) -> Predicates {
    match declaration {
        PredicatesDeclaration::Enabled(true) => Predicates::enabled(),
        PredicatesDeclaration::Enabled(false) => Predicates::disabled(),
        PredicatesDeclaration::Options { prefix, only, except } => {
            let mut predicates = Predicates::enabled();
            match prefix {
                Some(PrefixDeclaration::Attribute(true)) => predicates = predicates.attribute_prefix(),
                Some(PrefixDeclaration::Custom(prefix)) => predicates = predicates.prefix(prefix),
                _ => {}
            }
            if let Some(only) = only {
                predicates = predicates.only(only.clone().into_vec());
            }
            if let Some(except) = except {
                predicates = predicates.except(except.clone().into_vec());
            }
            predicates
        }
    }
}

// ------------- DeclarationSet -------------
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarationSet {
    #[serde(default)]
    attributes: Vec<Declaration>,
}

impl DeclarationSet {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize::<Self>()?)
    }
    pub fn from_str(source: &str, format: FileFormat) -> Result<Self> {
        Ok(Config::builder()
            .add_source(File::from_str(source, format))
            .build()?
            .try_deserialize::<Self>()?)
    }
    pub fn declarations(&self) -> &[Declaration] {
        &self.attributes
    }
    pub fn builders<H>(&self) -> Vec<AttributeBuilder<H>> {
        self.attributes.iter().map(|d| d.builder::<H>()).collect()
    }
}
