//! Enumerize – enumerized attributes with lenient coercion.
//!
//! An enumerized attribute takes its values from a restricted, named set. The
//! crate translates between the raw form an attribute is stored in (text or
//! an integer code) and a rich [`value::Value`] that compares against plain
//! strings, knows its label and its position in the declaration:
//! * An [`enumeration::Enumeration`] is the immutable, ordered declaration of
//!   permitted members, each with a stored form and an optional label.
//! * An [`attribute::Attribute`] adds a default (literal or computed from the
//!   host), the multiple flag, predicate options and query scopes.
//! * A [`set::ValueSet`] is the container behind a multiple attribute.
//! * A [`registry::Registry`] is owned by a host type and works as its
//!   dispatch table for generated predicates (`male?`) and scopes
//!   (`with_sex`). Host types implement [`registry::Enumerized`].
//!
//! ## Coercion
//! Coercion never fails on data. Nil and the empty string resolve the
//! default, input matching a member name, or failing that a stored form
//! (compared as strings, in declaration order), resolves that member, and
//! anything else resolves to nothing. Collections drop unknown elements and collapse duplicates. Only
//! contradictory declarations are errors, and those surface when the
//! attribute is declared.
//!
//! ## Quick Start
//! ```
//! use enumerize::{Attribute, Predicates};
//! let status = Attribute::<()>::builder("status")
//!     .stored([("active", 1), ("blocked", 2)])
//!     .default("active")
//!     .predicates(Predicates::enabled())
//!     .build()
//!     .unwrap();
//! let value = status.coerce(&(), 2).unwrap();
//! assert!(value == "blocked");
//! assert_eq!(value.to_string(), "2");
//! assert_eq!(value.label(), "Blocked");
//! assert!(status.coerce(&(), "").unwrap() == "active");
//! assert!(status.coerce(&(), "archived").is_none());
//! ```
//!
//! ## Persistence
//! The [`persist::Persistor`] is a thin SQLite adapter that saves and loads the
//! raw form of a host's enumerized attributes and runs scope conditions.
//!
//! ## Configuration
//! [`settings::Settings`] are read through the `config` crate, as are label
//! [`i18n::Translations`] and shared [`declaration::DeclarationSet`]s.

pub mod attribute;
pub mod declaration;
pub mod enumeration;
pub mod error;
pub mod i18n;
pub mod persist;
pub mod predicate;
pub mod registry;
pub mod scope;
pub mod set;
pub mod settings;
pub mod stored;
pub mod value;

pub use attribute::{Attribute, AttributeBuilder, DefaultValue};
pub use declaration::DeclarationSet;
pub use enumeration::{Enumeration, Member, Values};
pub use error::{EnumerizeError, Result};
pub use i18n::Translations;
pub use persist::Persistor;
pub use predicate::Predicates;
pub use registry::{AttributeStore, Enumerized, RawColumn, Registry};
pub use scope::{Condition, ScopeOption};
pub use set::ValueSet;
pub use settings::Settings;
pub use stored::Stored;
pub use value::{Input, Value};
