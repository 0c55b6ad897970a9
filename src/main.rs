//! Inspector for declaration files.
//!
//! ```text
//! enumerize [<declarations>] [<attribute> [<input>...]]
//! ```
//!
//! Without an attribute every declared attribute is listed with its members,
//! labels, predicates and scopes. With an attribute the given inputs are run
//! through its coercion. Settings come from `enumerize.toml` and `ENUMERIZE_*`.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use enumerize::{DeclarationSet, EnumerizeError, Input, Registry, Result, Settings, Translations};

fn main() -> ExitCode {
    let settings = match Settings::load("enumerize") {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log)))
        .init();
    match run(&settings, env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "inspection failed");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings, mut args: Vec<String>) -> Result<()> {
    let path = match args.first() {
        Some(first) if std::path::Path::new(first).is_file() => args.remove(0),
        _ => settings
            .declarations
            .as_ref()
            .map(|p| p.display().to_string())
            .ok_or_else(|| EnumerizeError::Config(String::from("no declaration file given")))?,
    };
    let declarations = DeclarationSet::from_file(&path)?;
    let mut registry: Registry<()> = Registry::new();
    if let Some(translations) = Translations::from_settings(settings)? {
        registry = registry.with_translations(Arc::new(translations));
    }
    registry.import(&declarations)?;
    info!(path = %path, attributes = registry.len(), locale = %settings.locale, "declarations loaded");

    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        for attribute in registry.attributes() {
            let kind = if attribute.is_multiple() { "multiple" } else { "single" };
            println!("{} ({})", attribute.name(), kind);
            for member in attribute.enumeration().members() {
                println!(
                    "  {} = {} \"{}\"",
                    member.name(),
                    member.stored(),
                    attribute.label_for(member.name()).unwrap_or_default()
                );
            }
            if let Some(default) = attribute.coerce(&(), Input::Nil) {
                println!("  default: {}", default.name());
            }
            for method in attribute.predicate_methods() {
                println!("  predicate: {}", method.method());
            }
            for method in attribute.scope_methods() {
                println!("  scope: {}", method.name());
            }
        }
        return Ok(());
    };
    let attribute = registry.expect_attribute(&name)?;
    let inputs: Vec<String> = args.collect();
    if attribute.is_multiple() {
        let set = attribute.resolve_collection(&(), (!inputs.is_empty()).then_some(inputs));
        println!("{} => {:?}", name, set.names());
    } else {
        for input in inputs {
            match attribute.coerce(&(), input.as_str()) {
                Some(value) => println!("\"{}\" => {} (stored {}, \"{}\")", input, value.name(), value, value.label()),
                None => println!("\"{}\" => nothing", input),
            }
        }
    }
    Ok(())
}
