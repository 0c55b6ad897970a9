use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use enumerize::{Attribute, Enumeration, EnumerizeError, Input, Stored, Values};

fn sex() -> Attribute<()> {
    Attribute::builder("sex").list(["male", "female"]).build().unwrap()
}

fn status() -> Attribute<()> {
    Attribute::builder("status")
        .stored([("active", 1), ("blocked", 2)])
        .build()
        .unwrap()
}

#[test]
fn every_permitted_value_coerces_to_itself() {
    for attribute in [sex(), status()] {
        for name in attribute.values() {
            let value = attribute.coerce(&(), name).expect("member coerces");
            assert!(value == name);
            assert_eq!(value.to_string(), attribute.store_value_for(name).unwrap().to_string());
        }
    }
}

#[test]
fn stored_form_and_integer_input_find_the_member() {
    let status = status();
    assert!(status.coerce(&(), 2).unwrap() == "blocked");
    assert!(status.coerce(&(), "1").unwrap() == "active");
    assert_eq!(status.store_value_for("blocked"), Some(&Stored::Integer(2)));
    assert_eq!(status.raw_for(&Stored::Integer(1)), Some("active"));
    assert_eq!(status.raw_for(&Stored::Integer(3)), None);
    assert_eq!(status.store_value_for("archived"), None);
}

#[test]
fn unknown_input_is_nothing() {
    let sex = sex();
    assert!(sex.coerce(&(), "robot").is_none());
    assert!(sex.coerce(&(), 42).is_none());
    assert!(sex.label_for("robot").is_none());
}

#[test]
fn nil_without_default_is_nothing() {
    let sex = sex();
    assert!(sex.coerce(&(), Input::Nil).is_none());
    assert!(sex.coerce(&(), "").is_none());
    assert!(sex.coerce(&(), None::<&str>).is_none());
}

#[test]
fn nil_resolves_the_literal_default() {
    let role = Attribute::<()>::builder("role")
        .list(["user", "admin"])
        .default("user")
        .build()
        .unwrap();
    assert!(role.coerce(&(), Input::Nil).unwrap() == "user");
    assert!(role.coerce(&(), "").unwrap() == "user");
    assert!(role.coerce(&(), "admin").unwrap() == "admin");
    // unknown input does not fall back to the default
    assert!(role.coerce(&(), "root").is_none());
    assert_eq!(role.default(&()), Input::from("user"));
}

struct Account {
    premium: bool,
}

#[test]
fn computed_default_is_evaluated_on_every_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let plan = Attribute::<Account>::builder("plan")
        .list(["basic", "premium"])
        .default_with(move |account: &Account| {
            counter.fetch_add(1, Ordering::SeqCst);
            if account.premium { "premium" } else { "basic" }
        })
        .build()
        .unwrap();
    let mut account = Account { premium: false };
    assert!(plan.coerce(&account, Input::Nil).unwrap() == "basic");
    account.premium = true;
    assert!(plan.coerce(&account, Input::Nil).unwrap() == "premium");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn value_is_returned_unchanged() {
    let sex = sex();
    let male = sex.coerce(&(), "male").unwrap();
    let again = sex.coerce(&(), &male).unwrap();
    assert!(Arc::ptr_eq(male.enumeration(), again.enumeration()));
    assert_eq!(again.index(), 0);
}

#[test]
fn value_of_another_declaration_is_matched_by_name() {
    let gender = Attribute::<()>::builder("gender")
        .list(["female", "male", "other"])
        .build()
        .unwrap();
    let male = sex().coerce(&(), "male").unwrap();
    let coerced = gender.coerce(&(), male.clone()).unwrap();
    assert_eq!(coerced.index(), 1);
    assert_eq!(coerced, male);
}

#[test]
fn equality_is_symmetric_against_strings() {
    let value = sex().coerce(&(), "female").unwrap();
    assert!(value == "female");
    assert!("female" == value);
    assert!(value == String::from("female"));
    assert!(String::from("female") == value);
    assert!(value != "male");
    // the stored form is not the name
    let active = status().coerce(&(), "active").unwrap();
    assert!(active != "1");
    assert_eq!(active.stored().as_integer(), Some(1));
}

#[test]
fn hashing_agrees_with_plain_strings() {
    let mut counts = HashMap::new();
    counts.insert(sex().coerce(&(), "male").unwrap(), 1);
    assert_eq!(counts.get("male"), Some(&1));
    assert_eq!(counts.get("female"), None);
}

#[test]
fn values_order_by_declaration_index() {
    let attribute = Attribute::<()>::builder("size")
        .list(["small", "medium", "large"])
        .build()
        .unwrap();
    let mut values: Vec<_> = ["large", "small", "medium"]
        .into_iter()
        .filter_map(|name| attribute.coerce(&(), name))
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let names: Vec<&str> = values.iter().map(|v| v.name()).collect();
    assert_eq!(names, ["small", "medium", "large"]);
    // unrelated declarations do not order against each other
    let male = sex().coerce(&(), "male").unwrap();
    assert!(values[0].partial_cmp(&male).is_none());
}

#[test]
fn display_is_the_stored_form_and_label_is_humanized() {
    let attribute = Attribute::<()>::builder("kind")
        .stored([("pay_pal", "pp"), ("card", "cc")])
        .build()
        .unwrap();
    let value = attribute.coerce(&(), "pp").unwrap();
    assert_eq!(value.to_string(), "pp");
    assert_eq!(value.name(), "pay_pal");
    assert_eq!(value.label(), "Pay pal");
    assert!(value.is("pay_pal"));
    assert!(!value.is("card"));
}

#[test]
fn explicit_labels_win() {
    let attribute = Attribute::<()>::builder("color")
        .labeled([("red", "Crimson"), ("blue", "Navy")])
        .build()
        .unwrap();
    assert_eq!(attribute.label_for("red").as_deref(), Some("Crimson"));
    assert_eq!(attribute.coerce(&(), "blue").unwrap().label(), "Navy");
    assert_eq!(attribute.coerce(&(), "blue").unwrap().to_string(), "blue");
}

#[test]
fn name_match_wins_over_stored_form() {
    let enumeration = Arc::new(
        Enumeration::new(
            "code",
            Values::stored([("a", Stored::from("b")), ("b", Stored::from("c"))]),
        )
        .unwrap(),
    );
    assert_eq!(enumeration.find("b").unwrap().name(), "b");
    assert_eq!(enumeration.find("c").unwrap().name(), "b");
    assert_eq!(enumeration.find("a").unwrap().name(), "a");
}

#[test]
fn first_stored_match_in_declaration_order_wins() {
    let enumeration = Arc::new(
        Enumeration::new(
            "code",
            Values::stored([("x", Stored::from(1)), ("y", Stored::from("1"))]),
        )
        .unwrap(),
    );
    assert_eq!(enumeration.find("1").unwrap().name(), "x");
    assert_eq!(enumeration.find(1).unwrap().name(), "x");
}

#[test]
fn duplicate_members_fail_at_declaration() {
    let err = Enumeration::new("sex", Values::list(["male", "male"])).unwrap_err();
    assert!(matches!(err, EnumerizeError::Declaration(_)));
    let err = Enumeration::new("status", Values::stored([("a", 1), ("b", 1)])).unwrap_err();
    assert!(matches!(err, EnumerizeError::Declaration(_)));
}

#[test]
fn invalid_declarations_fail_at_build() {
    let missing = Attribute::<()>::builder("sex").build().unwrap_err();
    assert!(matches!(missing, EnumerizeError::Declaration(_)));
    let bad_default = Attribute::<()>::builder("sex")
        .list(["male", "female"])
        .default("robot")
        .build()
        .unwrap_err();
    assert!(format!("{}", bad_default).contains("default"));
}
