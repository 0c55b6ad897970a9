use lazy_static::lazy_static;
use rusqlite::Connection;

use enumerize::{
    Attribute, AttributeStore, Enumerized, EnumerizeError, Persistor, RawColumn, Registry,
    ScopeOption, Stored,
};

#[derive(Default)]
struct User {
    store: AttributeStore,
}

lazy_static! {
    static ref USER: Registry<User> = {
        let mut registry = Registry::new().with_model("user");
        registry
            .enumerize(
                Attribute::builder("sex")
                    .list(["male", "female"])
                    .scope(ScopeOption::Full),
            )
            .unwrap();
        registry
            .enumerize(
                Attribute::builder("status")
                    .stored([("active", 1), ("blocked", 2)])
                    .scope(ScopeOption::Shallow),
            )
            .unwrap();
        registry
            .enumerize(
                Attribute::builder("role")
                    .list(["user", "admin"])
                    .scope(ScopeOption::Named(String::from("having_role"))),
            )
            .unwrap();
        registry
            .enumerize(
                Attribute::builder("interests")
                    .list(["music", "sports", "dancing"])
                    .multiple(true),
            )
            .unwrap();
        // no column backs this one
        registry
            .enumerize(Attribute::builder("relationship").list(["single", "married"]))
            .unwrap();
        registry
    };
}

impl Enumerized for User {
    fn registry() -> &'static Registry<Self> {
        &USER
    }
    fn store(&self) -> &AttributeStore {
        &self.store
    }
    fn store_mut(&mut self) -> &mut AttributeStore {
        &mut self.store
    }
}

fn database() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    connection
        .execute_batch(
            "create table users (
                id integer primary key,
                sex text,
                status integer,
                role text,
                interests text
            );",
        )
        .unwrap();
    connection
}

fn user(sex: &str, status: &str, role: &str) -> User {
    let mut user = User::default();
    user.write("sex", sex).unwrap();
    user.write("status", status).unwrap();
    user.write("role", role).unwrap();
    user
}

#[test]
fn raw_forms_round_trip_through_the_table() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    let mut saved = user("female", "blocked", "admin");
    saved.write_all("interests", ["sports", "music"]).unwrap();
    persistor.save("users", 1, &saved).unwrap();

    let (status, interests): (i64, String) = connection
        .query_row("select status, interests from users where id = 1", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(status, 2);
    assert_eq!(interests, r#"["sports","music"]"#);

    let mut loaded = User::default();
    assert!(persistor.load("users", 1, &mut loaded).unwrap());
    assert_eq!(loaded.read("sex").unwrap().unwrap(), "female");
    assert_eq!(loaded.read("status").unwrap().unwrap(), "blocked");
    assert_eq!(loaded.read_set("interests").unwrap().names(), ["sports", "music"]);
    assert_eq!(loaded.store().get("status"), Some(&RawColumn::One(Stored::Integer(2))));
}

#[test]
fn saving_again_updates_and_null_clears() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    let mut host = user("male", "active", "user");
    persistor.save("users", 7, &host).unwrap();
    host.write("sex", "robot").unwrap();
    persistor.save("users", 7, &host).unwrap();

    let count: i64 = connection
        .query_row("select count(*) from users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);

    let mut loaded = user("female", "blocked", "admin");
    assert!(persistor.load("users", 7, &mut loaded).unwrap());
    assert!(loaded.read("sex").unwrap().is_none());
    assert_eq!(loaded.read("role").unwrap().unwrap(), "user");
}

#[test]
fn missing_row_loads_nothing() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    let mut host = User::default();
    assert!(!persistor.load("users", 42, &mut host).unwrap());
    assert!(matches!(
        persistor.load("accounts", 1, &mut host),
        Err(EnumerizeError::Persistence(_))
    ));
}

#[test]
fn attribute_without_column_only_fails_once_it_holds_a_value() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    let mut host = user("male", "active", "user");
    persistor.save("users", 1, &host).unwrap();
    host.write("relationship", "married").unwrap();
    assert!(matches!(
        persistor.save("users", 2, &host),
        Err(EnumerizeError::Persistence(_))
    ));
}

#[test]
fn scopes_select_matching_rows() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    persistor.save("users", 1, &user("male", "active", "user")).unwrap();
    persistor.save("users", 2, &user("female", "blocked", "admin")).unwrap();
    persistor.save("users", 3, &user("female", "active", "user")).unwrap();

    let registry = User::registry();
    let with = registry.scope("with_sex", ["female"]).unwrap();
    assert_eq!(persistor.select_ids("users", &with).unwrap(), [2, 3]);
    let without = registry.scope("without_sex", ["female", "robot"]).unwrap();
    assert_eq!(without.stored(), [Stored::from("female")]);
    assert_eq!(persistor.select_ids("users", &without).unwrap(), [1]);

    let named = registry.scope("having_role", ["admin", "user"]).unwrap();
    assert_eq!(persistor.select_ids("users", &named).unwrap(), [1, 2, 3]);

    let active = registry.scope("active", Vec::<&str>::new()).unwrap();
    assert_eq!(active.stored(), [Stored::Integer(1)]);
    assert_eq!(persistor.select_ids("users", &active).unwrap(), [1, 3]);
    let not_active = registry.scope("not_active", Vec::<&str>::new()).unwrap();
    assert_eq!(persistor.select_ids("users", &not_active).unwrap(), [2]);
}

#[test]
fn scope_with_only_unknown_arguments_matches_nothing() {
    let connection = database();
    let mut persistor = Persistor::new(&connection);
    persistor.save("users", 1, &user("male", "active", "user")).unwrap();
    let registry = User::registry();
    let with = registry.scope("with_sex", ["robot"]).unwrap();
    assert_eq!(with.to_sql(), (String::from("1 = 0"), Vec::new()));
    assert!(persistor.select_ids("users", &with).unwrap().is_empty());
    let without = registry.scope("without_sex", ["robot"]).unwrap();
    assert_eq!(persistor.select_ids("users", &without).unwrap(), [1]);
}

#[test]
fn members_normalizing_to_one_shallow_scope_fail_at_declaration() {
    let mut registry: Registry<()> = Registry::new();
    let err = registry
        .enumerize(
            Attribute::builder("kind")
                .list(["x-y", "x_y"])
                .scope(ScopeOption::Shallow),
        )
        .unwrap_err();
    assert!(matches!(err, EnumerizeError::Declaration(_)));
    assert!(registry.scope_names().is_empty());
}

#[test]
fn unknown_scope_is_an_error() {
    assert!(matches!(
        User::registry().scope("with_mood", ["happy"]),
        Err(EnumerizeError::UnknownMethod(_))
    ));
    assert!(User::responds_to("with_sex"));
    assert!(User::responds_to("not_blocked"));
    assert!(!User::responds_to("with_interests"));
}

#[derive(Default)]
struct Oddity {
    store: AttributeStore,
}

lazy_static! {
    static ref ODDITY: Registry<Oddity> = {
        let mut registry = Registry::new();
        registry
            .enumerize(
                Attribute::builder("say \"what\"")
                    .list(["yes", "no"])
                    .scope(ScopeOption::Full),
            )
            .unwrap();
        registry
    };
}

impl Enumerized for Oddity {
    fn registry() -> &'static Registry<Self> {
        &ODDITY
    }
    fn store(&self) -> &AttributeStore {
        &self.store
    }
    fn store_mut(&mut self) -> &mut AttributeStore {
        &mut self.store
    }
}

#[test]
fn quotes_in_table_and_column_names_are_escaped() {
    let connection = Connection::open_in_memory().unwrap();
    connection
        .execute_batch(r#"create table "odd ""rows""" (id integer primary key, "say ""what""" text);"#)
        .unwrap();
    let mut persistor = Persistor::new(&connection);
    let mut host = Oddity::default();
    host.write("say \"what\"", "yes").unwrap();
    persistor.save("odd \"rows\"", 1, &host).unwrap();
    persistor.save("odd \"rows\"", 2, &Oddity::default()).unwrap();

    let mut loaded = Oddity::default();
    assert!(persistor.load("odd \"rows\"", 1, &mut loaded).unwrap());
    assert_eq!(loaded.read("say \"what\"").unwrap().unwrap(), "yes");

    let with = Oddity::registry().scope("with_say \"what\"", ["yes"]).unwrap();
    assert_eq!(with.to_sql().0, r#""say ""what""" in (?)"#);
    assert_eq!(persistor.select_ids("odd \"rows\"", &with).unwrap(), [1]);
}
