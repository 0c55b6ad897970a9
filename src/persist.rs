//! SQLite persistence adapter.
//!
//! Only the raw form of enumerized attributes crosses this boundary. A single
//! attribute lives in a column of the same name holding its stored form, a
//! multiple attribute lives in a text column holding a JSON array of stored
//! forms. Rows are keyed by an integer `id` column.

// used for persistence
use rusqlite::types::Value as Sql;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::registry::{Enumerized, NameHasher, RawColumn};
use crate::scope::{Condition, quote};
use crate::stored::Stored;
use crate::{EnumerizeError, Result};

// ------------- Persistence -------------
pub struct Persistor<'db> {
    pub db: &'db Connection,
    // columns per table, read once from the schema
    columns: HashMap<String, HashSet<String>, NameHasher>,
}

impl<'db> Persistor<'db> {
    pub fn new(connection: &'db Connection) -> Persistor<'db> {
        Persistor {
            db: connection,
            columns: HashMap::default(),
        }
    }
    pub fn columns(&mut self, table: &str) -> Result<&HashSet<String>> {
        if !self.columns.contains_key(table) {
            let mut statement = self
                .db
                .prepare(&format!("pragma table_info({})", quote(table)))?;
            let names = statement
                .query_map([], |row| row.get::<_, String>(1))?
                .collect::<rusqlite::Result<HashSet<String>>>()?;
            if names.is_empty() {
                return Err(EnumerizeError::Persistence(format!("no such table: {}", table)));
            }
            self.columns.insert(table.to_owned(), names);
        }
        Ok(&self.columns[table])
    }
    /// Inserts or updates the row `id` with the raw form of every enumerized
    /// attribute of `host`.
    ///
    /// An attribute without a backing column is skipped while it holds
    /// nothing; writing an actual value to it is an error.
    pub fn save<H: Enumerized>(&mut self, table: &str, id: i64, host: &H) -> Result<()> {
        let columns = self.columns(table)?.clone();
        let mut names = Vec::new();
        let mut values = vec![Sql::Integer(id)];
        for attribute in H::registry().attributes() {
            let name = attribute.name();
            let raw = host.store().get(name);
            if !columns.contains(name) {
                if raw.is_some() {
                    return Err(EnumerizeError::Persistence(format!(
                        "table '{}' has no column for attribute '{}'",
                        table, name
                    )));
                }
                debug!(table, attribute = name, "skipping attribute without column");
                continue;
            }
            names.push(name);
            values.push(match raw {
                Some(RawColumn::One(stored)) => to_sql(stored),
                Some(RawColumn::Many(stored)) => Sql::Text(serde_json::to_string(stored)?),
                None => Sql::Null,
            });
        }
        let quoted: Vec<String> = names.iter().map(|n| quote(n)).collect();
        let conflict = if quoted.is_empty() {
            String::from("do nothing")
        } else {
            let assignments: Vec<String> = quoted
                .iter()
                .map(|q| format!("{} = excluded.{}", q, q))
                .collect();
            format!("do update set {}", assignments.join(", "))
        };
        let placeholders = vec!["?"; values.len()].join(", ");
        let columns_sql = std::iter::once(String::from("\"id\""))
            .chain(quoted.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "insert into {} ({}) values ({}) on conflict(\"id\") {}",
            quote(table), columns_sql, placeholders, conflict
        );
        self.db
            .prepare_cached(&sql)?
            .execute(params_from_iter(values.iter()))?;
        Ok(())
    }
    /// Restores the raw form of every enumerized attribute that has a column.
    /// Returns false when the row does not exist.
    pub fn load<H: Enumerized>(&mut self, table: &str, id: i64, host: &mut H) -> Result<bool> {
        let columns = self.columns(table)?.clone();
        let attributes: Vec<_> = H::registry()
            .attributes()
            .filter(|attribute| columns.contains(attribute.name()))
            .collect();
        if attributes.is_empty() {
            warn!(table, "no enumerized attribute has a column");
            return Ok(false);
        }
        let selected = attributes
            .iter()
            .map(|attribute| quote(attribute.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("select {} from {} where \"id\" = ?", selected, quote(table));
        let row = self
            .db
            .prepare_cached(&sql)?
            .query_row(params![id], |row| {
                (0..attributes.len())
                    .map(|i| row.get::<_, Sql>(i))
                    .collect::<rusqlite::Result<Vec<Sql>>>()
            })
            .optional()?;
        let Some(row) = row else {
            return Ok(false);
        };
        for (attribute, value) in attributes.iter().zip(row) {
            let name = attribute.name();
            let column = match (value, attribute.is_multiple()) {
                (Sql::Null, _) => None,
                (Sql::Text(json), true) => Some(RawColumn::Many(serde_json::from_str(&json)?)),
                (value, false) => Some(RawColumn::One(from_sql(name, value)?)),
                (_, true) => {
                    return Err(EnumerizeError::Persistence(format!(
                        "column '{}' does not hold a JSON array",
                        name
                    )));
                }
            };
            match column {
                Some(column) => host.store_mut().set(name, column),
                None => {
                    host.store_mut().clear(name);
                }
            }
        }
        Ok(true)
    }
    /// Ids of the rows matching a scope condition, in ascending order.
    pub fn select_ids(&mut self, table: &str, condition: &Condition) -> Result<Vec<i64>> {
        if !self.columns(table)?.contains(condition.column()) {
            return Err(EnumerizeError::Persistence(format!(
                "table '{}' has no column for attribute '{}'",
                table,
                condition.column()
            )));
        }
        let (fragment, stored) = condition.to_sql();
        let sql = format!("select \"id\" from {} where {} order by \"id\"", quote(table), fragment);
        let mut statement = self.db.prepare_cached(&sql)?;
        let ids = statement
            .query_map(params_from_iter(stored.iter()), |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }
}

fn to_sql(stored: &Stored) -> Sql {
    match stored {
        Stored::Integer(i) => Sql::Integer(*i),
        Stored::Text(s) => Sql::Text(s.clone()),
    }
}

fn from_sql(name: &str, value: Sql) -> Result<Stored> {
    match value {
        Sql::Integer(i) => Ok(Stored::Integer(i)),
        Sql::Text(s) => Ok(Stored::Text(s)),
        other => Err(EnumerizeError::Persistence(format!(
            "column '{}' holds unsupported {:?}",
            name,
            other.data_type()
        ))),
    }
}
