//! Database schema and operations
//!
//! The database stores balance overrides only. Anything not stored falls
//! back to the built-in default table.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

use crate::balance::Balance;

/// A stored balance value and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceEntry {
    pub key: String,
    pub value: f64,
    pub source: Option<String>,
}

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Game balance overrides, keyed like the TOML table (engines.oil.mass_kg)
        CREATE TABLE IF NOT EXISTS balance_entries (
            key TEXT PRIMARY KEY,
            value REAL NOT NULL,
            source TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Insert or replace one balance value
pub fn upsert_entry(conn: &Connection, entry: &BalanceEntry) -> Result<()> {
    if !Balance::default().entries().iter().any(|(k, _)| *k == entry.key) {
        bail!("unknown balance key '{}'", entry.key);
    }
    conn.execute(
        "INSERT OR REPLACE INTO balance_entries (key, value, source) VALUES (?1, ?2, ?3)",
        (&entry.key, entry.value, &entry.source),
    )?;
    Ok(())
}

/// Store every value of a table, tagged with one source
pub fn store_balance(conn: &Connection, balance: &Balance, source: &str) -> Result<()> {
    for (key, value) in balance.entries() {
        upsert_entry(
            conn,
            &BalanceEntry {
                key: key.to_string(),
                value,
                source: Some(source.to_string()),
            },
        )?;
    }
    Ok(())
}

/// Clear all stored overrides
pub fn clear_balance(conn: &Connection) -> Result<()> {
    conn.execute_batch("DELETE FROM balance_entries;")?;
    Ok(())
}

/// List stored overrides ordered by key
pub fn list_entries(conn: &Connection) -> Result<Vec<BalanceEntry>> {
    let mut stmt = conn.prepare("SELECT key, value, source FROM balance_entries ORDER BY key")?;

    let rows = stmt.query_map([], |row| {
        Ok(BalanceEntry {
            key: row.get(0)?,
            value: row.get(1)?,
            source: row.get(2)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Build the effective table: defaults with stored overrides applied
pub fn load_balance(conn: &Connection) -> Result<Balance> {
    let mut balance = Balance::default();
    for entry in list_entries(conn)? {
        if !balance.set(&entry.key, entry.value) {
            eprintln!("  Ignoring unknown balance key '{}'", entry.key);
        }
    }
    balance
        .validate()
        .context("stored balance table is not usable")?;
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn empty_database_gives_defaults() {
        let conn = conn();
        assert_eq!(load_balance(&conn).unwrap(), Balance::default());
        assert!(list_entries(&conn).unwrap().is_empty());
    }

    #[test]
    fn overrides_are_applied() {
        let conn = conn();
        upsert_entry(
            &conn,
            &BalanceEntry {
                key: "engines.hydrogen.mass_kg".to_string(),
                value: 750.0,
                source: Some("HydrogenEngineConfig.cs".to_string()),
            },
        )
        .unwrap();

        let balance = load_balance(&conn).unwrap();
        assert_eq!(balance.engines.hydrogen.mass_kg, 750.0);
        assert_eq!(balance.engines.oil, Balance::default().engines.oil);

        let entries = list_entries(&conn).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source.as_deref(), Some("HydrogenEngineConfig.cs"));
    }

    #[test]
    fn unknown_keys_are_refused() {
        let conn = conn();
        let result = upsert_entry(
            &conn,
            &BalanceEntry {
                key: "engines.ion.mass_kg".to_string(),
                value: 1.0,
                source: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn store_then_clear() {
        let conn = conn();
        let mut balance = Balance::default();
        balance.booster.mass_kg = 300.0;
        store_balance(&conn, &balance, "test").unwrap();

        assert_eq!(list_entries(&conn).unwrap().len(), balance.entries().len());
        assert_eq!(load_balance(&conn).unwrap(), balance);

        clear_balance(&conn).unwrap();
        assert_eq!(load_balance(&conn).unwrap(), Balance::default());
    }

    #[test]
    fn unusable_stored_table_is_an_error() {
        let conn = conn();
        upsert_entry(
            &conn,
            &BalanceEntry {
                key: "penalty.divisor_kg".to_string(),
                value: 0.0,
                source: None,
            },
        )
        .unwrap();
        assert!(load_balance(&conn).is_err());
    }
}
