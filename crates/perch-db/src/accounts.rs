use std::sync::Arc;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use perch_types::models::Account;

use crate::Database;

/// Storage access for the `account` table.
#[derive(Clone)]
pub struct AccountStore {
    db: Arc<Database>,
}

impl AccountStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.db.with_conn(|conn| query_account_by_username(conn, username))
    }

    pub fn find_by_id(&self, account_id: i64) -> Result<Option<Account>> {
        self.db.with_conn(|conn| query_account_by_id(conn, account_id))
    }

    /// Insert a new account row and return it with the generated id.
    /// A UNIQUE violation on `username` surfaces as the insert error;
    /// callers are expected to have checked uniqueness first.
    pub fn create(&self, username: &str, password: &str) -> Result<Account> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO account (username, password) VALUES (?1, ?2)",
                params![username, password],
            )?;

            Ok(Account {
                account_id: conn.last_insert_rowid(),
                username: username.to_string(),
                password: password.to_string(),
            })
        })
    }

    pub fn exists(&self, account_id: i64) -> Result<bool> {
        self.db.with_conn(|conn| {
            let found = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM account WHERE account_id = ?1)",
                [account_id],
                |row| row.get(0),
            )?;
            Ok(found)
        })
    }
}

fn query_account_by_username(conn: &Connection, username: &str) -> Result<Option<Account>> {
    let mut stmt =
        conn.prepare("SELECT account_id, username, password FROM account WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(Account {
                account_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_account_by_id(conn: &Connection, account_id: i64) -> Result<Option<Account>> {
    let mut stmt =
        conn.prepare("SELECT account_id, username, password FROM account WHERE account_id = ?1")?;

    let row = stmt
        .query_row([account_id], |row| {
            Ok(Account {
                account_id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}
