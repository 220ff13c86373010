use std::sync::Arc;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

use perch_types::models::Message;

use crate::Database;

/// Storage access for the `message` table.
#[derive(Clone)]
pub struct MessageStore {
    db: Arc<Database>,
}

impl MessageStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new message row and return it with the generated id.
    pub fn create(&self, posted_by: i64, text: &str, time_posted_epoch: i64) -> Result<Message> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (posted_by, message_text, time_posted_epoch)
                 VALUES (?1, ?2, ?3)",
                params![posted_by, text, time_posted_epoch],
            )?;

            Ok(Message {
                message_id: conn.last_insert_rowid(),
                posted_by,
                message_text: text.to_string(),
                time_posted_epoch,
            })
        })
    }

    /// All messages in natural store order. Ordering is not part of the
    /// contract.
    pub fn get_all(&self) -> Result<Vec<Message>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, posted_by, message_text, time_posted_epoch FROM message",
            )?;

            let rows = stmt
                .query_map([], read_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_by_id(&self, message_id: i64) -> Result<Option<Message>> {
        self.db.with_conn(|conn| query_message_by_id(conn, message_id))
    }

    pub fn get_by_account(&self, account_id: i64) -> Result<Vec<Message>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, posted_by, message_text, time_posted_epoch
                 FROM message WHERE posted_by = ?1",
            )?;

            let rows = stmt
                .query_map([account_id], read_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete a message, returning the row as it existed before deletion.
    /// `None` means nothing existed at that id and nothing was deleted.
    pub fn delete_by_id(&self, message_id: i64) -> Result<Option<Message>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "DELETE FROM message WHERE message_id = ?1
                 RETURNING message_id, posted_by, message_text, time_posted_epoch",
            )?;

            let row = stmt.query_row([message_id], read_message).optional()?;
            Ok(row)
        })
    }

    /// Replace the text of an existing message, returning the updated row.
    /// `None` means no row was affected.
    pub fn update_text(&self, message_id: i64, new_text: &str) -> Result<Option<Message>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "UPDATE message SET message_text = ?2 WHERE message_id = ?1
                 RETURNING message_id, posted_by, message_text, time_posted_epoch",
            )?;

            let row = stmt
                .query_row(params![message_id, new_text], read_message)
                .optional()?;
            Ok(row)
        })
    }
}

fn query_message_by_id(conn: &Connection, message_id: i64) -> Result<Option<Message>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, posted_by, message_text, time_posted_epoch
         FROM message WHERE message_id = ?1",
    )?;

    let row = stmt.query_row([message_id], read_message).optional()?;
    Ok(row)
}

fn read_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}
