//! Contact form messages and their read/replied flags.

use rusqlite::named_params;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: lettre::Address,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub is_replied: bool,
    pub created_at: chrono::NaiveDateTime,
}

// Note: Only usable in context here, since the columns are hardcoded
#[doc(hidden)]
fn row_to_message(row: &rusqlite::Row) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row
            .get::<_, String>(2)?
            .parse()
            .expect("Invalid email in database!"),
        subject: row.get(3)?,
        message: row.get(4)?,
        is_read: row.get(5)?,
        is_replied: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[derive(Clone, Debug)]
pub struct NewMessage {
    pub name: String,
    pub email: lettre::Address,
    pub subject: Option<String>,
    pub message: String,
}

pub fn insert_new_message(
    conn: &rusqlite::Connection,
    message: &NewMessage,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO contact_message (name, email, subject, message)
        VALUES (:name, :email, :subject, :message)",
        named_params! {
            ":name": message.name,
            ":email": message.email.to_string(),
            ":subject": message.subject,
            ":message": message.message,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists all contact messages, newest first, unread before read.
pub fn list_messages(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<ContactMessage>> {
    let mut statement = conn.prepare(
        "SELECT message_id, name, email, subject, message, is_read, is_replied, created_at
        FROM contact_message
        ORDER BY is_read, created_at DESC, message_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(row_to_message).collect()
}

pub fn mark_message_read(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE contact_message
        SET is_read = true
        WHERE message_id == :id",
        named_params! { ":id": id },
    )?;
    Ok(())
}

/// Marks a message as replied, which implies it has been read.
pub fn mark_message_replied(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE contact_message
        SET is_read = true, is_replied = true
        WHERE message_id == :id",
        named_params! { ":id": id },
    )?;
    Ok(())
}

pub fn delete_message(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM contact_message
        WHERE message_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
