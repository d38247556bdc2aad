//! Daily quotes shown on the home page. A quote can be pinned to a date;
//! days without a pinned quote fall back to the most recently added one.

use rusqlite::named_params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub id: i64,
    pub quote_text: String,
    pub author: Option<String>,
    pub quote_date: Option<chrono::NaiveDate>,
}

#[doc(hidden)]
fn row_to_quote(row: &rusqlite::Row) -> rusqlite::Result<DailyQuote> {
    Ok(DailyQuote {
        id: row.get(0)?,
        quote_text: row.get(1)?,
        author: row.get(2)?,
        quote_date: row.get(3)?,
    })
}

#[derive(Clone, Debug)]
pub struct NewQuote {
    pub quote_text: String,
    pub author: Option<String>,
    pub quote_date: Option<chrono::NaiveDate>,
}

pub fn insert_new_quote(conn: &rusqlite::Connection, quote: &NewQuote) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO daily_quote (quote_text, author, quote_date)
        VALUES (:quote_text, :author, :quote_date)",
        named_params! {
            ":quote_text": quote.quote_text,
            ":author": quote.author,
            ":quote_date": quote.quote_date,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdateQuote {
    pub id: i64,
    pub quote_text: String,
    pub author: Option<String>,
    pub quote_date: Option<chrono::NaiveDate>,
}

pub fn update_quote(conn: &rusqlite::Connection, quote: &UpdateQuote) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE daily_quote
        SET quote_text = :quote_text, author = :author, quote_date = :quote_date
        WHERE quote_id = :id",
        named_params! {
            ":id": quote.id,
            ":quote_text": quote.quote_text,
            ":author": quote.author,
            ":quote_date": quote.quote_date,
        },
    )?;
    Ok(())
}

pub fn list_quotes(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<DailyQuote>> {
    let mut statement = conn.prepare(
        "SELECT quote_id, quote_text, author, quote_date
        FROM daily_quote
        ORDER BY quote_date IS NULL, quote_date DESC, quote_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(row_to_quote).collect()
}

/// The quote for a given date: the one pinned to it, else the latest
/// unpinned one, else nothing.
pub fn quote_for(
    conn: &rusqlite::Connection,
    date: chrono::NaiveDate,
) -> rusqlite::Result<Option<DailyQuote>> {
    let mut statement = conn.prepare(
        "SELECT quote_id, quote_text, author, quote_date
        FROM daily_quote
        WHERE quote_date == :date OR quote_date IS NULL
        ORDER BY quote_date IS NULL, quote_id DESC
        LIMIT 1",
    )?;
    let mut rows = statement.query(named_params! { ":date": date })?;
    rows.next()?.map(row_to_quote).transpose()
}

pub fn delete_quote(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM daily_quote
        WHERE quote_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
