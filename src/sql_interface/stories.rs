//! Testimonials and the public story submissions they are reviewed from.

use rusqlite::named_params;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the word count of a testimonial quote.
pub const MAX_QUOTE_WORDS: usize = 100;

/// Role filled in when a submitted story doesn't name one.
const DEFAULT_ROLE: &str = "Community Member";

/// Tag set applied to stories approved without tags.
const DEFAULT_TAGS: &str = "Stories of Transformation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub tags: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[doc(hidden)]
fn row_to_testimonial(row: &rusqlite::Row) -> rusqlite::Result<Testimonial> {
    Ok(Testimonial {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        quote: row.get(3)?,
        tags: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteValidationError {
    #[error("Testimonial text is required.")]
    Empty,
    #[error(
        "Testimonial text exceeds the maximum of {MAX_QUOTE_WORDS} words. \
         Current count: {words} words."
    )]
    TooLong { words: usize },
}

fn validate_quote(quote: &str) -> Result<(), QuoteValidationError> {
    match count_words(quote) {
        0 => Err(QuoteValidationError::Empty),
        words if words > MAX_QUOTE_WORDS => Err(QuoteValidationError::TooLong { words }),
        _ => Ok(()),
    }
}

#[derive(Debug, Error)]
pub enum InsertTestimonialError {
    #[error("Database or query error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error(transparent)]
    InvalidQuote(#[from] QuoteValidationError),
}

#[derive(Clone, Debug)]
pub struct NewTestimonial {
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub tags: Option<String>,
}

pub fn insert_new_testimonial(
    conn: &rusqlite::Connection,
    testimonial: &NewTestimonial,
) -> Result<i64, InsertTestimonialError> {
    validate_quote(&testimonial.quote)?;
    conn.execute(
        "INSERT INTO testimonial (name, role, quote, tags)
        VALUES (:name, :role, :quote, :tags)",
        named_params! {
            ":name": testimonial.name,
            ":role": testimonial.role,
            ":quote": testimonial.quote,
            ":tags": testimonial.tags,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdateTestimonial {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub tags: Option<String>,
}

pub fn update_testimonial(
    conn: &rusqlite::Connection,
    testimonial: &UpdateTestimonial,
) -> Result<(), InsertTestimonialError> {
    validate_quote(&testimonial.quote)?;
    conn.execute(
        "UPDATE testimonial
        SET name = :name, role = :role, quote = :quote, tags = :tags
        WHERE testimonial_id = :id",
        named_params! {
            ":id": testimonial.id,
            ":name": testimonial.name,
            ":role": testimonial.role,
            ":quote": testimonial.quote,
            ":tags": testimonial.tags,
        },
    )?;
    Ok(())
}

/// Lists all testimonials, newest first.
pub fn list_testimonials(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Testimonial>> {
    let mut statement = conn.prepare(
        "SELECT testimonial_id, name, role, quote, tags, created_at
        FROM testimonial
        ORDER BY created_at DESC, testimonial_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(row_to_testimonial).collect()
}

pub fn delete_testimonial(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM testimonial
        WHERE testimonial_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingStory {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub tags: Option<String>,
    pub status: String,
    pub submitted_at: chrono::NaiveDateTime,
    pub reviewed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Clone, Debug)]
pub struct NewStory {
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub tags: Option<String>,
}

/// Files a public story submission for review.
pub fn submit_story(
    conn: &rusqlite::Connection,
    story: &NewStory,
) -> Result<i64, InsertTestimonialError> {
    validate_quote(&story.quote)?;
    conn.execute(
        "INSERT INTO pending_story (name, role, quote, tags)
        VALUES (:name, :role, :quote, :tags)",
        named_params! {
            ":name": story.name,
            ":role": story.role,
            ":quote": story.quote,
            ":tags": story.tags,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists story submissions still awaiting review, oldest first.
pub fn list_pending_stories(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<PendingStory>> {
    let mut statement = conn.prepare(
        "SELECT story_id, name, role, quote, tags, status, submitted_at, reviewed_at
        FROM pending_story
        WHERE status == 'pending'
        ORDER BY submitted_at",
    )?;
    let rows = statement.query([])?;
    rows.mapped(|row| {
        Ok(PendingStory {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            quote: row.get(3)?,
            tags: row.get(4)?,
            status: row.get(5)?,
            submitted_at: row.get(6)?,
            reviewed_at: row.get(7)?,
        })
    })
    .collect()
}

#[derive(Debug, Error)]
pub enum ReviewStoryError {
    #[error("Database or query error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("Unknown story submission")]
    UnknownStory,
}

/// Converts a pending story into a published testimonial, filling in the
/// default role and tags where the submission left them empty.
pub fn approve_story(conn: &mut rusqlite::Connection, id: i64) -> Result<i64, ReviewStoryError> {
    let tx = conn.transaction()?;

    let story = {
        let mut statement = tx.prepare(
            "SELECT name, role, quote, tags
            FROM pending_story
            WHERE story_id == :id AND status == 'pending'",
        )?;
        let mut rows = statement.query(named_params! { ":id": id })?;
        match rows.next()? {
            Some(row) => NewTestimonial {
                name: row.get(0)?,
                role: row
                    .get::<_, Option<String>>(1)?
                    .or_else(|| Some(DEFAULT_ROLE.to_string())),
                quote: row.get(2)?,
                tags: row
                    .get::<_, Option<String>>(3)?
                    .or_else(|| Some(DEFAULT_TAGS.to_string())),
            },
            None => return Err(ReviewStoryError::UnknownStory),
        }
    };

    tx.execute(
        "INSERT INTO testimonial (name, role, quote, tags)
        VALUES (:name, :role, :quote, :tags)",
        named_params! {
            ":name": story.name,
            ":role": story.role,
            ":quote": story.quote,
            ":tags": story.tags,
        },
    )?;
    let testimonial_id = tx.last_insert_rowid();

    tx.execute(
        "UPDATE pending_story
        SET status = 'approved', reviewed_at = CURRENT_TIMESTAMP
        WHERE story_id == :id",
        named_params! { ":id": id },
    )?;

    tx.commit()?;
    Ok(testimonial_id)
}

pub fn reject_story(conn: &rusqlite::Connection, id: i64) -> Result<(), ReviewStoryError> {
    let updated = conn.execute(
        "UPDATE pending_story
        SET status = 'rejected', reviewed_at = CURRENT_TIMESTAMP
        WHERE story_id == :id AND status == 'pending'",
        named_params! { ":id": id },
    )?;
    if updated == 0 {
        return Err(ReviewStoryError::UnknownStory);
    }
    Ok(())
}

pub fn delete_pending_story(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM pending_story
        WHERE story_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
