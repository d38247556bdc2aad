//! Published news and the public submissions they can be approved from.

use rusqlite::named_params;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub published_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
}

pub fn insert_new_article(
    conn: &rusqlite::Connection,
    article: &NewArticle,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO news (title, content, image_url, link, source, author)
        VALUES (:title, :content, :image_url, :link, :source, :author)",
        named_params! {
            ":title": article.title,
            ":content": article.content,
            ":image_url": article.image_url,
            ":link": article.link,
            ":source": article.source,
            ":author": article.author,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdateArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
}

pub fn update_article(conn: &rusqlite::Connection, article: &UpdateArticle) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE news
        SET title = :title, content = :content, image_url = :image_url, link = :link,
            source = :source, author = :author
        WHERE news_id = :id",
        named_params! {
            ":id": article.id,
            ":title": article.title,
            ":content": article.content,
            ":image_url": article.image_url,
            ":link": article.link,
            ":source": article.source,
            ":author": article.author,
        },
    )?;
    Ok(())
}

/// Lists all published news, newest first.
pub fn list_news(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<NewsArticle>> {
    let mut statement = conn.prepare(
        "SELECT news_id, title, content, image_url, link, source, author, published_at
        FROM news
        ORDER BY published_at DESC, news_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(row_to_article).collect()
}

#[doc(hidden)]
fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<NewsArticle> {
    Ok(NewsArticle {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        image_url: row.get(3)?,
        link: row.get(4)?,
        source: row.get(5)?,
        author: row.get(6)?,
        published_at: row.get(7)?,
    })
}

pub fn delete_news(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM news
        WHERE news_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingNews {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub submitted_at: chrono::NaiveDateTime,
}

/// Files a public news submission for review.
pub fn submit_news(conn: &rusqlite::Connection, article: &NewArticle) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO pending_news (title, content, image_url, link, source, author)
        VALUES (:title, :content, :image_url, :link, :source, :author)",
        named_params! {
            ":title": article.title,
            ":content": article.content,
            ":image_url": article.image_url,
            ":link": article.link,
            ":source": article.source,
            ":author": article.author,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists news submissions awaiting review, oldest first.
pub fn list_pending_news(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<PendingNews>> {
    let mut statement = conn.prepare(
        "SELECT pending_id, title, content, image_url, link, source, author, submitted_at
        FROM pending_news
        ORDER BY submitted_at",
    )?;
    let rows = statement.query([])?;
    rows.mapped(|row| {
        Ok(PendingNews {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            image_url: row.get(3)?,
            link: row.get(4)?,
            source: row.get(5)?,
            author: row.get(6)?,
            submitted_at: row.get(7)?,
        })
    })
    .collect()
}

#[derive(Debug, Error)]
pub enum ReviewNewsError {
    #[error("Database or query error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("Unknown news submission")]
    UnknownSubmission,
}

/// Publishes a pending submission: the row moves into `news` and disappears
/// from the review queue.
pub fn approve_pending_news(
    conn: &mut rusqlite::Connection,
    id: i64,
) -> Result<i64, ReviewNewsError> {
    let tx = conn.transaction()?;

    let article = {
        let mut statement = tx.prepare(
            "SELECT title, content, image_url, link, source, author
            FROM pending_news
            WHERE pending_id == :id",
        )?;
        let mut rows = statement.query(named_params! { ":id": id })?;
        match rows.next()? {
            Some(row) => NewArticle {
                title: row.get(0)?,
                content: row.get(1)?,
                image_url: row.get(2)?,
                link: row.get(3)?,
                source: row.get(4)?,
                author: row.get(5)?,
            },
            None => return Err(ReviewNewsError::UnknownSubmission),
        }
    };

    tx.execute(
        "INSERT INTO news (title, content, image_url, link, source, author)
        VALUES (:title, :content, :image_url, :link, :source, :author)",
        named_params! {
            ":title": article.title,
            ":content": article.content,
            ":image_url": article.image_url,
            ":link": article.link,
            ":source": article.source,
            ":author": article.author,
        },
    )?;
    let news_id = tx.last_insert_rowid();

    tx.execute(
        "DELETE FROM pending_news
        WHERE pending_id == :id",
        named_params! { ":id": id },
    )?;

    tx.commit()?;
    Ok(news_id)
}

pub fn delete_pending_news(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM pending_news
        WHERE pending_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
