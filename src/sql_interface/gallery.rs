//! Photos and videos shown on the gallery pages.

use rusqlite::named_params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub alt: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewPhoto {
    pub title: String,
    pub description: Option<String>,
    pub url: String,

    /// Alt text, falling back to the title when empty.
    pub alt: Option<String>,
}

pub fn insert_new_photo(conn: &rusqlite::Connection, photo: &NewPhoto) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO photo (title, description, url, alt)
        VALUES (:title, :description, :url, :alt)",
        named_params! {
            ":title": photo.title,
            ":description": photo.description,
            ":url": photo.url,
            ":alt": photo.alt.as_deref().unwrap_or(&photo.title),
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdatePhoto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub alt: Option<String>,
}

pub fn update_photo(conn: &rusqlite::Connection, photo: &UpdatePhoto) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE photo
        SET title = :title, description = :description, url = :url, alt = :alt
        WHERE photo_id = :id",
        named_params! {
            ":id": photo.id,
            ":title": photo.title,
            ":description": photo.description,
            ":url": photo.url,
            ":alt": photo.alt.as_deref().unwrap_or(&photo.title),
        },
    )?;
    Ok(())
}

/// Lists all photos, newest first.
pub fn list_photos(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Photo>> {
    let mut statement = conn.prepare(
        "SELECT photo_id, title, description, url, alt, created_at
        FROM photo
        ORDER BY created_at DESC, photo_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(|row| {
        Ok(Photo {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            url: row.get(3)?,
            alt: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .collect()
}

pub fn delete_photo(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM photo
        WHERE photo_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail: Option<String>,
}

pub fn insert_new_video(conn: &rusqlite::Connection, video: &NewVideo) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO video (title, description, url, thumbnail)
        VALUES (:title, :description, :url, :thumbnail)",
        named_params! {
            ":title": video.title,
            ":description": video.description,
            ":url": video.url,
            ":thumbnail": video.thumbnail,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdateVideo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail: Option<String>,
}

pub fn update_video(conn: &rusqlite::Connection, video: &UpdateVideo) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE video
        SET title = :title, description = :description, url = :url, thumbnail = :thumbnail
        WHERE video_id = :id",
        named_params! {
            ":id": video.id,
            ":title": video.title,
            ":description": video.description,
            ":url": video.url,
            ":thumbnail": video.thumbnail,
        },
    )?;
    Ok(())
}

/// Lists all videos, newest first.
pub fn list_videos(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Video>> {
    let mut statement = conn.prepare(
        "SELECT video_id, title, description, url, thumbnail, created_at
        FROM video
        ORDER BY created_at DESC, video_id DESC",
    )?;
    let rows = statement.query([])?;
    rows.mapped(|row| {
        Ok(Video {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            url: row.get(3)?,
            thumbnail: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .collect()
}

pub fn delete_video(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM video
        WHERE video_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
