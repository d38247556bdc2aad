//! Everything touching the SQLite store lives below this module, one
//! submodule per table family. Routes never write SQL themselves.

pub mod events;
pub mod gallery;
pub mod messages;
pub mod news;
pub mod quotes;
pub mod registrations;
pub mod settings;
pub mod stories;
#[cfg(test)]
mod tests;

pub use events::{
    delete_event, get_event, insert_new_event, list_events, update_event, Event, EventFilter,
    NewEvent, UpdateEvent,
};
pub use gallery::{
    delete_photo, delete_video, insert_new_photo, insert_new_video, list_photos, list_videos,
    update_photo, update_video, NewPhoto, NewVideo, Photo, UpdatePhoto, UpdateVideo, Video,
};
pub use messages::{
    delete_message, insert_new_message, list_messages, mark_message_read, mark_message_replied,
    ContactMessage, NewMessage,
};
pub use news::{
    approve_pending_news, delete_news, delete_pending_news, insert_new_article, list_news,
    list_pending_news, submit_news, update_article, NewArticle, NewsArticle, PendingNews,
    ReviewNewsError, UpdateArticle,
};
pub use quotes::{
    delete_quote, insert_new_quote, list_quotes, quote_for, update_quote, DailyQuote, NewQuote,
    UpdateQuote,
};
pub use registrations::{
    apply_registration, delete_registration, event_capacity, search_registrations, EventCapacity,
    NewRegistration, RegisterError, Registration, RegistrationType,
};
pub use settings::{all_settings, get_setting, set_setting, stringify_value};
pub use stories::{
    approve_story, delete_pending_story, delete_testimonial, insert_new_testimonial,
    list_pending_stories, list_testimonials, reject_story, submit_story, update_testimonial,
    InsertTestimonialError, NewStory, NewTestimonial, PendingStory, QuoteValidationError,
    ReviewStoryError, Testimonial, UpdateTestimonial, MAX_QUOTE_WORDS,
};

macro_rules! match_constraint_violation {
    ($statement:expr, $custom_error:expr) => {
        match $statement {
            Err(rusqlite::Error::SqliteFailure(
                libsqlite3_sys::Error {
                    code: libsqlite3_sys::ErrorCode::ConstraintViolation,
                    ..
                },
                _,
            )) => Err($custom_error),
            Err(err) => Err(err.into()),
            _ => Ok(()),
        }
    };
}
pub(crate) use match_constraint_violation;

pub enum DatabaseStatus {
    AlreadyExistent,
    Created,
}

#[allow(unused)]
pub fn init_db_if_necessary(
    conn: &mut rusqlite::Connection,
) -> Result<DatabaseStatus, rusqlite::Error> {
    // dummy query to see if the db has a table in it
    // yeah, we could query sqlite_master, but this way we can also directly ask for the
    // columns
    if conn
        .execute(
            "SELECT event_id, title, date
            FROM event
            WHERE false",
            [],
        )
        .is_err()
    {
        conn.execute_batch(include_str!("../init_db.sql"))?;
        Ok(DatabaseStatus::Created)
    } else {
        Ok(DatabaseStatus::AlreadyExistent)
    }
}
