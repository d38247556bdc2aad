use chrono::Utc;
use rusqlite::named_params;
use serde::{Deserialize, Serialize};

/// An event visitors can register for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: chrono::NaiveDate,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub registration_link: Option<String>,
    pub featured: bool,

    /// Total attendee capacity, 0 meaning unlimited.
    pub max_attendees: u32,

    /// Per-organization attendee cap, if any.
    pub max_attendees_per_organization: Option<u32>,

    pub created_at: chrono::NaiveDateTime,
}

const EVENT_COLUMNS: &str = "event_id, title, date, event_time, location, venue, description,
    contact_name, contact_email, contact_phone, image_url, registration_link, featured,
    max_attendees, max_attendees_per_organization, created_at";

// Note: Only usable in context here, since the columns are hardcoded
#[doc(hidden)]
fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        event_time: row.get(3)?,
        location: row.get(4)?,
        venue: row.get(5)?,
        description: row.get(6)?,
        contact_name: row.get(7)?,
        contact_email: row.get(8)?,
        contact_phone: row.get(9)?,
        image_url: row.get(10)?,
        registration_link: row.get(11)?,
        featured: row.get(12)?,
        max_attendees: row.get(13)?,
        max_attendees_per_organization: row.get(14)?,
        created_at: row.get(15)?,
    })
}

pub enum EventFilter {
    /// Only events on or after today, soonest first.
    OnlyUpcoming,

    /// Only events before today, most recent first.
    OnlyPast,

    /// Upcoming events marked as featured.
    FeaturedOnly,

    ListAll,
}

/// Lists events filtered by the given criteria.
pub fn list_events(
    conn: &rusqlite::Connection,
    filter: &EventFilter,
) -> rusqlite::Result<Vec<Event>> {
    let statement = format!(
        "SELECT {EVENT_COLUMNS}
        FROM event
        {}",
        match filter {
            EventFilter::OnlyUpcoming => "WHERE date >= :today ORDER BY date",
            EventFilter::OnlyPast => "WHERE date < :today ORDER BY date DESC",
            EventFilter::FeaturedOnly => "WHERE featured AND date >= :today ORDER BY date",
            EventFilter::ListAll => "ORDER BY date DESC",
        }
    );
    let mut statement = conn.prepare(&statement)?;
    let rows = match filter {
        EventFilter::ListAll => statement.query([]),
        _ => {
            let today = Utc::now().naive_local().date();
            statement.query(named_params! { ":today": today })
        }
    }?;
    rows.mapped(row_to_event).collect()
}

/// Fetches a single event by ID, [`None`] if no such event exists.
pub fn get_event(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<Event>> {
    let mut statement = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS}
        FROM event
        WHERE event_id == :id"
    ))?;
    let mut rows = statement.query(named_params! { ":id": id })?;
    rows.next()?.map(row_to_event).transpose()
}

#[derive(Clone, Debug)]
pub struct NewEvent {
    pub title: String,
    pub date: chrono::NaiveDate,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub registration_link: Option<String>,
    pub featured: bool,
    pub max_attendees: u32,
    pub max_attendees_per_organization: Option<u32>,
}

/// Inserts a new event and returns its ID.
pub fn insert_new_event(conn: &rusqlite::Connection, event: &NewEvent) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO event (title, date, event_time, location, venue, description, contact_name,
            contact_email, contact_phone, image_url, registration_link, featured, max_attendees,
            max_attendees_per_organization)
        VALUES (:title, :date, :event_time, :location, :venue, :description, :contact_name,
            :contact_email, :contact_phone, :image_url, :registration_link, :featured,
            :max_attendees, :max_per_org)",
        named_params! {
            ":title": event.title,
            ":date": event.date,
            ":event_time": event.event_time,
            ":location": event.location,
            ":venue": event.venue,
            ":description": event.description,
            ":contact_name": event.contact_name,
            ":contact_email": event.contact_email,
            ":contact_phone": event.contact_phone,
            ":image_url": event.image_url,
            ":registration_link": event.registration_link,
            ":featured": event.featured,
            ":max_attendees": event.max_attendees,
            ":max_per_org": event.max_attendees_per_organization,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Clone, Debug)]
pub struct UpdateEvent {
    pub id: i64,
    pub title: String,
    pub date: chrono::NaiveDate,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub registration_link: Option<String>,
    pub featured: bool,
    pub max_attendees: u32,
    pub max_attendees_per_organization: Option<u32>,
}

/// Updates an event entry by ID.
pub fn update_event(conn: &rusqlite::Connection, event: &UpdateEvent) -> rusqlite::Result<()> {
    // theoretically possible to check if the event ID actually matched an entry, but just
    // omitting here
    conn.execute(
        "UPDATE event
        SET title = :title, date = :date, event_time = :event_time, location = :location,
            venue = :venue, description = :description, contact_name = :contact_name,
            contact_email = :contact_email, contact_phone = :contact_phone,
            image_url = :image_url, registration_link = :registration_link,
            featured = :featured, max_attendees = :max_attendees,
            max_attendees_per_organization = :max_per_org
        WHERE event_id = :id",
        named_params! {
            ":id": event.id,
            ":title": event.title,
            ":date": event.date,
            ":event_time": event.event_time,
            ":location": event.location,
            ":venue": event.venue,
            ":description": event.description,
            ":contact_name": event.contact_name,
            ":contact_email": event.contact_email,
            ":contact_phone": event.contact_phone,
            ":image_url": event.image_url,
            ":registration_link": event.registration_link,
            ":featured": event.featured,
            ":max_attendees": event.max_attendees,
            ":max_per_org": event.max_attendees_per_organization,
        },
    )?;
    Ok(())
}

/// Deletes an event by ID and all linked registrations. **This action is irreversible.**
pub fn delete_event(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM event
        WHERE event_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
