use rocket::form::{Form, Lenient, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::{
    date_helpers::{format_date, time_to_chrono_date},
    server_error,
    sql_interface::{self, EventFilter, NewEvent, UpdateEvent},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, create, update, delete]
}

#[get("/admin/events")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateEvent {
        pretty_date: String,
        event: sql_interface::Event,
    }

    let events = conn
        .run(|c| sql_interface::list_events(c, &EventFilter::ListAll))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing events: {err}"),
                "an error occurred while loading events",
            )
        })?;

    let events: Vec<_> = events
        .into_iter()
        .map(|event| TemplateEvent {
            pretty_date: format_date(event.date),
            event,
        })
        .collect();

    Ok(Template::render(
        "admin/events",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            events,
        },
    ))
}

#[derive(Debug, FromForm)]
pub struct Create {
    title: String,
    date: time::Date,
    event_time: String,
    location: String,
    venue: String,
    description: String,
    contact_name: String,
    contact_email: String,
    contact_phone: String,
    image_url: String,
    registration_link: String,
    featured: Lenient<bool>,
    max_attendees: u32,
    max_attendees_per_organization: Option<u32>,
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

impl From<Create> for NewEvent {
    fn from(source: Create) -> NewEvent {
        NewEvent {
            title: source.title,
            date: time_to_chrono_date(source.date),
            event_time: optional(source.event_time),
            location: optional(source.location),
            venue: optional(source.venue),
            description: optional(source.description),
            contact_name: optional(source.contact_name),
            contact_email: optional(source.contact_email),
            contact_phone: optional(source.contact_phone),
            image_url: optional(source.image_url),
            registration_link: optional(source.registration_link),
            featured: source.featured.into_inner(),
            max_attendees: source.max_attendees,
            max_attendees_per_organization: source.max_attendees_per_organization,
        }
    }
}

#[post("/admin/events/new", data = "<form>")]
pub async fn create(
    conn: HopealifeDBConn,
    form: Form<Strict<Create>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let new_event: NewEvent = form.into_inner().into_inner().into();
    let debug = new_event.clone();
    conn.run(move |c| sql_interface::insert_new_event(c, &new_event))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Event created successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while inserting new event: {err}\n{debug:#?}"),
                "an error occurred while inserting the new event",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct Update {
    id: i64,
    title: String,
    date: time::Date,
    event_time: String,
    location: String,
    venue: String,
    description: String,
    contact_name: String,
    contact_email: String,
    contact_phone: String,
    image_url: String,
    registration_link: String,
    featured: Lenient<bool>,
    max_attendees: u32,
    max_attendees_per_organization: Option<u32>,
}

impl From<Update> for UpdateEvent {
    fn from(source: Update) -> UpdateEvent {
        UpdateEvent {
            id: source.id,
            title: source.title,
            date: time_to_chrono_date(source.date),
            event_time: optional(source.event_time),
            location: optional(source.location),
            venue: optional(source.venue),
            description: optional(source.description),
            contact_name: optional(source.contact_name),
            contact_email: optional(source.contact_email),
            contact_phone: optional(source.contact_phone),
            image_url: optional(source.image_url),
            registration_link: optional(source.registration_link),
            featured: source.featured.into_inner(),
            max_attendees: source.max_attendees,
            max_attendees_per_organization: source.max_attendees_per_organization,
        }
    }
}

#[post("/admin/events/update", data = "<form>")]
pub async fn update(
    conn: HopealifeDBConn,
    form: Form<Strict<Update>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let update_event: UpdateEvent = form.into_inner().into_inner().into();
    let debug = update_event.clone();
    conn.run(move |c| sql_interface::update_event(c, &update_event))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Event updated successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while updating event: {err}\n{debug:#?}"),
                "an error occurred while updating the event",
            )
        })
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
}

#[post("/admin/events/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let event_id = form.id;
    conn.run(move |c| sql_interface::delete_event(c, event_id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting event: {err}\nEvent ID: {event_id}"),
                "an error occurred while deleting event",
            )
        })
}
