use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::{
    date_helpers::{format_date, format_datetime},
    server_error,
    sql_interface::{self, Registration},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![introspect, delete]
}

/// The registrant list of one event, with the capacity summary the original
/// admin console showed above the table.
#[get("/admin/registrations?<event>")]
pub async fn introspect(
    conn: HopealifeDBConn,
    event: i64,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateRegistration {
        pretty_date: String,
        display_name: String,
        email: Option<String>,
        phone: Option<String>,
        registration: Registration,
    }

    let event_row = conn
        .run(move |c| sql_interface::get_event(c, event))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while introspecting event {event} (event fetch): {err}"),
                "an error occurred while loading that event",
            )
        })?
        .ok_or_else(|| {
            Flash::error(
                Redirect::to(uri!(super::events::panel)),
                "Unknown event, nothing to introspect.",
            )
        })?;

    let capacity = conn
        .run(move |c| sql_interface::event_capacity(c, event))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while introspecting event {event} (capacity): {err}"),
                "an error occurred while loading that event",
            )
        })?;

    let registrations = conn
        .run(move |c| sql_interface::search_registrations(c, event))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while introspecting event {event} (registration search): {err}"),
                "an error occurred while listing registrations",
            )
        })?;

    let registrations: Vec<_> = registrations
        .into_iter()
        .map(|r| TemplateRegistration {
            pretty_date: format_datetime(r.created_at),
            display_name: r.display_name().to_string(),
            email: r.primary_email().map(ToString::to_string),
            phone: r.primary_phone().map(ToString::to_string),
            registration: r,
        })
        .collect();

    Ok(Template::render(
        "admin/registrations",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            event_title: event_row.title,
            pretty_date: format_date(event_row.date),
            event_id: event_row.id,
            capacity,
            total_registrations: registrations.len(),
            registrations,
        },
    ))
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
    event: i64,
}

#[post("/admin/registrations/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let registration_id = form.id;
    conn.run(move |c| sql_interface::delete_registration(c, registration_id))
        .await
        .map_err(|err| {
            server_error(
                format!(
                    "Error while deleting registration: {err}\nRegistration ID: {registration_id}"
                ),
                "an error occurred while deleting registration",
            )
        })?;

    let event = form.event;
    Ok(Redirect::to(uri!(introspect(event = event))))
}
