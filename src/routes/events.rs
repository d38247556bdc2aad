//! Event listings and the registration workflow.

use rocket::form::Form;
use rocket::http::ContentType;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route, State};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::{
    attendee_upload::{attendee_template_csv, parse_attendee_upload},
    config::Config,
    contact::AttendeeDetail,
    date_helpers::format_date,
    server_error,
    sql_interface::{self, EventFilter, NewRegistration, RegisterError, RegistrationType},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![events_page, event_detail, register, attendee_template]
}

/// Just a shorthand for an error flash redirecting back to an event page.
#[inline]
fn registration_error(event_id: i64, message: &str) -> Flash<Redirect> {
    Flash::error(Redirect::to(uri!(event_detail(id = event_id))), message)
}

#[get("/events")]
pub async fn events_page(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateEvent {
        pretty_date: String,
        event: sql_interface::Event,
    }

    let mut events = [Vec::new(), Vec::new()];
    for (i, filter) in [EventFilter::OnlyUpcoming, EventFilter::OnlyPast]
        .into_iter()
        .enumerate()
    {
        let from_db = conn
            .run(move |c| sql_interface::list_events(c, &filter))
            .await
            .map_err(|err| {
                server_error(
                    format!("Error while listing events: {err}"),
                    "an error occurred while loading events",
                )
            })?;

        events[i] = from_db
            .into_iter()
            .map(|event| TemplateEvent {
                pretty_date: format_date(event.date),
                event,
            })
            .collect();
    }

    let flash = flash.map(|flashmsg| flashmsg.message().to_string());
    let [upcoming_events, past_events] = events;

    Ok(Template::render(
        "events",
        context! {
            flash,
            upcoming_events,
            past_events,
        },
    ))
}

#[get("/events/<id>")]
pub async fn event_detail(
    conn: HopealifeDBConn,
    id: i64,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let event = conn
        .run(move |c| sql_interface::get_event(c, id))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while loading event {id}: {err}"),
                "an error occurred while loading the event",
            )
        })?
        .ok_or_else(|| {
            Flash::error(
                Redirect::to(uri!(events_page)),
                "Event not found. Please refresh the page and try again.",
            )
        })?;

    let capacity = conn
        .run(move |c| sql_interface::event_capacity(c, id))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while computing capacity of event {id}: {err}"),
                "an error occurred while loading the event",
            )
        })?;

    let notice = conn
        .run(|c| sql_interface::get_setting(c, "registration-notice"))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while fetching the registration notice: {err}"),
                "an error occurred while loading the event",
            )
        })?;
    let notice = sql_interface::stringify_value(notice);

    Ok(Template::render(
        "event-detail",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            pretty_date: format_date(event.date),
            event,
            capacity,
            registration_notice: (!notice.is_empty()).then_some(notice),
        },
    ))
}

/// A registration form as submitted by the frontend. Attendee rows arrive as
/// parallel vectors; `attendee_upload` optionally carries pasted delimited
/// text which takes precedence over the typed rows.
#[derive(Debug, FromForm)]
pub struct RegistrationForm {
    pub registration_type: String,
    pub name: String,
    pub organization_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub number_of_attendees: u32,
    pub attendee_name: Vec<String>,
    pub attendee_position: Vec<String>,
    pub attendee_email: Vec<String>,
    pub attendee_phone: Vec<String>,
    pub attendee_upload: String,
    pub special_requirements: String,
    pub dietary_restrictions: String,
    pub additional_notes: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl RegistrationForm {
    /// Collects the typed attendee rows, skipping unnamed ones.
    fn typed_attendee_rows(&self) -> Vec<AttendeeDetail> {
        self.attendee_name
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(i, name)| {
                let cell = |cells: &[String]| {
                    cells.get(i).map_or_else(String::new, |c| c.trim().to_string())
                };
                AttendeeDetail {
                    name: name.trim().to_string(),
                    position: cell(&self.attendee_position),
                    email: cell(&self.attendee_email),
                    phone: cell(&self.attendee_phone),
                }
            })
            .collect()
    }
}

#[post("/events/<id>/register", data = "<form>")]
pub async fn register(
    conn: HopealifeDBConn,
    config: &State<Config>,
    id: i64,
    form: Form<RegistrationForm>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let registration_type: RegistrationType = form
        .registration_type
        .parse()
        .map_err(|_| registration_error(id, "Please select a registration type."))?;

    match registration_type {
        RegistrationType::Individual if form.name.trim().is_empty() => {
            return Err(registration_error(id, "Please enter your full name."));
        }
        RegistrationType::Organization if form.organization_name.trim().is_empty() => {
            return Err(registration_error(id, "Please enter organization name."));
        }
        RegistrationType::Organization if form.contact_person.trim().is_empty() => {
            return Err(registration_error(id, "Please enter contact person name."));
        }
        _ => (),
    }
    if form.email.trim().is_empty() || form.phone.trim().is_empty() {
        return Err(registration_error(id, "Please fill in all required fields."));
    }

    let mut number_of_attendees = form.number_of_attendees;
    let attendee_details = if registration_type == RegistrationType::Organization {
        match optional(&form.attendee_upload) {
            Some(upload) => {
                let rows = parse_attendee_upload(&upload, config.max_upload_rows)
                    .map_err(|err| registration_error(id, &err.to_string()))?;
                number_of_attendees = rows.len() as u32;
                rows
            }
            None => form.typed_attendee_rows(),
        }
    } else {
        Vec::new()
    };

    let new = NewRegistration {
        event_id: id,
        registration_type,
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        organization_name: optional(&form.organization_name),
        contact_person: optional(&form.contact_person),
        number_of_attendees,
        attendee_details,
        special_requirements: optional(&form.special_requirements),
        dietary_restrictions: optional(&form.dietary_restrictions),
        additional_notes: optional(&form.additional_notes),
    };

    match conn
        .run(move |c| sql_interface::apply_registration(c, &new))
        .await
    {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(event_detail(id = id))),
            "Registration submitted successfully!",
        )),
        Err(RegisterError::UnknownEvent) => Err(Flash::error(
            Redirect::to(uri!(events_page)),
            "Event not found. Please refresh the page and try again.",
        )),
        Err(
            err @ (RegisterError::NoAttendees
            | RegisterError::CapacityExceeded { .. }
            | RegisterError::OrganizationCapExceeded { .. }
            | RegisterError::ContactTaken { .. }
            | RegisterError::AttendeeCollisions(_)),
        ) => Err(registration_error(id, &err.to_string())),
        Err(err) => Err(server_error(
            format!("Error while applying registration for event {id}: {err}"),
            "an error occurred while saving the registration",
        )),
    }
}

/// The downloadable template for bulk attendee uploads.
#[get("/events/attendee-template")]
pub fn attendee_template() -> (ContentType, &'static str) {
    (ContentType::CSV, attendee_template_csv())
}
