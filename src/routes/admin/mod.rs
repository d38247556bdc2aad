//! The admin console. Intentionally unauthenticated, matching the deployment
//! this replaces; see DESIGN.md.

mod events;
mod gallery;
mod messages;
mod news;
mod quotes;
mod registrations;
mod settings;
mod testimonials;

use rocket::request::FlashMessage;
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};

#[must_use]
pub fn routes() -> Vec<Route> {
    crate::flatten_routes([
        events::routes(),
        gallery::routes(),
        messages::routes(),
        news::routes(),
        quotes::routes(),
        registrations::routes(),
        settings::routes(),
        testimonials::routes(),
        routes![panel],
    ])
}

#[get("/admin")]
pub fn panel(flash: Option<FlashMessage<'_>>) -> Template {
    Template::render(
        "admin/panel",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
        },
    )
}
