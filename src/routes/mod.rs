use rocket::Route;

pub mod admin;
pub mod contact;
pub mod error;
pub mod events;
pub mod pages;

#[must_use]
pub fn routes() -> Vec<Route> {
    crate::flatten_routes([
        pages::routes(),
        events::routes(),
        contact::routes(),
        admin::routes(),
        error::routes(),
    ])
}
