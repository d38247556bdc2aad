use rocket::{request::FlashMessage, Route};
use rocket_dyn_templates::{context, Template};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![server_error_panel]
}

/// The page `server_error` redirects to. Reached without a flash (e.g. a
/// reload), it shows a generic message instead of nothing.
#[get("/servererror")]
pub fn server_error_panel(flash: Option<FlashMessage<'_>>) -> Template {
    Template::render(
        "server-error",
        context! {
            error: flash.map_or_else(
                || "Something went wrong. Please try again.".to_string(),
                |flash| flash.message().to_string(),
            ),
        },
    )
}
